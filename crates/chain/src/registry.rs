//! Network lookup against a cosmos chain-registry style index, where each chain
//! lives at `<base>/<chain_name>/chain.json`.

use crate::error::Error;
use async_trait::async_trait;
use serde::Deserialize;
use spamtx_core::client::{ClientError, NetworkInfo, NetworkResolver};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/cosmos/chain-registry/master";

const REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, Deserialize)]
pub struct ChainRecord {
    pub chain_name: String,
    #[serde(default)]
    pub bech32_prefix: Option<String>,
    #[serde(default)]
    pub apis: Apis,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Apis {
    #[serde(default)]
    pub rpc: Vec<Endpoint>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Endpoint {
    pub address: String,
    #[serde(default)]
    pub provider: Option<String>,
}

impl ChainRecord {
    /// First listed RPC endpoint and the bech32 prefix.
    pub fn network_info(&self) -> Result<NetworkInfo, Error> {
        let rpc_endpoint = self
            .apis
            .rpc
            .first()
            .map(|e| e.address.to_owned())
            .ok_or_else(|| Error::RpcMissing(self.chain_name.to_owned()))?;
        let address_prefix = self
            .bech32_prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::PrefixMissing(self.chain_name.to_owned()))?
            .to_owned();
        Ok(NetworkInfo {
            rpc_endpoint,
            address_prefix,
        })
    }
}

pub struct ChainRegistry {
    http: reqwest::Client,
    base_url: Url,
}

impl ChainRegistry {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(REGISTRY_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn chain_url(&self, chain_name: &str) -> Result<Url, Error> {
        let valid = !chain_name.is_empty()
            && chain_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::ChainName(chain_name.to_owned()));
        }
        Ok(self.base_url.join(&format!("{chain_name}/chain.json"))?)
    }

    pub async fn fetch_chain(&self, chain_name: &str) -> Result<ChainRecord, Error> {
        let url = self.chain_url(chain_name)?;
        debug!("fetching chain record from {url}");
        let res = self.http.get(url).send().await?;
        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::ChainNotFound(chain_name.to_owned()));
        }
        Ok(res.error_for_status()?.json::<ChainRecord>().await?)
    }
}

#[async_trait]
impl NetworkResolver for ChainRegistry {
    async fn resolve_network(&self, name: &str) -> Result<NetworkInfo, ClientError> {
        let record = self.fetch_chain(name).await?;
        Ok(record.network_info()?)
    }
}
