//! Client for a signing sidecar that owns the keyring.
//!
//! The sidecar exposes three JSON-RPC methods:
//! - `spamtx_address(signer, prefix) -> String`
//! - `spamtx_account(node, address) -> Option<AccountInfo>`
//! - `spamtx_signAndBroadcast(node, signer, msg, options, sequence) -> SubmitResponse`
//!
//! `node` is the chain RPC endpoint the sidecar should query or broadcast to.

use crate::error::Error;
use async_trait::async_trait;
use jsonrpsee::{
    core::{client::ClientT, params::ArrayParams},
    http_client::{HttpClient, HttpClientBuilder},
};
use serde::{de, Deserialize, Deserializer, Serialize};
use spamtx_core::{
    client::{ChainClient, ClientError, ConnectParams, Connector, SubmitResponse, TxOptions},
    composer::TxMessage,
};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SIGNER_URL: &str = "http://127.0.0.1:26690";

const METHOD_ADDRESS: &str = "spamtx_address";
const METHOD_ACCOUNT: &str = "spamtx_account";
const METHOD_SIGN_AND_BROADCAST: &str = "spamtx_signAndBroadcast";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AccountInfo {
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub account_number: u64,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub sequence: u64,
}

/// Cosmos JSON encodes 64-bit integers as strings; accept either form.
fn u64_from_str_or_num<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(de::Error::custom),
    }
}

/// Positional params for a sidecar call.
macro_rules! array_params {
    ($($value:expr),* $(,)?) => {{
        let mut array = ArrayParams::new();
        $(array.insert($value)?;)*
        array
    }};
}

pub struct SignerRpcConnector {
    url: String,
    request_timeout: Duration,
}

impl SignerRpcConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_request_timeout(self, request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            ..self
        }
    }

    async fn open(&self, params: &ConnectParams<'_>) -> Result<SignerRpcClient, Error> {
        let rpc = HttpClientBuilder::default()
            .request_timeout(self.request_timeout)
            .build(&self.url)?;
        let address: String = rpc
            .request(
                METHOD_ADDRESS,
                array_params![params.signer, params.address_prefix],
            )
            .await?;
        debug!("signer '{}' resolved to {address}", params.signer);

        Ok(SignerRpcClient {
            rpc,
            node: params.rpc_endpoint.to_owned(),
            signer: params.signer.to_owned(),
            address,
        })
    }
}

#[async_trait]
impl Connector for SignerRpcConnector {
    type Client = SignerRpcClient;

    async fn connect(&self, params: ConnectParams<'_>) -> Result<SignerRpcClient, ClientError> {
        Ok(self.open(&params).await?)
    }
}

pub struct SignerRpcClient {
    rpc: HttpClient,
    node: String,
    signer: String,
    address: String,
}

#[derive(Serialize)]
struct BroadcastOptions<'a> {
    #[serde(flatten)]
    options: &'a TxOptions,
}

fn broadcast_params(
    node: &str,
    signer: &str,
    msg: &TxMessage,
    options: &TxOptions,
    sequence: u64,
) -> Result<ArrayParams, Error> {
    Ok(array_params![
        node,
        signer,
        msg,
        BroadcastOptions { options },
        sequence,
    ])
}

impl SignerRpcClient {
    async fn account(&self, address: &str) -> Result<Option<AccountInfo>, Error> {
        Ok(self
            .rpc
            .request(METHOD_ACCOUNT, array_params![&self.node, address])
            .await?)
    }

    async fn broadcast(
        &self,
        msg: &TxMessage,
        options: &TxOptions,
        sequence: u64,
    ) -> Result<SubmitResponse, Error> {
        let params = broadcast_params(&self.node, &self.signer, msg, options, sequence)?;
        Ok(self.rpc.request(METHOD_SIGN_AND_BROADCAST, params).await?)
    }
}

#[async_trait]
impl ChainClient for SignerRpcClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn account_exists(&self, address: &str) -> Result<bool, ClientError> {
        Ok(self.account(address).await?.is_some())
    }

    async fn fetch_sequence(&self, address: &str) -> Result<u64, ClientError> {
        match self.account(address).await? {
            Some(account) => Ok(account.sequence),
            None => Err(ClientError::NotFound(format!("account {address}"))),
        }
    }

    async fn sign_and_submit(
        &self,
        msg: &TxMessage,
        options: &TxOptions,
        sequence: u64,
    ) -> Result<SubmitResponse, ClientError> {
        Ok(self.broadcast(msg, options, sequence).await?)
    }
}
