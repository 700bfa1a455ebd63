//! Seams to the outside world: network discovery, the signing client, and submission.

use crate::composer::TxMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("signer error: {0}")]
    Signer(String),
}

/// Where to reach a network and how its addresses are encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkInfo {
    pub rpc_endpoint: String,
    pub address_prefix: String,
}

#[derive(Clone, Copy, Debug)]
pub struct ConnectParams<'a> {
    pub rpc_endpoint: &'a str,
    pub address_prefix: &'a str,
    pub signer: &'a str,
    pub fees: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxOptions {
    pub memo: String,
    pub fees: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
}

/// Mempool verdict for one submitted transaction. `code == 0` means accepted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    pub code: u32,
    #[serde(rename = "txhash")]
    pub tx_hash: String,
    #[serde(default)]
    pub raw_log: String,
}

impl SubmitResponse {
    pub fn is_accepted(&self) -> bool {
        self.code == 0
    }
}

#[async_trait]
pub trait NetworkResolver: Send + Sync {
    async fn resolve_network(&self, name: &str) -> Result<NetworkInfo, ClientError>;
}

/// Builds the signer-backed client used for the whole run.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: ChainClient;

    async fn connect(&self, params: ConnectParams<'_>) -> Result<Self::Client, ClientError>;
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing account, encoded with the network's prefix.
    fn address(&self) -> &str;

    /// Returns `Ok(false)` when the network has no record of `address`.
    async fn account_exists(&self, address: &str) -> Result<bool, ClientError>;

    async fn fetch_sequence(&self, address: &str) -> Result<u64, ClientError>;

    async fn sign_and_submit(
        &self,
        msg: &TxMessage,
        options: &TxOptions,
        sequence: u64,
    ) -> Result<SubmitResponse, ClientError>;
}
