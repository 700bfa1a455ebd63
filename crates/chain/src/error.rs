use spamtx_core::client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid url")]
    Url(#[from] url::ParseError),

    #[error("invalid chain name '{0}'")]
    ChainName(String),

    #[error("chain '{0}' not found in registry")]
    ChainNotFound(String),

    #[error("no RPC endpoints found for chain '{0}'")]
    RpcMissing(String),

    #[error("no bech32 prefix found for chain '{0}'")]
    PrefixMissing(String),

    #[error("registry request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("signer rpc error: {0}")]
    Rpc(#[from] jsonrpsee::core::client::Error),

    #[error("failed to encode rpc params: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<Error> for ClientError {
    fn from(err: Error) -> Self {
        use jsonrpsee::core::client::Error as RpcError;
        match err {
            Error::ChainNotFound(name) => ClientError::NotFound(format!("chain '{name}'")),
            Error::Url(_)
            | Error::ChainName(_)
            | Error::RpcMissing(_)
            | Error::PrefixMissing(_)
            | Error::Encode(_) => ClientError::InvalidResponse(err.to_string()),
            Error::Reqwest(e) if e.is_decode() => ClientError::InvalidResponse(e.to_string()),
            Error::Reqwest(e) => ClientError::Transport(e.to_string()),
            Error::Rpc(RpcError::Call(obj)) => ClientError::Signer(obj.message().to_owned()),
            Error::Rpc(RpcError::ParseError(e)) => ClientError::InvalidResponse(e.to_string()),
            Error::Rpc(e) => ClientError::Transport(e.to_string()),
        }
    }
}
