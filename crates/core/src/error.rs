use crate::{client::ClientError, coins::CoinsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to parse fees as amount")]
    Amount(#[from] CoinsError),

    #[error("failed to resolve network '{network}'")]
    NetworkResolution {
        network: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to create chain client")]
    Connect(#[source] ClientError),

    #[error("account verification failed")]
    AccountVerification(#[from] AccountErrorKind),

    #[error("failed to fetch account sequence for {address}")]
    FetchSequence {
        address: String,
        #[source]
        source: ClientError,
    },
}

/// Failed checks on the run configuration. These are reported before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chain name is required")]
    NetworkMissing,

    #[error("signer account is required")]
    SignerMissing,

    #[error("fees are required")]
    FeesMissing,

    #[error("memo is required")]
    MemoMissing,

    #[error("tps must be greater than 0")]
    RateZero,

    #[error("heavy outputs must be at most {max}, got {0}", max = crate::composer::MAX_HEAVY_OUTPUTS)]
    TooManyHeavyOutputs(u64),

    #[error("invalid rpc url '{0}': {1}")]
    RpcUrlInvalid(String, url::ParseError),
}

#[derive(Debug, Error)]
pub enum AccountErrorKind {
    #[error("account {0} not found on chain - please fund this account first")]
    NotFunded(String),

    #[error("account query for {address} failed")]
    Query {
        address: String,
        #[source]
        source: ClientError,
    },
}
