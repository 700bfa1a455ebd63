use crate::{composer::MAX_HEAVY_OUTPUTS, error::ConfigError};
use url::Url;

/// Settings for one spam run. Frozen once validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Chain name, resolved through the network registry.
    pub network: String,
    /// Name of the signing account in the keyring.
    pub signer: String,
    /// Fee coins, e.g. `1000uatom`. Also the amount moved by each self-transfer.
    pub fees: String,
    pub memo: String,
    /// Target transactions per second.
    pub rate: u64,
    pub gas_limit: Option<u64>,
    /// Overrides the RPC endpoint returned by the registry.
    pub rpc: Option<String>,
    /// Send multi-output transfers instead of a single send.
    pub heavy: bool,
    /// Explicit number of outputs per heavy transfer.
    pub heavy_outputs: Option<u64>,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.trim().is_empty() {
            return Err(ConfigError::NetworkMissing);
        }
        if self.signer.trim().is_empty() {
            return Err(ConfigError::SignerMissing);
        }
        if self.fees.trim().is_empty() {
            return Err(ConfigError::FeesMissing);
        }
        if self.memo.trim().is_empty() {
            return Err(ConfigError::MemoMissing);
        }
        if self.rate == 0 {
            return Err(ConfigError::RateZero);
        }
        if let Some(outputs) = self.heavy_outputs.filter(|n| *n > MAX_HEAVY_OUTPUTS) {
            return Err(ConfigError::TooManyHeavyOutputs(outputs));
        }
        if let Some(rpc) = self.rpc.as_deref() {
            Url::parse(rpc).map_err(|e| ConfigError::RpcUrlInvalid(rpc.to_owned(), e))?;
        }
        Ok(())
    }

    /// Gas limit hint, treating an explicit zero as unset.
    pub fn gas_limit(&self) -> Option<u64> {
        self.gas_limit.filter(|g| *g > 0)
    }
}
