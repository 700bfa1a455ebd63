use miette::Diagnostic;
use spamtx_core::error::AccountErrorKind;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("spam run failed")]
    Core {
        #[source]
        source: spamtx_core::Error,
        #[help]
        help: Option<String>,
    },

    #[error("chain lookup failed")]
    Chain(#[from] spamtx_chain::Error),

    #[error("failed to register metrics")]
    Metrics(#[from] prometheus::Error),
}

impl From<spamtx_core::Error> for CliError {
    fn from(source: spamtx_core::Error) -> Self {
        let help = core_help(&source).map(str::to_owned);
        CliError::Core { source, help }
    }
}

fn core_help(err: &spamtx_core::Error) -> Option<&'static str> {
    use spamtx_core::Error;
    match err {
        Error::Config(_) => Some("run `spamtx spam --help` to see the expected flags"),
        Error::Amount(_) => Some("fees are written like `1000uatom` or `1000uatom,500stake`"),
        Error::NetworkResolution { .. } => {
            Some("check the chain name against the registry, or point --registry-url elsewhere")
        }
        Error::AccountVerification(AccountErrorKind::NotFunded(_)) => {
            Some("send funds to the account before starting a run")
        }
        Error::Connect(_)
        | Error::AccountVerification(AccountErrorKind::Query { .. })
        | Error::FetchSequence { .. } => {
            Some("make sure the signing sidecar is running and reachable at --signer-url")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spamtx_core::{client::ClientError, coins::CoinsError, error::ConfigError};

    fn help_of(err: spamtx_core::Error) -> String {
        CliError::from(err)
            .help()
            .map(|h| h.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn help_matches_the_failure() {
        assert!(help_of(ConfigError::RateZero.into()).contains("--help"));
        assert!(help_of(CoinsError::Empty.into()).contains("1000uatom"));
        assert!(help_of(spamtx_core::Error::Connect(ClientError::Transport(
            "connection refused".to_owned()
        )))
        .contains("sidecar"));
        assert!(
            help_of(AccountErrorKind::NotFunded("cosmos1alice".to_owned()).into())
                .contains("send funds")
        );
    }

    #[test]
    fn config_errors_do_not_mention_the_sidecar() {
        assert!(!help_of(ConfigError::MemoMissing.into()).contains("sidecar"));
        assert!(!help_of(CoinsError::Zero.into()).contains("sidecar"));
    }
}
