use crate::{
    client::{ChainClient, ClientError, ConnectParams, Connector, NetworkInfo, NetworkResolver},
    coins::{parse_amount, Coins},
    config::RunConfig,
    error::{AccountErrorKind, Error},
    Result,
};
use std::{future::Future, time::Duration};
use tokio::time;
use tracing::info;

/// Upper bound on each account query made before the run starts.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the control loop needs, gathered before the first slot.
pub struct PreparedRun<C> {
    pub client: C,
    pub network: NetworkInfo,
    pub address: String,
    pub base_sequence: u64,
    pub amount: Coins,
}

/// Resolves the network, connects the signer, checks the account and reads its
/// sequence, then parses the transfer amount. Any failure here aborts the run
/// before a transaction is sent.
pub async fn prepare_run<R, K>(
    config: &RunConfig,
    resolver: &R,
    connector: &K,
) -> Result<PreparedRun<K::Client>>
where
    R: NetworkResolver,
    K: Connector,
{
    config.validate()?;

    let mut network = resolver
        .resolve_network(&config.network)
        .await
        .map_err(|source| Error::NetworkResolution {
            network: config.network.to_owned(),
            source,
        })?;
    match config.rpc.as_deref() {
        Some(rpc) => {
            info!("🔗 Using custom RPC endpoint: {rpc}");
            network.rpc_endpoint = rpc.to_owned();
        }
        None => info!(
            "🔗 Using RPC endpoint from chain registry: {}",
            network.rpc_endpoint
        ),
    }

    let client = connector
        .connect(ConnectParams {
            rpc_endpoint: &network.rpc_endpoint,
            address_prefix: &network.address_prefix,
            signer: &config.signer,
            fees: &config.fees,
        })
        .await
        .map_err(Error::Connect)?;
    let address = client.address().to_owned();

    verify_account_exists(&client, &address).await?;

    let base_sequence = bounded(client.fetch_sequence(&address))
        .await
        .map_err(|source| Error::FetchSequence {
            address: address.to_owned(),
            source,
        })?;
    info!("📊 Current account sequence: {base_sequence}");

    let amount = parse_amount(&config.fees)?;

    Ok(PreparedRun {
        client,
        network,
        address,
        base_sequence,
        amount,
    })
}

async fn verify_account_exists<C: ChainClient>(client: &C, address: &str) -> Result<()> {
    let exists = bounded(client.account_exists(address))
        .await
        .map_err(|source| AccountErrorKind::Query {
            address: address.to_owned(),
            source,
        })?;
    if !exists {
        return Err(AccountErrorKind::NotFunded(address.to_owned()).into());
    }
    Ok(())
}

async fn bounded<T>(
    fut: impl Future<Output = std::result::Result<T, ClientError>>,
) -> std::result::Result<T, ClientError> {
    time::timeout(QUERY_TIMEOUT, fut)
        .await
        .map_err(|_| ClientError::Timeout(QUERY_TIMEOUT))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        coins::CoinsError,
        config::tests::valid_config,
        error::ConfigError,
        spammer::util::test::{MockClient, MockConnector, MockResolver, TEST_ADDRESS},
    };

    #[tokio::test]
    async fn prepares_run_from_registry() {
        let resolver = MockResolver::new();
        let connector = MockConnector::new(MockClient::new(17));

        let run = prepare_run(&valid_config(), &resolver, &connector)
            .await
            .unwrap();

        assert_eq!(run.address, TEST_ADDRESS);
        assert_eq!(run.base_sequence, 17);
        assert_eq!(run.amount.to_string(), "1000uatom");
        assert_eq!(run.network.address_prefix, "cosmos");

        let seen = connector.seen().unwrap();
        assert_eq!(seen.rpc_endpoint, "https://rpc.cosmoshub.example:443");
        assert_eq!(seen.signer, "alice");
        assert_eq!(seen.fees, "1000uatom");
    }

    #[tokio::test]
    async fn rpc_override_keeps_registry_prefix() {
        let config = RunConfig {
            rpc: Some("http://localhost:26657".to_owned()),
            ..valid_config()
        };
        let resolver = MockResolver::new();
        let connector = MockConnector::new(MockClient::new(0));

        let run = prepare_run(&config, &resolver, &connector).await.unwrap();

        assert_eq!(run.network.rpc_endpoint, "http://localhost:26657");
        let seen = connector.seen().unwrap();
        assert_eq!(seen.rpc_endpoint, "http://localhost:26657");
        assert_eq!(seen.address_prefix, "cosmos");
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn zero_rate_is_rejected_before_any_call() {
        let config = RunConfig {
            rate: 0,
            ..valid_config()
        };
        let resolver = MockResolver::new();
        let connector = MockConnector::new(MockClient::new(0));

        let err = prepare_run(&config, &resolver, &connector)
            .await
            .err()
            .unwrap();

        assert!(matches!(err, Error::Config(ConfigError::RateZero)));
        assert_eq!(resolver.calls(), 0);
        assert!(connector.seen().is_none());
    }

    #[tokio::test]
    async fn unresolved_network_is_fatal() {
        let resolver =
            MockResolver::with_result(Err(ClientError::NotFound("chain 'nope'".to_owned())));
        let connector = MockConnector::new(MockClient::new(0));

        let err = prepare_run(&valid_config(), &resolver, &connector)
            .await
            .err()
            .unwrap();

        assert!(matches!(err, Error::NetworkResolution { .. }));
        assert!(connector.seen().is_none());
    }

    #[tokio::test]
    async fn unfunded_account_is_fatal() {
        let client = MockClient::new(0).unfunded();
        let connector = MockConnector::new(client.clone());

        let err = prepare_run(&valid_config(), &MockResolver::new(), &connector)
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err,
            Error::AccountVerification(AccountErrorKind::NotFunded(ref addr)) if addr == TEST_ADDRESS
        ));
        let source = std::error::Error::source(&err).unwrap().to_string();
        assert!(source.contains("please fund this account first"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn account_queries_are_bounded() {
        let client = MockClient::new(0).with_query_latency(Duration::from_secs(60));
        let connector = MockConnector::new(client);

        let start = time::Instant::now();
        let err = prepare_run(&valid_config(), &MockResolver::new(), &connector)
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err,
            Error::AccountVerification(AccountErrorKind::Query {
                source: ClientError::Timeout(QUERY_TIMEOUT),
                ..
            })
        ));
        assert_eq!(start.elapsed(), QUERY_TIMEOUT);
    }

    #[tokio::test]
    async fn bad_amounts_fail_before_sending() {
        let cases = [
            ("0uatom", CoinsError::Zero),
            ("lots", CoinsError::Invalid("lots".to_owned())),
        ];
        for (fees, expected) in cases {
            let config = RunConfig {
                fees: fees.to_owned(),
                ..valid_config()
            };
            let client = MockClient::new(0);
            let connector = MockConnector::new(client.clone());

            let err = prepare_run(&config, &MockResolver::new(), &connector)
                .await
                .err()
                .unwrap();

            assert!(matches!(err, Error::Amount(ref e) if *e == expected), "{fees}");
            assert!(client.calls().is_empty());
        }
    }
}
