use super::SendOutcome;
use crate::{
    client::{ChainClient, ClientError, TxOptions},
    composer::TransactionComposer,
};
use std::time::Duration;
use tokio::time;
use tracing::debug;

/// Upper bound on a single sign-and-submit call.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends one transaction per slot. Holds the run's only handle to the client.
///
/// Never retries; a failed slot is retried by the control loop offering the
/// same sequence again.
pub struct Dispatcher<C> {
    client: C,
    composer: TransactionComposer,
    options: TxOptions,
    timeout: Duration,
}

impl<C: ChainClient> Dispatcher<C> {
    pub fn new(client: C, composer: TransactionComposer, options: TxOptions) -> Self {
        Self {
            client,
            composer,
            options,
            timeout: SUBMIT_TIMEOUT,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn composer(&self) -> &TransactionComposer {
        &self.composer
    }

    pub async fn dispatch(&self, sequence: u64) -> SendOutcome {
        let msg = self.composer.compose();
        let res = time::timeout(
            self.timeout,
            self.client.sign_and_submit(&msg, &self.options, sequence),
        )
        .await;

        match res {
            Err(_) => SendOutcome::TransportError(ClientError::Timeout(self.timeout)),
            Ok(Err(e)) => SendOutcome::TransportError(e),
            Ok(Ok(res)) if res.is_accepted() => SendOutcome::Accepted {
                tx_hash: res.tx_hash,
            },
            Ok(Ok(res)) => {
                debug!(sequence, code = res.code, "submission rejected");
                SendOutcome::Rejected {
                    code: res.code,
                    tx_hash: res.tx_hash,
                    raw_log: res.raw_log,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        coins::parse_amount,
        config::tests::valid_config,
        spammer::util::test::{MockClient, MockReply},
    };

    fn dispatcher(client: MockClient) -> Dispatcher<MockClient> {
        let config = valid_config();
        let composer = TransactionComposer::new(
            client.address().to_owned(),
            parse_amount(&config.fees).unwrap(),
            &config,
        );
        let options = TxOptions {
            memo: config.memo.to_owned(),
            fees: config.fees.to_owned(),
            gas_limit: Some(200_000),
        };
        Dispatcher::new(client, composer, options)
    }

    #[tokio::test]
    async fn classifies_responses() {
        let client = MockClient::new(5).with_script([
            MockReply::Accept,
            MockReply::Reject(13),
            MockReply::Fail(ClientError::Transport("connection refused".to_owned())),
        ]);
        let dispatcher = dispatcher(client.clone());

        assert!(matches!(
            dispatcher.dispatch(5).await,
            SendOutcome::Accepted { .. }
        ));
        assert!(matches!(
            dispatcher.dispatch(6).await,
            SendOutcome::Rejected { code: 13, .. }
        ));
        assert_eq!(
            dispatcher.dispatch(6).await,
            SendOutcome::TransportError(ClientError::Transport("connection refused".to_owned()))
        );

        let calls = client.calls();
        assert_eq!(
            calls.iter().map(|c| c.sequence).collect::<Vec<_>>(),
            vec![5, 6, 6]
        );
        assert_eq!(calls[0].options.memo, "test memo");
        assert_eq!(calls[0].options.fees, "1000uatom");
        assert_eq!(calls[0].options.gas_limit, Some(200_000));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_hung_submissions() {
        let client = MockClient::new(0).with_script([MockReply::Hang]);
        let dispatcher = dispatcher(client).with_timeout(Duration::from_secs(2));

        let start = time::Instant::now();
        let outcome = dispatcher.dispatch(0).await;
        assert_eq!(
            outcome,
            SendOutcome::TransportError(ClientError::Timeout(Duration::from_secs(2)))
        );
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }
}
