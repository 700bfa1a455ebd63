use super::{
    dispatcher::Dispatcher, result_handler::ResultHandler, scheduler::RateScheduler,
    setup::PreparedRun, Attempt, RunState, RunSummary,
};
use crate::{
    client::{ChainClient, TxOptions},
    composer::{TransactionComposer, TxShape},
    config::RunConfig,
    metrics::SpamMetrics,
    Result,
};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Sends one self-transfer per slot at the configured rate until cancelled.
///
/// Submissions never overlap: each slot's dispatch finishes (accepted, rejected,
/// failed or timed out) before the next slot is awaited. Cancellation is checked
/// between slots only, so shutdown can take up to one submission timeout.
pub struct TimedSpammer<C> {
    rate: u64,
    dispatcher: Dispatcher<C>,
    handler: ResultHandler,
    state: RunState,
}

impl<C: ChainClient> TimedSpammer<C> {
    pub fn new(config: &RunConfig, prepared: PreparedRun<C>) -> Result<Self> {
        config.validate()?;
        let PreparedRun {
            client,
            address,
            base_sequence,
            amount,
            ..
        } = prepared;

        let composer = TransactionComposer::new(address, amount, config);
        let heavy_outputs = match composer.shape() {
            TxShape::Heavy { output_count } => Some(output_count),
            TxShape::Simple => None,
        };
        let options = TxOptions {
            memo: config.memo.to_owned(),
            fees: config.fees.to_owned(),
            gas_limit: config.gas_limit(),
        };

        Ok(Self {
            rate: config.rate,
            dispatcher: Dispatcher::new(client, composer, options),
            handler: ResultHandler::new(config.rate, &config.memo)
                .with_heavy_outputs(heavy_outputs),
            state: RunState::new(base_sequence),
        })
    }

    pub fn with_metrics(self, metrics: Option<SpamMetrics>) -> Self {
        Self {
            handler: self.handler.with_metrics(metrics),
            ..self
        }
    }

    pub fn with_submit_timeout(self, timeout: Duration) -> Self {
        Self {
            dispatcher: self.dispatcher.with_timeout(timeout),
            ..self
        }
    }

    /// Runs until `cancel` fires. Cancellation is a normal end of the run.
    pub async fn run(mut self, cancel: CancellationToken) -> RunSummary {
        let mut scheduler = RateScheduler::start(self.rate);
        info!(
            rate = self.rate,
            interval = ?scheduler.period(),
            base_sequence = self.state.sequence.base(),
            shape = ?self.dispatcher.composer().shape(),
            "starting spam loop"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = scheduler.next_slot() => {
                    let index = self.state.begin_attempt();
                    let sequence = self.state.sequence.current();
                    let started = Instant::now();
                    let outcome = self.dispatcher.dispatch(sequence).await;
                    self.handler.handle(
                        &mut self.state,
                        Attempt {
                            index,
                            sequence,
                            latency: started.elapsed(),
                            outcome,
                        },
                    );
                }
            }
        }
        drop(scheduler);

        let summary = self.state.summary();
        info!(
            accepted = summary.accepted,
            attempts = summary.attempts,
            rejected = summary.rejected,
            transport_errors = summary.transport_errors,
            "spam loop stopped"
        );
        summary
    }
}
