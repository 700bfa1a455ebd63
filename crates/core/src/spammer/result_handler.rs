use super::{Attempt, RunState, SendOutcome};
use crate::metrics::SpamMetrics;
use tracing::{info, warn};

/// Accepted transactions whose attempt index is a multiple of this are logged with their hash.
pub const LOG_SAMPLE_INTERVAL: u64 = 100;

/// Applies the outcome of each attempt to the run state and reports progress.
pub struct ResultHandler {
    rate: u64,
    memo: String,
    heavy_outputs: Option<u64>,
    metrics: Option<SpamMetrics>,
}

impl ResultHandler {
    pub fn new(rate: u64, memo: impl Into<String>) -> Self {
        Self {
            rate,
            memo: memo.into(),
            heavy_outputs: None,
            metrics: None,
        }
    }

    pub fn with_heavy_outputs(self, heavy_outputs: Option<u64>) -> Self {
        Self {
            heavy_outputs,
            ..self
        }
    }

    pub fn with_metrics(self, metrics: Option<SpamMetrics>) -> Self {
        Self { metrics, ..self }
    }

    pub fn handle(&self, state: &mut RunState, attempt: Attempt) {
        if let Some(metrics) = &self.metrics {
            metrics.record(attempt.outcome.kind(), attempt.latency);
        }

        match attempt.outcome {
            SendOutcome::Accepted { tx_hash } => {
                state.sequence.advance();
                if attempt.index % LOG_SAMPLE_INTERVAL == 0 {
                    match self.heavy_outputs {
                        Some(outputs) => info!(
                            "🔗 Heavy transaction #{} broadcasted with hash: {tx_hash}, outputs: {outputs}, memo: {}",
                            attempt.index, self.memo
                        ),
                        None => info!(
                            "🔗 Transaction #{} broadcasted with hash: {tx_hash}, memo: {}",
                            attempt.index, self.memo
                        ),
                    }
                }
                let accepted = state.sequence.accepted();
                if self.is_milestone(accepted) {
                    info!("✅ Sent {accepted} transactions (Rate: {} TPS)", self.rate);
                }
            }
            SendOutcome::Rejected {
                code,
                tx_hash,
                raw_log,
            } => {
                state.record_rejected();
                warn!(
                    sequence = attempt.sequence,
                    %tx_hash,
                    "❌ Failed to send transaction: transaction failed with code {code}: {raw_log}"
                );
            }
            SendOutcome::TransportError(err) => {
                state.record_transport_error();
                warn!(
                    sequence = attempt.sequence,
                    "❌ Failed to send transaction: {err}"
                );
            }
        }
    }

    fn is_milestone(&self, accepted: u64) -> bool {
        self.rate > 0 && accepted % self.rate == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::ClientError, spammer::OutcomeKind};
    use prometheus::Registry;
    use std::time::Duration;

    fn attempt(state: &mut RunState, outcome: SendOutcome) -> Attempt {
        Attempt {
            index: state.begin_attempt(),
            sequence: state.sequence.current(),
            latency: Duration::from_millis(20),
            outcome,
        }
    }

    fn accepted() -> SendOutcome {
        SendOutcome::Accepted {
            tx_hash: "ABCD".to_owned(),
        }
    }

    #[test]
    fn only_acceptance_advances_the_sequence() {
        let handler = ResultHandler::new(10, "memo");
        let mut state = RunState::new(100);

        let a = attempt(&mut state, accepted());
        handler.handle(&mut state, a);
        assert_eq!(state.sequence.current(), 101);

        let a = attempt(
            &mut state,
            SendOutcome::Rejected {
                code: 32,
                tx_hash: "".to_owned(),
                raw_log: "account sequence mismatch".to_owned(),
            },
        );
        handler.handle(&mut state, a);
        assert_eq!(state.sequence.current(), 101);

        let a = attempt(
            &mut state,
            SendOutcome::TransportError(ClientError::Timeout(Duration::from_secs(30))),
        );
        handler.handle(&mut state, a);
        assert_eq!(state.sequence.current(), 101);

        let summary = state.summary();
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.transport_errors, 1);
    }

    #[test]
    fn milestones_follow_the_rate() {
        let handler = ResultHandler::new(3, "memo");
        assert!(!handler.is_milestone(1));
        assert!(!handler.is_milestone(2));
        assert!(handler.is_milestone(3));
        assert!(handler.is_milestone(6));
    }

    #[test]
    fn feeds_metrics() {
        let registry = Registry::new();
        let metrics = SpamMetrics::new(&registry).unwrap();
        let handler = ResultHandler::new(10, "memo").with_metrics(Some(metrics.clone()));
        let mut state = RunState::new(0);

        for outcome in [
            accepted(),
            accepted(),
            SendOutcome::TransportError(ClientError::Transport("eof".to_owned())),
        ] {
            let a = attempt(&mut state, outcome);
            handler.handle(&mut state, a);
        }

        assert_eq!(metrics.count(OutcomeKind::Accepted), 2);
        assert_eq!(metrics.count(OutcomeKind::TransportError), 1);
        let mean = metrics.mean_latency().unwrap();
        assert!((mean.as_secs_f64() - 0.02).abs() < 1e-6);
    }
}
