pub mod dispatcher;
mod result_handler;
pub mod scheduler;
pub mod sequence;
pub mod setup;
pub mod timed;
mod types;

pub use dispatcher::{Dispatcher, SUBMIT_TIMEOUT};
pub use result_handler::{ResultHandler, LOG_SAMPLE_INTERVAL};
pub use scheduler::RateScheduler;
pub use sequence::SequenceAllocator;
pub use setup::{prepare_run, PreparedRun, QUERY_TIMEOUT};
pub use timed::TimedSpammer;
pub use types::{Attempt, OutcomeKind, RunState, RunSummary, SendOutcome};

use crate::{
    client::{Connector, NetworkResolver},
    config::RunConfig,
    metrics::SpamMetrics,
    Result,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Prepares and runs a spam session until `cancel` fires.
///
/// Cancelling during preparation ends the session without sending anything and
/// is not an error.
pub async fn spam<R, K>(
    config: &RunConfig,
    resolver: &R,
    connector: &K,
    metrics: Option<SpamMetrics>,
    cancel: CancellationToken,
) -> Result<RunSummary>
where
    R: NetworkResolver,
    K: Connector,
{
    let prepared = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("cancelled before the spam loop started");
            return Ok(RunSummary::default());
        }
        prepared = prepare_run(config, resolver, connector) => prepared?,
    };

    let spammer = TimedSpammer::new(config, prepared)?.with_metrics(metrics);
    Ok(spammer.run(cancel).await)
}
