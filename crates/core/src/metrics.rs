use crate::spammer::OutcomeKind;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};
use std::time::Duration;

/// Prometheus instruments for a spam run.
#[derive(Clone, Debug)]
pub struct SpamMetrics {
    outcomes: IntCounterVec,
    submit_latency: Histogram,
}

impl SpamMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let outcomes = IntCounterVec::new(
            Opts::new("spamtx_submissions_total", "Submissions by outcome"),
            &["outcome"],
        )?;
        let submit_latency = Histogram::with_opts(
            HistogramOpts::new(
                "spamtx_submit_latency_seconds",
                "Time spent in sign-and-submit",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ]),
        )?;
        registry.register(Box::new(outcomes.clone()))?;
        registry.register(Box::new(submit_latency.clone()))?;
        Ok(Self {
            outcomes,
            submit_latency,
        })
    }

    pub fn record(&self, kind: OutcomeKind, latency: Duration) {
        self.outcomes.with_label_values(&[kind.as_ref()]).inc();
        self.submit_latency.observe(latency.as_secs_f64());
    }

    pub fn count(&self, kind: OutcomeKind) -> u64 {
        self.outcomes.with_label_values(&[kind.as_ref()]).get()
    }

    /// Mean submit latency, or `None` before the first submission.
    pub fn mean_latency(&self) -> Option<Duration> {
        let n = self.submit_latency.get_sample_count();
        if n == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(
            self.submit_latency.get_sample_sum() / n as f64,
        ))
    }
}
