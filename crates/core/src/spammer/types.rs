use super::sequence::SequenceAllocator;
use crate::client::ClientError;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeKind {
    Accepted,
    Rejected,
    TransportError,
}

/// Result of one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted {
        tx_hash: String,
    },
    /// The network answered with a non-zero acceptance code.
    Rejected {
        code: u32,
        tx_hash: String,
        raw_log: String,
    },
    /// No verdict was obtained (timeout, connection failure, signer failure).
    TransportError(ClientError),
}

impl SendOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            SendOutcome::Accepted { .. } => OutcomeKind::Accepted,
            SendOutcome::Rejected { .. } => OutcomeKind::Rejected,
            SendOutcome::TransportError(_) => OutcomeKind::TransportError,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Attempt {
    /// Zero-based index over all attempts, failed ones included.
    pub index: u64,
    pub sequence: u64,
    pub latency: Duration,
    pub outcome: SendOutcome,
}

/// Counters for one run. Owned by the control loop and dropped when it exits.
#[derive(Debug)]
pub struct RunState {
    pub sequence: SequenceAllocator,
    attempts: u64,
    rejected: u64,
    transport_errors: u64,
}

impl RunState {
    pub fn new(base_sequence: u64) -> Self {
        Self {
            sequence: SequenceAllocator::new(base_sequence),
            attempts: 0,
            rejected: 0,
            transport_errors: 0,
        }
    }

    /// Claims the next attempt index.
    pub fn begin_attempt(&mut self) -> u64 {
        let index = self.attempts;
        self.attempts += 1;
        index
    }

    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    pub fn record_transport_error(&mut self) {
        self.transport_errors += 1;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            accepted: self.sequence.accepted(),
            attempts: self.attempts,
            rejected: self.rejected,
            transport_errors: self.transport_errors,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: u64,
    pub attempts: u64,
    pub rejected: u64,
    pub transport_errors: u64,
}
