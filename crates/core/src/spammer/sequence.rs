/// Hands out account sequence numbers without asking the network per transaction.
///
/// The base is read once before the run. Only accepted submissions advance the
/// counter, so a rejected or failed attempt leaves the same sequence in place for
/// the next slot. That is the whole retry mechanism: do not add another one on
/// top, or sequences will be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceAllocator {
    base: u64,
    accepted: u64,
}

impl SequenceAllocator {
    pub fn new(base: u64) -> Self {
        Self { base, accepted: 0 }
    }

    pub fn current(&self) -> u64 {
        self.base + self.accepted
    }

    /// Call only after the network accepted the transaction using [`Self::current`].
    pub fn advance(&mut self) {
        self.accepted += 1;
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}
