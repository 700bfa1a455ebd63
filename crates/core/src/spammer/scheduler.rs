use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Time between slots for `rate` transactions per second.
pub fn interval_for_rate(rate: u64) -> Duration {
    Duration::from_nanos((NANOS_PER_SEC / rate.max(1)).max(1))
}

/// Emits one slot per interval. Dropping the scheduler stops the timer.
///
/// Slots that come due while the caller is busy collapse into a single pending
/// slot; the rest are dropped. A submission slower than the interval therefore
/// lowers the achieved rate instead of producing a burst afterwards.
#[derive(Debug)]
pub struct RateScheduler {
    interval: Interval,
    period: Duration,
}

impl RateScheduler {
    /// Starts the timer. The first slot is one interval from now.
    pub fn start(rate: u64) -> Self {
        let period = interval_for_rate(rate);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Waits for the next slot. Cancel safe.
    pub async fn next_slot(&mut self) -> Instant {
        self.interval.tick().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_matches_rate() {
        let cases = [
            (1, Duration::from_secs(1)),
            (10, Duration::from_millis(100)),
            (100, Duration::from_millis(10)),
            (1000, Duration::from_millis(1)),
        ];
        for (rate, expected) in cases {
            assert_eq!(interval_for_rate(rate), expected, "rate {rate}");
        }
    }

    #[test]
    fn extreme_rates_keep_a_nonzero_interval() {
        assert_eq!(interval_for_rate(u64::MAX), Duration::from_nanos(1));
    }

    #[tokio::test(start_paused = true)]
    async fn emits_one_slot_per_interval() {
        let start = Instant::now();
        let mut scheduler = RateScheduler::start(10);
        for i in 1..=5u32 {
            scheduler.next_slot().await;
            assert_eq!(start.elapsed(), Duration::from_millis(100) * i);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drops_slots_missed_while_busy() {
        let start = Instant::now();
        let mut scheduler = RateScheduler::start(10);
        scheduler.next_slot().await;
        assert_eq!(start.elapsed(), Duration::from_millis(100));

        // busy through the 200ms, 300ms and 400ms slots
        time::sleep(Duration::from_millis(350)).await;

        // a single buffered slot is available right away...
        scheduler.next_slot().await;
        assert_eq!(start.elapsed(), Duration::from_millis(450));

        // ...and the rest were dropped rather than queued
        scheduler.next_slot().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
