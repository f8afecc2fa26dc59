use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Repeating countdown driven by elapsed wall time.
///
/// The host feeds it whatever time passed since the last call and gets back
/// the number of whole intervals that became due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    interval: Duration,
    pending: Duration,
}

impl Countdown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.pending += elapsed;
        let mut due = 0;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            due += 1;
        }
        due
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}
