use std::time::{Duration, Instant};

/// Fixed-period deadline checked from the UI loop.
///
/// The engine owns at most one of these; replacing it is how the timer is
/// cleared and restarted.
#[derive(Debug, Clone)]
pub struct ProgressTimer {
    period: Duration,
    next_due: Instant,
}

impl ProgressTimer {
    pub fn start(now: Instant, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Returns true at most once per elapsed period. Missed periods collapse
    /// into a single fire.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }
}
