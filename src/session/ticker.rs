// Ticker - Converts wall clock into logical one-second ticks

use std::time::{Duration, Instant};

/// Default logical tick length
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Wall-clock to logical-tick converter
///
/// Yields at most one tick per `poll`. When the host falls behind by more than
/// one interval the backlog is dropped instead of replayed.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
    dropped: u64,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            // Zero would tick on every poll
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
            dropped: 0,
        }
    }

    /// Schedule the next tick one interval after `now`
    pub fn rearm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Stop ticking until the next `rearm`
    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Check whether a tick is due at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let late = now.duration_since(due);
        let missed = (late.as_nanos() / self.interval.as_nanos()) as u64;
        if missed > 0 {
            self.dropped += missed;
            tracing::debug!(missed, total_dropped = self.dropped, "Dropped tick backlog");
            self.next_due = Some(now + self.interval);
        } else {
            self.next_due = Some(due + self.interval);
        }
        true
    }

    /// Time left before the next tick, `None` when disarmed
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks skipped because the host fell behind
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
