//! Rate limiting for progress notifications.
//!
//! [`ProgressThrottle`] gates the consumer-facing snapshot stream on elapsed
//! time alone. [`NotifyThrottle`] serves slower observers (status line,
//! desktop notification) and also fires whenever the integer percent changes.
//! Forced calls always pass; callers force the first, last and error snapshot.

use std::time::{Duration, Instant};

/// Default interval between consumer-facing progress snapshots.
pub const DEFAULT_UI_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Default interval between low-frequency notifications.
pub const DEFAULT_NOTIFY_MIN_INTERVAL: Duration = Duration::from_millis(300);

/// Time-based throttle: passes a call when forced, when nothing has passed
/// yet, or when at least `min_interval` elapsed since the last pass.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    min_interval: Duration,
    last_emitted_at: Option<Instant>,
}

impl ProgressThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emitted_at: None,
        }
    }

    /// Instant of the last approved call, if any.
    pub fn last_emitted_at(&self) -> Option<Instant> {
        self.last_emitted_at
    }

    /// Returns true if a snapshot taken at `now` should be delivered, and
    /// records `now` as the last emission when it does.
    pub fn should_emit(&mut self, now: Instant, forced: bool) -> bool {
        if !forced && !self.interval_elapsed(now) {
            return false;
        }
        // Never move the mark backwards on an out-of-order clock reading.
        self.last_emitted_at = Some(match self.last_emitted_at {
            Some(last) => last.max(now),
            None => now,
        });
        true
    }

    fn interval_elapsed(&self, now: Instant) -> bool {
        match self.last_emitted_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        }
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_UI_MIN_INTERVAL)
    }
}

/// Throttle for low-frequency observers: passes when forced, when the integer
/// percent differs from the last notified one, or when the interval elapsed.
#[derive(Debug, Clone)]
pub struct NotifyThrottle {
    min_interval: Duration,
    last_notified_at: Option<Instant>,
    last_percent: Option<u8>,
}

impl NotifyThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_notified_at: None,
            last_percent: None,
        }
    }

    pub fn should_notify(&mut self, now: Instant, percent: u8, forced: bool) -> bool {
        let percent_changed = self.last_percent != Some(percent);
        let interval_elapsed = match self.last_notified_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if !(forced || percent_changed || interval_elapsed) {
            return false;
        }
        self.last_percent = Some(percent);
        self.last_notified_at = Some(match self.last_notified_at {
            Some(last) => last.max(now),
            None => now,
        });
        true
    }
}

impl Default for NotifyThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_MIN_INTERVAL)
    }
}
