//! Throttled delivery of snapshots to the caller's callback.

use std::time::{Duration, Instant};

use crate::progress::DownloadProgress;
use crate::throttle::ProgressThrottle;

/// Routes snapshots through a [`ProgressThrottle`] to the progress callback.
///
/// Terminal snapshots are always forced. Once a terminal snapshot has been
/// delivered, every later call is ignored.
pub struct Emitter<'cb> {
    throttle: ProgressThrottle,
    on_progress: &'cb mut dyn FnMut(DownloadProgress),
    terminal_sent: bool,
}

impl<'cb> Emitter<'cb> {
    pub fn new(min_interval: Duration, on_progress: &'cb mut dyn FnMut(DownloadProgress)) -> Self {
        Self {
            throttle: ProgressThrottle::new(min_interval),
            on_progress,
            terminal_sent: false,
        }
    }

    /// Offer a snapshot; returns true if it was delivered.
    pub fn emit(&mut self, snapshot: DownloadProgress, forced: bool) -> bool {
        if self.terminal_sent {
            return false;
        }
        let forced = forced || snapshot.is_terminal();
        if !self.throttle.should_emit(Instant::now(), forced) {
            return false;
        }
        self.terminal_sent = snapshot.is_terminal();
        (self.on_progress)(snapshot);
        true
    }

    pub fn terminal_sent(&self) -> bool {
        self.terminal_sent
    }
}
