//! Progress notifications for long-running searches

use chrono::{DateTime, Local};
use std::time::Duration;

/// Snapshot of a search still in progress
#[derive(Debug, Clone)]
pub struct SearchProgress {
    /// Wall-clock time of the snapshot
    pub timestamp: DateTime<Local>,
    /// Next nonce to be tried
    pub nonce: u128,
    /// Number of hash attempts so far
    pub attempts: u128,
    /// Time since the search started
    pub elapsed: Duration,
}

impl SearchProgress {
    /// Hash rate (hashes per second) since the search started
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            self.attempts as f64
        }
    }
}

/// Receives periodic updates from a running search
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &SearchProgress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&SearchProgress),
{
    fn on_progress(&mut self, progress: &SearchProgress) {
        self(progress)
    }
}

/// Observer that ignores every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: &SearchProgress) {}
}
