//! Phase timer.

use std::time::{Duration, Instant};

/// Monotonic stopwatch for the current phase.
///
/// Started on autonomous init and restarted once setup is done, so the
/// elapsed time excludes setup cost.
#[derive(Debug, Clone, Default)]
pub struct PhaseTimer {
    started: Option<Instant>,
}

impl PhaseTimer {
    /// Create a stopped timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer if it is not already running.
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Restart from zero.
    pub fn restart(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stop the timer.
    pub fn stop(&mut self) {
        self.started = None;
    }

    /// Time since the last (re)start, zero when stopped.
    pub fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    /// Whether the timer is running.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }
}
