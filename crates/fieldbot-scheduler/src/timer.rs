//! Fixed-period loop pacing.
//!
//! The timer keeps an absolute deadline for every tick rather than sleeping a
//! fixed period after the work, so work time does not accumulate as drift.
//! The final stretch before a deadline is spun to avoid oversleeping.
//!
//! A tick that starts a full period or more late is an overrun; the deadline
//! is then resynchronised to "now" instead of firing the missed ticks
//! back-to-back.

use std::time::{Duration, Instant};

use fieldbot_errors::ValidationError;
use tracing::warn;

use crate::config::LoopConfig;
use crate::metrics::LoopMetrics;

/// Sleep this close to the deadline, then spin.
const SPIN_THRESHOLD: Duration = Duration::from_micros(200);

/// Absolute-deadline pacer for the host loop.
#[derive(Debug)]
pub struct LoopTimer {
    period: Duration,
    origin: Instant,
    next_tick: Instant,
    tick_count: u64,
    metrics: LoopMetrics,
}

impl LoopTimer {
    /// Create a timer with the given period. The first tick is due
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `period` is zero.
    pub fn with_period(period: Duration) -> Result<Self, ValidationError> {
        if period.is_zero() {
            return Err(ValidationError::not_positive("period", 0.0));
        }
        let origin = Instant::now();
        Ok(Self {
            period,
            origin,
            next_tick: origin,
            tick_count: 0,
            metrics: LoopMetrics::new(),
        })
    }

    /// Create a timer from a loop configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the configuration is invalid.
    pub fn from_config(config: &LoopConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Self::with_period(config.period())
    }

    /// Block until the next tick is due.
    ///
    /// Returns the tick timestamp measured from timer creation; this is the
    /// value to pass to the scheduler.
    pub fn wait_for_tick(&mut self) -> Duration {
        let now = Instant::now();
        let late = now >= self.next_tick;
        let lateness = now.saturating_duration_since(self.next_tick);

        if !late {
            sleep_until(self.next_tick);
        }

        let overrun = lateness >= self.period;
        self.metrics
            .record_tick(lateness.as_nanos() as u64, overrun);
        self.tick_count += 1;

        if overrun {
            warn!(
                tick = self.tick_count,
                late_ms = lateness.as_secs_f64() * 1_000.0,
                "loop overrun, resynchronising"
            );
            self.next_tick = now + self.period;
        } else {
            self.next_tick += self.period;
        }

        self.origin.elapsed()
    }

    /// Loop period.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks delivered so far.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Lateness metrics.
    #[inline]
    pub fn metrics(&self) -> &LoopMetrics {
        &self.metrics
    }

    /// Mutable lateness metrics for percentile queries.
    #[inline]
    pub fn metrics_mut(&mut self) -> &mut LoopMetrics {
        &mut self.metrics
    }

    /// Restart pacing from now.
    pub fn reset(&mut self) {
        self.origin = Instant::now();
        self.next_tick = self.origin;
        self.tick_count = 0;
        self.metrics.reset();
    }
}

fn sleep_until(target: Instant) {
    let now = Instant::now();
    if target <= now {
        return;
    }
    let remaining = target - now;
    if remaining > SPIN_THRESHOLD {
        std::thread::sleep(remaining - SPIN_THRESHOLD);
    }
    while Instant::now() < target {
        std::hint::spin_loop();
    }
}
