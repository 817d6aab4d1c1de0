//! Loop lateness metrics.
//!
//! Tracks how late each tick started relative to its absolute deadline, plus
//! overrun counts. Percentiles come from a bounded ring buffer of recent
//! samples.

use serde::Serialize;

/// Lateness statistics for the host loop.
///
/// `record_tick` is O(1) amortized and does not allocate once the ring buffer
/// has filled.
#[derive(Debug, Clone)]
pub struct LoopMetrics {
    /// Total number of ticks recorded
    pub total_ticks: u64,

    /// Ticks that started after their deadline
    pub overruns: u64,

    /// Largest observed lateness in nanoseconds
    pub max_lateness_ns: u64,

    /// Lateness of the most recent tick
    pub last_lateness_ns: u64,

    lateness_sum_ns: u128,
    samples: Vec<u64>,
    max_samples: usize,
    next_sample: usize,
    scratch: Vec<u64>,
}

/// Serializable summary of [`LoopMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopMetricsSummary {
    /// Total ticks
    pub total_ticks: u64,
    /// Late ticks
    pub overruns: u64,
    /// Overrun fraction, 0.0 to 1.0
    pub overrun_rate: f64,
    /// Mean lateness in microseconds
    pub mean_lateness_us: f64,
    /// Median lateness in microseconds
    pub p50_lateness_us: f64,
    /// 99th percentile lateness in microseconds
    pub p99_lateness_us: f64,
    /// Maximum lateness in microseconds
    pub max_lateness_us: f64,
}

impl Default for LoopMetrics {
    fn default() -> Self {
        // 10 s of history at 50 Hz
        Self::with_capacity(500)
    }
}

impl LoopMetrics {
    /// Create a collector with the default history length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that keeps `max_samples` recent samples.
    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            total_ticks: 0,
            overruns: 0,
            max_lateness_ns: 0,
            last_lateness_ns: 0,
            lateness_sum_ns: 0,
            samples: Vec::with_capacity(max_samples),
            max_samples,
            next_sample: 0,
            scratch: Vec::with_capacity(max_samples),
        }
    }

    /// Record one tick.
    pub fn record_tick(&mut self, lateness_ns: u64, overrun: bool) {
        self.total_ticks += 1;
        if overrun {
            self.overruns += 1;
        }
        self.max_lateness_ns = self.max_lateness_ns.max(lateness_ns);
        self.last_lateness_ns = lateness_ns;
        self.lateness_sum_ns += u128::from(lateness_ns);

        if self.max_samples == 0 {
            return;
        }

        if self.samples.len() < self.max_samples {
            self.samples.push(lateness_ns);
        } else if let Some(slot) = self.samples.get_mut(self.next_sample) {
            *slot = lateness_ns;
            self.next_sample = (self.next_sample + 1) % self.max_samples;
        }
    }

    /// Lateness at `percentile` (0.0 to 1.0) over the retained samples.
    pub fn percentile_lateness_ns(&mut self, percentile: f64) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }
        let percentile = if percentile.is_nan() {
            0.5
        } else {
            percentile.clamp(0.0, 1.0)
        };

        self.scratch.clear();
        self.scratch.extend_from_slice(&self.samples);

        let len = self.scratch.len();
        let index = ((len as f64 * percentile) as usize).min(len - 1);
        let (_, value, _) = self.scratch.select_nth_unstable(index);
        *value
    }

    /// Median lateness.
    pub fn p50_lateness_ns(&mut self) -> u64 {
        self.percentile_lateness_ns(0.50)
    }

    /// 99th percentile lateness.
    pub fn p99_lateness_ns(&mut self) -> u64 {
        self.percentile_lateness_ns(0.99)
    }

    /// Mean lateness over all ticks.
    pub fn mean_lateness_ns(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.lateness_sum_ns as f64 / self.total_ticks as f64
    }

    /// Overrun fraction (0.0 to 1.0).
    pub fn overrun_rate(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.overruns as f64 / self.total_ticks as f64
        }
    }

    /// Retained sample count.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Summary for logs and reports.
    pub fn summary(&mut self) -> LoopMetricsSummary {
        const NS_PER_US: f64 = 1_000.0;
        LoopMetricsSummary {
            total_ticks: self.total_ticks,
            overruns: self.overruns,
            overrun_rate: self.overrun_rate(),
            mean_lateness_us: self.mean_lateness_ns() / NS_PER_US,
            p50_lateness_us: self.p50_lateness_ns() as f64 / NS_PER_US,
            p99_lateness_us: self.p99_lateness_ns() as f64 / NS_PER_US,
            max_lateness_us: self.max_lateness_ns as f64 / NS_PER_US,
        }
    }

    /// Reset all metrics.
    pub fn reset(&mut self) {
        self.total_ticks = 0;
        self.overruns = 0;
        self.max_lateness_ns = 0;
        self.last_lateness_ns = 0;
        self.lateness_sum_ns = 0;
        self.samples.clear();
        self.next_sample = 0;
        self.scratch.clear();
    }
}
