//! Per-tick segment timing.
//!
//! Each loop tick is bracketed by `start` and `end`, with `mark(name)` closing
//! one named segment at a time:
//!
//! ```text
//! start ──► mark("Driver Interface") ──► mark("Drivetrain") ──► mark("Telemetry") ──► end
//! ```
//!
//! A tick left open (a `start` with no matching `end`) is closed by the next
//! `start`, so timing state never leaks across ticks. Use
//! [`SegmentTimeTracker::measure`] to get the bracketing for free.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

/// Accumulated statistics for one named segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentStats {
    /// Segment name
    pub name: &'static str,
    /// Duration in the most recent tick
    pub last: Duration,
    /// Longest observed duration
    pub max: Duration,
    /// Number of samples
    pub count: u64,
    total: Duration,
}

impl SegmentStats {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            last: Duration::ZERO,
            max: Duration::ZERO,
            count: 0,
            total: Duration::ZERO,
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.last = elapsed;
        self.max = self.max.max(elapsed);
        self.total = self.total.saturating_add(elapsed);
        self.count += 1;
    }

    /// Mean duration over all samples.
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total / n,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.count as f64),
        }
    }
}

/// Serializable view of one segment, in microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSample {
    /// Segment name
    pub name: &'static str,
    /// Last duration
    pub last_us: u64,
    /// Longest duration
    pub max_us: u64,
    /// Mean duration
    pub mean_us: u64,
}

/// Start/mark/end timer for the every-mode periodic work.
#[derive(Debug, Clone)]
pub struct SegmentTimeTracker {
    budget: Duration,
    segments: Vec<SegmentStats>,
    tick_start: Option<Instant>,
    last_mark: Option<Instant>,
    last_total: Duration,
    max_total: Duration,
    ticks: u64,
    over_budget: u64,
    unclosed: u64,
}

impl SegmentTimeTracker {
    /// Create a tracker that warns when a tick exceeds `budget`.
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            segments: Vec::with_capacity(8),
            tick_start: None,
            last_mark: None,
            last_total: Duration::ZERO,
            max_total: Duration::ZERO,
            ticks: 0,
            over_budget: 0,
            unclosed: 0,
        }
    }

    /// Open a tick now.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Close the segment that began at the previous start or mark.
    pub fn mark(&mut self, name: &'static str) {
        self.mark_at(name, Instant::now());
    }

    /// Close the tick now.
    pub fn end(&mut self) {
        self.end_at(Instant::now());
    }

    /// Open a tick at `now`. Closes a tick left open by a missing `end`.
    pub fn start_at(&mut self, now: Instant) {
        if self.tick_start.is_some() {
            self.unclosed += 1;
            debug!("segment tick left open, closing it");
            self.end_at(now);
        }
        self.tick_start = Some(now);
        self.last_mark = Some(now);
    }

    /// Close a segment at `now`. Ignored outside a tick.
    pub fn mark_at(&mut self, name: &'static str, now: Instant) {
        let Some(last) = self.last_mark else {
            return;
        };
        let elapsed = now.saturating_duration_since(last);
        match self.segments.iter_mut().find(|s| s.name == name) {
            Some(stats) => stats.record(elapsed),
            None => {
                let mut stats = SegmentStats::new(name);
                stats.record(elapsed);
                self.segments.push(stats);
            }
        }
        self.last_mark = Some(now);
    }

    /// Close the tick at `now`. Ignored outside a tick.
    pub fn end_at(&mut self, now: Instant) {
        let Some(start) = self.tick_start.take() else {
            return;
        };
        self.last_mark = None;

        let total = now.saturating_duration_since(start);
        self.last_total = total;
        self.max_total = self.max_total.max(total);
        self.ticks += 1;

        if total > self.budget {
            self.over_budget += 1;
            warn!(
                total_us = total.as_micros() as u64,
                budget_us = self.budget.as_micros() as u64,
                "loop tick over budget"
            );
        }
    }

    /// Run `f` inside a start/end bracket. The tick is closed whatever `f`
    /// returns.
    pub fn measure<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.start();
        let result = f(self);
        self.end();
        result
    }

    /// Whether a tick is open.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.tick_start.is_some()
    }

    /// Statistics for a segment.
    pub fn segment(&self, name: &str) -> Option<&SegmentStats> {
        self.segments.iter().find(|s| s.name == name)
    }

    /// All segments, in first-seen order.
    pub fn segments(&self) -> &[SegmentStats] {
        &self.segments
    }

    /// Serializable view of all segments.
    pub fn snapshot(&self) -> Vec<SegmentSample> {
        self.segments
            .iter()
            .map(|s| SegmentSample {
                name: s.name,
                last_us: s.last.as_micros() as u64,
                max_us: s.max.as_micros() as u64,
                mean_us: s.mean().as_micros() as u64,
            })
            .collect()
    }

    /// Duration of the most recent closed tick.
    pub fn last_total(&self) -> Duration {
        self.last_total
    }

    /// Longest closed tick.
    pub fn max_total(&self) -> Duration {
        self.max_total
    }

    /// Closed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks that exceeded the budget.
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }

    /// Ticks that were closed by a later `start` instead of `end`.
    pub fn unclosed(&self) -> u64 {
        self.unclosed
    }

    /// Per-tick budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }
}
