//! Prelude module for common scheduler types.

pub use crate::config::LoopConfig;
pub use crate::error::{HookKind, SchedulerError, SchedulerResult};
pub use crate::metrics::{LoopMetrics, LoopMetricsSummary};
pub use crate::mode::{Mode, PhaseContext, PhaseHooks};
pub use crate::scheduler::{ModeScheduler, TickOutcome, Transition};
pub use crate::segment::{SegmentSample, SegmentStats, SegmentTimeTracker};
pub use crate::timer::LoopTimer;
pub use crate::DEFAULT_PERIOD_MS;
