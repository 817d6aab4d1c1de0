//! Phase-based mode scheduling for the fieldbot control core.
//!
//! A competition robot runs one fixed-period loop. Each tick the competition
//! control system requests one of three [`Mode`]s; the [`ModeScheduler`] turns
//! changes of that request into edge-triggered hook calls on a [`PhaseHooks`]
//! implementation and dispatches the periodic hooks while a mode is active.
//!
//! This crate provides:
//!
//! - **ModeScheduler**: the phase state machine and sole writer of the current mode
//! - **SegmentTimeTracker**: scoped start/mark/end timing of one loop tick
//! - **LoopTimer**: absolute-deadline pacing of the host loop
//! - **LoopMetrics**: lateness statistics with percentile estimation
//!
//! # Tick order
//!
//! ```text
//!  requested != current ?
//!      ├── yes: current.exit()  ─►  requested.init()
//!      └── no
//!  requested.periodic()
//!  robot_periodic()
//! ```
//!
//! A failing hook aborts the tick and is returned to the caller as a
//! [`SchedulerError`]. Nothing is retried here; the host decides.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use fieldbot_errors::HookResult;
//! use fieldbot_scheduler::{Mode, ModeScheduler, PhaseContext, PhaseHooks};
//!
//! #[derive(Default)]
//! struct Counter { teleop_ticks: u32 }
//!
//! impl PhaseHooks for Counter {
//!     fn teleop_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
//!         self.teleop_ticks += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut scheduler = ModeScheduler::new();
//! let mut robot = Counter::default();
//! for i in 0..3 {
//!     scheduler.tick(&mut robot, Mode::Teleop, Duration::from_millis(20 * i))?;
//! }
//! assert_eq!(robot.teleop_ticks, 3);
//! # Ok::<(), fieldbot_scheduler::SchedulerError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod mode;
pub mod scheduler;
pub mod segment;
pub mod timer;

pub mod prelude;

pub use config::LoopConfig;
pub use error::{HookKind, SchedulerError, SchedulerResult};
pub use metrics::{LoopMetrics, LoopMetricsSummary};
pub use mode::{Mode, PhaseContext, PhaseHooks};
pub use scheduler::{ModeScheduler, TickOutcome, Transition};
pub use segment::{SegmentSample, SegmentStats, SegmentTimeTracker};
pub use timer::LoopTimer;

/// Default loop period (50 Hz) in milliseconds.
pub const DEFAULT_PERIOD_MS: u64 = 20;
