//! Competition robot built on the fieldbot control core.
//!
//! [`Robot`] implements [`PhaseHooks`](fieldbot_scheduler::PhaseHooks) and owns
//! every subsystem explicitly: the driver pipeline, the drivetrain, the
//! autonomous sequencer, the telemetry sink and an optional health monitor.
//! Collaborators are reached only through the narrow traits in [`traits`].
//!
//! [`RobotLoop`] hosts the robot: it paces the loop, asks a [`ModeSource`]
//! which mode the competition control system wants, and drives the
//! [`ModeScheduler`](fieldbot_scheduler::ModeScheduler). On a hook failure it
//! disables outputs and tears the robot down.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod host;
pub mod pose;
pub mod prelude;
pub mod robot;
pub mod telemetry;
pub mod timer;
pub mod traits;

pub use config::RobotConfig;
pub use host::{ModeSource, RobotLoop, RunSummary};
pub use pose::{Pose2d, TrajectoryCommand};
pub use robot::{Robot, RobotParts, segments};
pub use telemetry::TelemetryFrame;
pub use timer::PhaseTimer;
pub use traits::{AutoSequencer, Drivetrain, HealthMonitor, Subsystem, TelemetrySink};
