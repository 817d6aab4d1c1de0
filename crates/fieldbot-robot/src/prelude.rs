//! Prelude for building and hosting a robot.

pub use crate::config::RobotConfig;
pub use crate::host::{ModeSource, RobotLoop, RunSummary};
pub use crate::pose::{Pose2d, TrajectoryCommand};
pub use crate::robot::{Robot, RobotParts, segments};
pub use crate::telemetry::TelemetryFrame;
pub use crate::timer::PhaseTimer;
pub use crate::traits::{AutoSequencer, Drivetrain, HealthMonitor, Subsystem, TelemetrySink};
