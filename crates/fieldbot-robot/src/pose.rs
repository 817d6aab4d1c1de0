//! Planar pose and trajectory command.

use fieldbot_driver::DrivetrainCommand;
use serde::{Deserialize, Serialize};

/// Field-relative robot pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2d {
    /// X position, m
    pub x_m: f64,
    /// Y position, m
    pub y_m: f64,
    /// Heading, rad
    pub heading_rad: f64,
}

impl Pose2d {
    /// Field origin, heading zero.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a pose.
    pub const fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            x_m,
            y_m,
            heading_rad,
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x_m.is_finite() && self.y_m.is_finite() && self.heading_rad.is_finite()
    }
}

/// One sample of a pre-planned trajectory for the drivetrain to track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryCommand {
    /// Desired pose
    pub pose: Pose2d,
    /// Feed-forward velocity
    pub velocity: DrivetrainCommand,
}
