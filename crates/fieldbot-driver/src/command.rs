//! Drivetrain velocity command.

use serde::{Deserialize, Serialize};

/// Velocity command handed to the drivetrain once per tick.
///
/// A plain value: built fresh every tick and copied to the consumer. Bounds are
/// enforced by whoever produces it, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrivetrainCommand {
    /// Forward/backward velocity, m/s
    pub vel_x_mps: f64,
    /// Lateral (strafe) velocity, m/s
    pub vel_y_mps: f64,
    /// Rotational velocity, rad/s
    pub vel_t_radps: f64,
}

impl DrivetrainCommand {
    /// All-zero command.
    pub const ZERO: Self = Self {
        vel_x_mps: 0.0,
        vel_y_mps: 0.0,
        vel_t_radps: 0.0,
    };

    /// Create a command.
    pub const fn new(vel_x_mps: f64, vel_y_mps: f64, vel_t_radps: f64) -> Self {
        Self {
            vel_x_mps,
            vel_y_mps,
            vel_t_radps,
        }
    }

    /// Whether every component is exactly zero.
    pub fn is_stopped(&self) -> bool {
        *self == Self::ZERO
    }
}
