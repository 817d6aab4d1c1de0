//! Driver input configuration.

use fieldbot_errors::ValidationError;
use fieldbot_filters::ConditionerConfig;
use serde::{Deserialize, Serialize};

/// Limits and shaping constants for the driver pipeline.
///
/// Constructed once at startup and never mutated while the loop runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverInputConfig {
    /// Forward/backward speed at full deflection, m/s
    pub max_fwd_rev_speed_mps: f64,
    /// Strafe speed at full deflection, m/s
    pub max_strafe_speed_mps: f64,
    /// Rotation speed at full deflection, rad/s
    pub max_rotate_speed_radps: f64,
    /// Translational slew limit, m/s²
    pub max_translate_accel_mps2: f64,
    /// Rotational slew limit, rad/s²
    pub max_rotate_accel_radps2: f64,
    /// Stick deadband on the normalized axis
    pub deadband: f64,
    /// Translational multiplier while the speed button is released
    pub reduced_speed_multiplier: f64,
    /// Fixed rotational multiplier
    pub rotation_derate: f64,
    /// Controller slot
    pub controller_index: u32,
}

impl Default for DriverInputConfig {
    fn default() -> Self {
        Self {
            max_fwd_rev_speed_mps: 4.0,
            max_strafe_speed_mps: 4.0,
            max_rotate_speed_radps: 6.0,
            max_translate_accel_mps2: 8.0,
            max_rotate_accel_radps2: 12.0,
            deadband: 0.2,
            reduced_speed_multiplier: 0.7,
            rotation_derate: 0.8,
            controller_index: 0,
        }
    }
}

impl DriverInputConfig {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: a negative or non-finite
    /// speed or acceleration, a deadband outside `[0, 1)`, or a multiplier
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.forward_conditioner()?;
        self.strafe_conditioner()?;
        self.rotate_conditioner()?;
        ValidationError::check_range(
            "reduced_speed_multiplier",
            self.reduced_speed_multiplier,
            0.0,
            1.0,
        )?;
        ValidationError::check_range("rotation_derate", self.rotation_derate, 0.0, 1.0)?;
        Ok(())
    }

    /// Conditioner for the forward axis.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the underlying limits are invalid.
    pub fn forward_conditioner(&self) -> Result<ConditionerConfig, ValidationError> {
        ConditionerConfig::new(
            self.deadband,
            self.max_fwd_rev_speed_mps,
            self.max_translate_accel_mps2,
        )
    }

    /// Conditioner for the strafe axis.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the underlying limits are invalid.
    pub fn strafe_conditioner(&self) -> Result<ConditionerConfig, ValidationError> {
        ConditionerConfig::new(
            self.deadband,
            self.max_strafe_speed_mps,
            self.max_translate_accel_mps2,
        )
    }

    /// Conditioner for the rotation axis.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the underlying limits are invalid.
    pub fn rotate_conditioner(&self) -> Result<ConditionerConfig, ValidationError> {
        ConditionerConfig::new(
            self.deadband,
            self.max_rotate_speed_radps,
            self.max_rotate_accel_radps2,
        )
    }

    /// Name of the connectivity fault for this controller.
    pub fn unplugged_fault_name(&self) -> String {
        format!("Driver controller ({}) unplugged", self.controller_index)
    }
}
