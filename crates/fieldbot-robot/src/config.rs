//! Robot configuration.

use std::path::Path;

use fieldbot_driver::DriverInputConfig;
use fieldbot_errors::{FieldbotError, ResultExt, ValidationError};
use fieldbot_scheduler::LoopConfig;
use serde::{Deserialize, Serialize};

use crate::pose::Pose2d;

/// Top-level robot configuration.
///
/// Every section is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// Driver pipeline limits
    pub driver: DriverInputConfig,
    /// Loop timing
    #[serde(rename = "loop")]
    pub loop_config: LoopConfig,
    /// Pose seeded on teleop init when autonomous never ran
    pub default_teleop_pose: Pose2d,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            driver: DriverInputConfig::default(),
            loop_config: LoopConfig::default(),
            default_teleop_pose: Pose2d::new(1.0, 1.0, 0.0),
        }
    }
}

impl RobotConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.driver.validate()?;
        self.loop_config.validate()?;
        if !self.default_teleop_pose.is_finite() {
            return Err(ValidationError::constraint(
                "default_teleop_pose must be finite",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`FieldbotError::Config`] on malformed JSON and
    /// [`FieldbotError::Validation`] on out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, FieldbotError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| FieldbotError::config(format!("invalid robot config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`FieldbotError::Other`] naming the path if the file cannot be
    /// read, otherwise as [`RobotConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FieldbotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(format!("reading robot config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}
