//! Per-axis signal conditioner: deadband, scale, slew-rate limit.

use core::time::Duration;

use fieldbot_errors::ValidationError;
use serde::{Deserialize, Serialize};

use crate::deadband::apply_deadband;
use crate::slew_rate::{SlewRateState, slew_rate_filter};

/// Immutable configuration for one [`SignalConditioner`].
///
/// Constructed once through [`ConditionerConfig::new`] (or deserialized, which
/// runs the same checks). An invalid configuration is a construction-time
/// contract violation and never reaches the loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConditionerConfig")]
pub struct ConditionerConfig {
    deadband: f64,
    max_magnitude: f64,
    rate_limit: f64,
}

#[derive(Deserialize)]
struct RawConditionerConfig {
    deadband: f64,
    max_magnitude: f64,
    rate_limit: f64,
}

impl TryFrom<RawConditionerConfig> for ConditionerConfig {
    type Error = ValidationError;

    fn try_from(raw: RawConditionerConfig) -> Result<Self, Self::Error> {
        Self::new(raw.deadband, raw.max_magnitude, raw.rate_limit)
    }
}

impl ConditionerConfig {
    /// Create a validated conditioner configuration.
    ///
    /// # Arguments
    ///
    /// * `deadband` - Deadband threshold on the normalized axis, in `[0, 1)`
    /// * `max_magnitude` - Output at full deflection (e.g. max speed in m/s)
    /// * `rate_limit` - Maximum output change per second
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any field is non-finite, the deadband
    /// is outside `[0, 1)`, or the magnitude or rate limit is negative.
    pub fn new(deadband: f64, max_magnitude: f64, rate_limit: f64) -> Result<Self, ValidationError> {
        if !deadband.is_finite() {
            return Err(ValidationError::not_finite("deadband", deadband));
        }
        if !(0.0..1.0).contains(&deadband) {
            return Err(ValidationError::out_of_range("deadband", deadband, 0.0, 1.0));
        }
        ValidationError::check_non_negative("max_magnitude", max_magnitude)?;
        ValidationError::check_non_negative("rate_limit", rate_limit)?;

        Ok(Self {
            deadband,
            max_magnitude,
            rate_limit,
        })
    }

    /// Deadband threshold on the normalized axis.
    pub fn deadband(&self) -> f64 {
        self.deadband
    }

    /// Output magnitude at full deflection.
    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// Maximum output change per second.
    pub fn rate_limit(&self) -> f64 {
        self.rate_limit
    }
}

/// Deadband + scale + slew-rate limiter for a single axis.
///
/// The only persistent state is the limiter's last output and the timestamp of
/// the last update. `calculate` is meant to be called exactly once per tick.
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    config: ConditionerConfig,
    nominal_period: Duration,
    slew: SlewRateState,
    last_update: Option<Duration>,
}

impl SignalConditioner {
    /// Create a conditioner.
    ///
    /// `nominal_period` is used as `dt` for the very first update, before a
    /// previous timestamp exists.
    pub fn new(config: ConditionerConfig, nominal_period: Duration) -> Self {
        Self {
            config,
            nominal_period,
            slew: SlewRateState::new(config.rate_limit),
            last_update: None,
        }
    }

    /// The configuration this conditioner was built with.
    pub fn config(&self) -> &ConditionerConfig {
        &self.config
    }

    /// Deadband and scale without touching the limiter state.
    ///
    /// This is the pre-slew setpoint `calculate_scaled` feeds to the limiter.
    #[inline]
    pub fn shape(&self, raw: f64, multiplier: f64) -> f64 {
        apply_deadband(raw, self.config.deadband) * self.config.max_magnitude * multiplier
    }

    /// Condition `raw` with a unit runtime multiplier.
    #[inline]
    pub fn calculate(&mut self, raw: f64, now: Duration) -> f64 {
        self.calculate_scaled(raw, 1.0, now)
    }

    /// Condition `raw`, scaling by `multiplier` on top of the configured
    /// maximum magnitude.
    ///
    /// `now` is the scheduler timestamp of the current tick; the limiter bound
    /// is `rate_limit × (now − previous now)`.
    pub fn calculate_scaled(&mut self, raw: f64, multiplier: f64, now: Duration) -> f64 {
        let target = self.shape(raw, multiplier);
        let dt = match self.last_update {
            Some(previous) => now.saturating_sub(previous),
            None => self.nominal_period,
        };
        self.last_update = Some(now);
        slew_rate_filter(target, dt, &mut self.slew)
    }

    /// Output of the most recent `calculate` call.
    pub fn last_output(&self) -> f64 {
        self.slew.prev_output
    }

    /// Timestamp of the most recent `calculate` call, if any.
    pub fn last_update(&self) -> Option<Duration> {
        self.last_update
    }

    /// Forget the limiter history.
    pub fn reset_state(&mut self) {
        self.slew.prev_output = 0.0;
        self.last_update = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterState;
    use approx::assert_abs_diff_eq;

    const TICK: Duration = Duration::from_millis(20);

    fn conditioner(rate_limit: f64) -> Result<SignalConditioner, ValidationError> {
        Ok(SignalConditioner::new(
            ConditionerConfig::new(0.2, 4.0, rate_limit)?,
            TICK,
        ))
    }

    #[test]
    fn test_config_rejects_negative_rate() {
        assert_eq!(
            ConditionerConfig::new(0.2, 4.0, -1.0),
            Err(ValidationError::negative("rate_limit", -1.0))
        );
    }

    #[test]
    fn test_config_rejects_bad_deadband() {
        assert!(ConditionerConfig::new(1.0, 4.0, 8.0).is_err());
        assert!(ConditionerConfig::new(-0.1, 4.0, 8.0).is_err());
        assert!(ConditionerConfig::new(f64::NAN, 4.0, 8.0).is_err());
    }

    #[test]
    fn test_config_deserialize_validates() {
        let ok: Result<ConditionerConfig, _> =
            serde_json::from_str(r#"{"deadband":0.1,"max_magnitude":3.0,"rate_limit":5.0}"#);
        assert!(ok.is_ok());

        let bad: Result<ConditionerConfig, _> =
            serde_json::from_str(r#"{"deadband":0.1,"max_magnitude":3.0,"rate_limit":-5.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_shape_matches_worked_example() -> Result<(), ValidationError> {
        let c = conditioner(1.0e6)?;
        // (0.5 - 0.2) / (1 - 0.2) * 4.0 * 0.7
        assert_abs_diff_eq!(c.shape(0.5, 0.7), 1.05, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_first_update_uses_nominal_period() -> Result<(), ValidationError> {
        let mut c = conditioner(8.0)?;
        let out = c.calculate(1.0, Duration::from_secs(5));
        assert_abs_diff_eq!(out, 0.16, epsilon = 1e-12);
        assert_eq!(c.last_update(), Some(Duration::from_secs(5)));
        Ok(())
    }

    #[test]
    fn test_rate_follows_timestamps() -> Result<(), ValidationError> {
        let mut c = conditioner(8.0)?;
        c.calculate(1.0, Duration::from_millis(0));
        // 50 ms later the limiter may move 0.4
        let out = c.calculate(1.0, Duration::from_millis(50));
        assert_abs_diff_eq!(out, 0.16 + 0.4, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_repeated_timestamp_holds_output() -> Result<(), ValidationError> {
        let mut c = conditioner(8.0)?;
        let first = c.calculate(1.0, TICK);
        let second = c.calculate(1.0, TICK);
        assert_abs_diff_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_reset_clears_history() -> Result<(), ValidationError> {
        let mut c = conditioner(8.0)?;
        c.calculate(1.0, TICK);
        c.reset();
        assert_eq!(c.last_output(), 0.0);
        assert_eq!(c.last_update(), None);
        Ok(())
    }
}
