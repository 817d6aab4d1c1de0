//! Loop configuration.

use std::time::Duration;

use fieldbot_errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Fixed-period loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    /// Loop period in milliseconds
    pub period_ms: u64,
    /// A tick whose measured work exceeds `period * overrun_warn_ratio` is
    /// reported as over budget
    pub overrun_warn_ratio: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period_ms: crate::DEFAULT_PERIOD_MS,
            overrun_warn_ratio: 1.0,
        }
    }
}

impl LoopConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the period is zero or the warn ratio
    /// is not a positive finite number.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.period_ms == 0 {
            return Err(ValidationError::not_positive("period_ms", 0.0));
        }
        if !self.overrun_warn_ratio.is_finite() {
            return Err(ValidationError::not_finite(
                "overrun_warn_ratio",
                self.overrun_warn_ratio,
            ));
        }
        if self.overrun_warn_ratio <= 0.0 {
            return Err(ValidationError::not_positive(
                "overrun_warn_ratio",
                self.overrun_warn_ratio,
            ));
        }
        Ok(())
    }

    /// Loop period.
    #[inline]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Per-tick work budget.
    ///
    /// Falls back to the period itself for a ratio that failed validation.
    pub fn budget(&self) -> Duration {
        if self.validate().is_err() {
            return self.period();
        }
        Duration::try_from_secs_f64(self.period().as_secs_f64() * self.overrun_warn_ratio)
            .unwrap_or_else(|_| self.period())
    }
}
