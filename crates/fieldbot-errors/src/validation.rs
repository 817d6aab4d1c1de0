//! Configuration contract violations.
//!
//! Raised when configuration structs are constructed; never expected while
//! the loop is running.

use core::fmt;

use crate::common::ErrorSeverity;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value out of range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Minimum allowed value
        min: String,
        /// Maximum allowed value
        max: String,
    },

    /// Value must not be negative
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
    },

    /// Value must be a finite number
    #[error("{field} must be finite (got {value})")]
    NotFinite {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
    },

    /// Value must be strictly positive
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
    },

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Create an out of range error for a numeric value.
    pub fn out_of_range<T: fmt::Debug>(field: impl Into<String>, value: T, min: T, max: T) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value: format!("{value:?}"),
            min: format!("{min:?}"),
            max: format!("{max:?}"),
        }
    }

    /// Create a negative value error.
    pub fn negative<T: fmt::Debug>(field: impl Into<String>, value: T) -> Self {
        ValidationError::Negative {
            field: field.into(),
            value: format!("{value:?}"),
        }
    }

    /// Create a non-finite value error.
    pub fn not_finite<T: fmt::Debug>(field: impl Into<String>, value: T) -> Self {
        ValidationError::NotFinite {
            field: field.into(),
            value: format!("{value:?}"),
        }
    }

    /// Create a non-positive value error.
    pub fn not_positive<T: fmt::Debug>(field: impl Into<String>, value: T) -> Self {
        ValidationError::NotPositive {
            field: field.into(),
            value: format!("{value:?}"),
        }
    }

    /// Create a constraint violation error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        ValidationError::ConstraintViolation(msg.into())
    }

    /// Check a floating point field is finite and not negative.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotFinite`] or [`ValidationError::Negative`].
    pub fn check_non_negative(field: &str, value: f64) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::not_finite(field, value));
        }
        if value < 0.0 {
            return Err(Self::negative(field, value));
        }
        Ok(())
    }

    /// Check a floating point field lies in `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotFinite`] or [`ValidationError::OutOfRange`].
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::not_finite(field, value));
        }
        if value < min || value > max {
            return Err(Self::out_of_range(field, value, min, max));
        }
        Ok(())
    }
}
