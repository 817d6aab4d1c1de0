//! Phase-hook failures.
//!
//! Anything raised inside a phase hook is surfaced to the host loop unchanged.
//! The host is expected to disable outputs; nothing here is retried.

use crate::common::ErrorSeverity;

/// Failure raised by a phase hook or by a collaborator it called.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HookError {
    /// A subsystem (drivetrain, pose estimator, ...) reported a failure
    #[error("{subsystem} failed: {reason}")]
    Subsystem {
        /// Subsystem name
        subsystem: String,
        /// Failure description
        reason: String,
    },

    /// The autonomous sequencing engine failed
    #[error("Autonomous sequencer failed: {0}")]
    Sequencer(String),

    /// The telemetry or log sink failed
    #[error("Telemetry sink failed: {0}")]
    Telemetry(String),
}

impl HookError {
    /// Get the error severity.
    ///
    /// Every hook failure is critical: the host must disable outputs.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }

    /// Create a subsystem failure.
    pub fn subsystem(subsystem: impl Into<String>, reason: impl Into<String>) -> Self {
        HookError::Subsystem {
            subsystem: subsystem.into(),
            reason: reason.into(),
        }
    }

    /// Create a sequencer failure.
    pub fn sequencer(reason: impl Into<String>) -> Self {
        HookError::Sequencer(reason.into())
    }

    /// Create a telemetry failure.
    pub fn telemetry(reason: impl Into<String>) -> Self {
        HookError::Telemetry(reason.into())
    }
}
