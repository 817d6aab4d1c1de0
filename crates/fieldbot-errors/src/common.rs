//! Top-level error type, classification and context helpers.

use core::fmt;

use crate::{HookError, ValidationError};

/// Top-level error type wrapping every fieldbot sub-error.
#[derive(Debug, thiserror::Error)]
pub enum FieldbotError {
    /// A phase hook or one of its collaborators failed
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    /// A configuration value violated its contract
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O errors (configuration files, log sinks)
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Configuration could not be parsed or assembled
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl FieldbotError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            FieldbotError::Hook(_) => ErrorCategory::Hook,
            FieldbotError::Validation(_) => ErrorCategory::Validation,
            FieldbotError::Io(_) => ErrorCategory::IO,
            FieldbotError::Config(_) => ErrorCategory::Config,
            FieldbotError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FieldbotError::Hook(e) => e.severity(),
            FieldbotError::Validation(e) => e.severity(),
            FieldbotError::Io(_) => ErrorSeverity::Error,
            FieldbotError::Config(_) => ErrorSeverity::Error,
            FieldbotError::Other(_) => ErrorSeverity::Error,
        }
    }

    /// Check if the control loop may keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        FieldbotError::Config(msg.into())
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        FieldbotError::Other(msg.into())
    }
}

impl From<std::io::Error> for FieldbotError {
    fn from(e: std::io::Error) -> Self {
        FieldbotError::Io(e)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Phase hook failures
    Hook = 0,
    /// Configuration contract violations
    Validation = 1,
    /// Configuration loading errors
    Config = 2,
    /// I/O errors
    IO = 3,
    /// Other errors
    Other = 255,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Hook => write!(f, "Hook"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::IO => write!(f, "IO"),
            ErrorCategory::Other => write!(f, "Other"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, outputs must be disabled
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Context information attached to an error.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation that was being performed
    pub operation: String,
    /// Additional context key-value pairs
    pub context: Vec<(String, String)>,
}

impl ErrorContext {
    /// Create a new error context for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            context: Vec::new(),
        }
    }

    /// Add a context key-value pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation: {}", self.operation)?;
        for (key, value) in &self.context {
            write!(f, ", {key}: {value}")?;
        }
        Ok(())
    }
}

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, ctx: ErrorContext) -> Result<T, FieldbotError>;

    /// Add context with an operation name.
    fn with_context(self, operation: impl Into<String>) -> Result<T, FieldbotError>;
}

impl<T, E: Into<FieldbotError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, ctx: ErrorContext) -> Result<T, FieldbotError> {
        self.map_err(|e| {
            let err: FieldbotError = e.into();
            FieldbotError::Other(format!("{ctx}: {err}"))
        })
    }

    fn with_context(self, operation: impl Into<String>) -> Result<T, FieldbotError> {
        self.context(ErrorContext::new(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
        assert!(ErrorSeverity::Error > ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning > ErrorSeverity::Info);
    }

    #[test]
    fn test_hook_errors_are_not_recoverable() {
        let err: FieldbotError = HookError::subsystem("drivetrain", "CAN bus off").into();
        assert_eq!(err.category(), ErrorCategory::Hook);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_validation_errors_are_classified() {
        let err: FieldbotError = ValidationError::negative("rate_limit", -1.0).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("load_config")
            .with("path", "robot.json")
            .with("section", "driver");
        let text = ctx.to_string();
        assert!(text.contains("load_config"));
        assert!(text.contains("path: robot.json"));
    }

    #[test]
    fn test_result_ext_wraps_operation() {
        let result: std::result::Result<(), HookError> = Err(HookError::telemetry("sink closed"));
        let err = match result.with_context("publish_frame") {
            Ok(()) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("publish_frame"));
        assert!(err.to_string().contains("sink closed"));
    }
}
