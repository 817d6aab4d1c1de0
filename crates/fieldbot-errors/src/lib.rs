//! Centralized error types for fieldbot
//!
//! The robot control core distinguishes four classes of failure, and this crate
//! gives each one a home:
//!
//! - **Device absence** is *not* an error. It is a fault flag plus a safe-state
//!   command, owned by `fieldbot-faults` and `fieldbot-driver`.
//! - **Lifecycle-ordering problems** (teardown before full construction) are
//!   handled with existence checks and never produce an error value.
//! - [`HookError`]: a phase hook failed. These are never recovered locally;
//!   they propagate to the host loop, which disables outputs.
//! - [`ValidationError`]: a configuration contract was violated at
//!   construction time. Always fatal.
//!
//! [`FieldbotError`] wraps all of them for code that needs one error type.
//!
//! # Example
//!
//! ```
//! use fieldbot_errors::prelude::*;
//!
//! fn check_deadband(value: f64) -> Result<f64> {
//!     if !(0.0..1.0).contains(&value) {
//!         return Err(ValidationError::out_of_range("deadband", value, 0.0, 1.0).into());
//!     }
//!     Ok(value)
//! }
//!
//! assert!(check_deadband(0.2).is_ok());
//! assert!(check_deadband(1.5).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod common;
pub mod hook;
pub mod prelude;
pub mod validation;

pub use common::{ErrorCategory, ErrorContext, ErrorSeverity, FieldbotError, ResultExt};
pub use hook::HookError;
pub use validation::ValidationError;

/// A specialized `Result` type for fieldbot operations.
pub type Result<T> = std::result::Result<T, FieldbotError>;

/// Result type returned by phase hooks and the collaborators they call.
pub type HookResult<T = ()> = std::result::Result<T, HookError>;
