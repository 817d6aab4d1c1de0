//! Prelude module for convenient error handling imports.
//!
//! ```
//! use fieldbot_errors::prelude::*;
//!
//! fn hook() -> HookResult {
//!     Err(HookError::sequencer("routine not selected"))
//! }
//!
//! let err: FieldbotError = hook().map_err(FieldbotError::from).unwrap_err();
//! assert_eq!(err.severity(), ErrorSeverity::Critical);
//! ```

pub use crate::{
    HookResult, Result,
    common::{ErrorCategory, ErrorContext, ErrorSeverity, FieldbotError, ResultExt},
    hook::HookError,
    validation::ValidationError,
};
