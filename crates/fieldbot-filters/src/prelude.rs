//! Prelude for the filters crate.
//!
//! ```
//! use core::time::Duration;
//! use fieldbot_filters::prelude::*;
//!
//! let mut state = SlewRateState::new(8.0);
//! let shaped = apply_deadband(0.6, 0.2) * 4.0;
//! let out = slew_rate_filter(shaped, Duration::from_millis(20), &mut state);
//! assert!(out <= 0.16 + 1e-12);
//! ```

pub use crate::conditioner::{ConditionerConfig, SignalConditioner};
pub use crate::deadband::apply_deadband;
pub use crate::slew_rate::{SlewRateState, slew_rate_filter};
pub use crate::state::FilterState;
