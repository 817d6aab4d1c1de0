//! Signal conditioning for driver stick axes
//!
//! Raw human-interface axes are noisy near center and can step from one
//! extreme to the other within a single loop tick. This crate turns them into
//! bounded, smooth velocity setpoints.
//!
//! # Overview
//!
//! - **Deadband**: zero below a threshold, linear rescale above it so the
//!   output is continuous at the threshold
//! - **Scale**: configured maximum magnitude times a runtime multiplier
//! - **Slew Rate**: bound the change between consecutive outputs to
//!   `rate_limit × dt`, with `dt` taken from scheduler timestamps
//! - **SignalConditioner**: the three stages composed, one instance per axis
//!
//! # Loop Safety
//!
//! - No heap allocations in `calculate`
//! - O(1) time complexity
//! - Non-finite inputs are treated as a centered stick
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use fieldbot_filters::prelude::*;
//!
//! let config = ConditionerConfig::new(0.2, 4.0, 1000.0)?;
//! let mut forward = SignalConditioner::new(config, Duration::from_millis(20));
//!
//! // Inside the deadband: exactly zero
//! assert_eq!(forward.calculate(0.1, Duration::from_millis(20)), 0.0);
//!
//! // 0.5 rescales to (0.5 - 0.2) / 0.8 = 0.375 of the 4.0 m/s range
//! let out = forward.calculate(0.5, Duration::from_millis(40));
//! assert!((out - 1.5).abs() < 1e-9);
//! # Ok::<(), fieldbot_errors::ValidationError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod conditioner;
pub mod deadband;
pub mod prelude;
pub mod slew_rate;
pub mod state;

pub use conditioner::{ConditionerConfig, SignalConditioner};
pub use deadband::apply_deadband;
pub use slew_rate::{SlewRateState, slew_rate_filter};
pub use state::FilterState;
