//! Driver command conditioning pipeline.
//!
//! Converts raw gamepad input into a bounded, smooth, alliance-corrected
//! [`DrivetrainCommand`] plus a handful of boolean intents:
//!
//! ```text
//! InputDevice ──► sign conventions ──► alliance flip ──► SignalConditioner ×3 ──► DrivetrainCommand
//!      │                                                  (deadband, scale, slew)
//!      └──────► buttons ──► intents (level) / ButtonEdge (rising edge)
//! ```
//!
//! When the device reports disconnected, the pipeline outputs
//! [`DrivetrainCommand::ZERO`], clears every intent and asserts the
//! connectivity fault. Disconnection is a state, never an error.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod command;
pub mod config;
pub mod edge;
pub mod input;
pub mod pipeline;
pub mod prelude;

pub use command::DrivetrainCommand;
pub use config::DriverInputConfig;
pub use edge::ButtonEdge;
pub use input::{Alliance, AllianceSource, Axis, Button, InputDevice};
pub use pipeline::DriverCommandPipeline;
