//! Prelude for the driver crate.

pub use crate::command::DrivetrainCommand;
pub use crate::config::DriverInputConfig;
pub use crate::edge::ButtonEdge;
pub use crate::input::{Alliance, AllianceSource, Axis, Button, InputDevice};
pub use crate::pipeline::DriverCommandPipeline;
