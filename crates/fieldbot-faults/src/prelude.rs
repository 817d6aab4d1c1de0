//! Prelude for the faults crate.

pub use crate::{Fault, FaultRegistry, FaultSeverity, FaultSnapshot};
