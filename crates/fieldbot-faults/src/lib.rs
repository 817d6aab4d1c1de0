//! Fault flags for the fieldbot control core.
//!
//! A *fault* is a named boolean condition (for example "driver controller
//! unplugged") that operators need to see. Faults are registered in a
//! [`FaultRegistry`] that is created once at process start and handed to every
//! component that reports or displays faults. Registration returns a cheap
//! [`Fault`] handle; the component that owns the condition asserts and clears
//! it, telemetry reads [`FaultRegistry::snapshot`].
//!
//! # State Machine
//!
//! ```text
//! ┌─────────────┐  set_faulted()   ┌─────────────┐
//! │   Normal    │ ───────────────► │   Faulted   │
//! │             │ ◄─────────────── │             │
//! └─────────────┘  set_no_fault()  └─────────────┘
//! ```
//!
//! Only the edges are logged; asserting an already-active fault is silent.
//!
//! # Concurrency
//!
//! Flags are atomics, so a telemetry thread may read a snapshot at any time.
//! Such reads are eventually consistent: they observe the state as of some
//! tick boundary, never a torn value.
//!
//! # Example
//!
//! ```rust
//! use fieldbot_faults::{FaultRegistry, FaultSeverity};
//!
//! let mut registry = FaultRegistry::new();
//! let unplugged = registry.register("Driver controller (0) unplugged", FaultSeverity::Critical);
//!
//! unplugged.set_faulted();
//! assert!(registry.any_active());
//!
//! unplugged.set_no_fault();
//! assert_eq!(registry.active_count(), 0);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

mod fault;
mod registry;

pub mod prelude;

pub use fault::{Fault, FaultSeverity};
pub use registry::{FaultRegistry, FaultSnapshot};
