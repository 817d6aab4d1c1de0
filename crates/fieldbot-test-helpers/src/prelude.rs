//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use fieldbot_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_err, must_some, must_with};

#[cfg(feature = "fakes")]
pub use crate::fakes::{
    CallLog, FakeAlliance, FakeGamepad, RecordingDrivetrain, RecordingHealthMonitor,
    RecordingSequencer, RecordingTelemetry,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
