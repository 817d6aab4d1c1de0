//! Per-tick telemetry frame.

use fieldbot_driver::DrivetrainCommand;
use fieldbot_scheduler::{Mode, SegmentSample};
use serde::Serialize;

use crate::pose::Pose2d;

/// Snapshot published to the [`TelemetrySink`](crate::TelemetrySink) every
/// tick.
///
/// Segment timings are those of the previous tick; the current one is still
/// open when the frame is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryFrame {
    /// Scheduler tick number
    pub tick: u64,
    /// Scheduler timestamp, seconds
    pub timestamp_s: f64,
    /// Active mode
    pub mode: Mode,
    /// Whether autonomous has run this power cycle
    pub autonomous_has_run: bool,
    /// Driver command from the pipeline
    pub command: DrivetrainCommand,
    /// Auto-drive intent
    pub auto_drive: bool,
    /// Auto-steer intent
    pub auto_steer: bool,
    /// Reset-heading intent
    pub reset_heading: bool,
    /// Debug-marker intent
    pub debug_marker: bool,
    /// Whether the driver controller is connected
    pub controller_connected: bool,
    /// Names of asserted faults
    pub active_faults: Vec<String>,
    /// Estimated pose after the drivetrain update
    pub pose: Pose2d,
    /// Time in the current phase, seconds
    pub phase_elapsed_s: f64,
    /// Segment timings
    pub segments: Vec<SegmentSample>,
}
