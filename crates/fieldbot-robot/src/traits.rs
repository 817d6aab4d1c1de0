//! Collaborator contracts.
//!
//! The robot reaches drivetrain kinematics, autonomous sequencing, telemetry
//! transport and hardware health monitoring only through these traits. Every
//! call is synchronous and bounded-time; none of them may block the loop.

use std::time::Duration;

use fieldbot_driver::DrivetrainCommand;
use fieldbot_errors::HookResult;

use crate::pose::{Pose2d, TrajectoryCommand};
use crate::telemetry::TelemetryFrame;

/// Something the robot owns and must release at teardown.
pub trait Subsystem {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Release resources. Called at most once, during teardown.
    fn shutdown(&mut self) {}
}

/// Drivetrain and pose estimator.
///
/// The manual and trajectory channels are mutually exclusive per tick: teleop
/// sets a manual command and clears the trajectory, autonomous only sets the
/// trajectory.
pub trait Drivetrain: Subsystem {
    /// Driver velocity command for this tick.
    fn set_manual_cmd(&mut self, cmd: DrivetrainCommand);

    /// Trajectory sample to track, `None` to stop tracking.
    fn set_trajectory_cmd(&mut self, cmd: Option<TrajectoryCommand>);

    /// Re-zero the heading reference at the current orientation.
    fn reset_gyro(&mut self);

    /// Overwrite the pose estimate.
    fn set_known_pose(&mut self, pose: Pose2d);

    /// Current pose estimate.
    fn estimated_pose(&self) -> Pose2d;

    /// Re-read live-tunable calibrations.
    fn update_cals(&mut self) {}

    /// Run control and estimation for one tick.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`](fieldbot_errors::HookError) on a hardware or
    /// estimator failure.
    fn update(&mut self, now: Duration) -> HookResult;
}

/// Autonomous routine engine.
pub trait AutoSequencer: Subsystem {
    /// Re-read the operator-selected routine. `force` rebuilds it even if the
    /// selection did not change. Usable while disabled.
    fn update_mode(&mut self, force: bool);

    /// Prepare the selected routine for execution.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`](fieldbot_errors::HookError) if the routine
    /// cannot start.
    fn initialize(&mut self) -> HookResult;

    /// Advance one tick. Returns the trajectory sample to track, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`](fieldbot_errors::HookError) if a step fails.
    fn update(&mut self) -> HookResult<Option<TrajectoryCommand>>;

    /// Stop the routine and cancel any in-flight action. Must always succeed.
    fn end(&mut self);

    /// Pose the selected routine starts from.
    fn starting_pose(&self) -> Option<Pose2d>;
}

/// Telemetry and log transport.
pub trait TelemetrySink: Subsystem {
    /// Record one frame.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`](fieldbot_errors::HookError) if the sink failed.
    fn publish(&mut self, frame: &TelemetryFrame) -> HookResult;

    /// Remove any displayed autonomous trajectory.
    fn clear_auto_trajectory(&mut self) {}

    /// Push buffered records out. Called once per tick after `publish`.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`](fieldbot_errors::HookError) if the sink failed.
    fn flush(&mut self) -> HookResult {
        Ok(())
    }
}

/// Background hardware-health monitor.
///
/// Its threads are independent of the loop; the only contract is that
/// `stop_threads` is idempotent and issued at most once during teardown.
pub trait HealthMonitor: Subsystem {
    /// Stop the monitor's background threads.
    fn stop_threads(&mut self);
}
