//! Simulated collaborators for running the robot off-hardware.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use fieldbot_driver::{Axis, Button, DrivetrainCommand, InputDevice};
use fieldbot_errors::{HookError, HookResult};
use fieldbot_robot::{
    AutoSequencer, Drivetrain, HealthMonitor, Pose2d, Subsystem, TelemetryFrame, TelemetrySink,
    TrajectoryCommand,
};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Gamepad

/// Gamepad driven by a fixed script on the loop clock.
///
/// Each `poll` advances the script by one loop period. Inside the disconnect
/// window the pad reports itself unplugged.
#[derive(Debug)]
pub struct SimGamepad {
    period: Duration,
    now: Duration,
    next: Duration,
    disconnect: Option<(Duration, Duration)>,
}

impl SimGamepad {
    pub fn new(period: Duration, disconnect: Option<(Duration, Duration)>) -> Self {
        Self {
            period,
            now: Duration::ZERO,
            next: Duration::ZERO,
            disconnect,
        }
    }

    fn t(&self) -> f64 {
        self.now.as_secs_f64()
    }
}

impl InputDevice for SimGamepad {
    fn poll(&mut self) {
        self.now = self.next;
        self.next += self.period;
    }

    fn is_connected(&self) -> bool {
        !self
            .disconnect
            .is_some_and(|(from, to)| (from..to).contains(&self.now))
    }

    fn axis(&self, axis: Axis) -> f64 {
        let t = self.t();
        match axis {
            Axis::LeftY => 0.9 * (0.5 * t).sin(),
            Axis::LeftX => 0.4 * (0.25 * t).cos(),
            Axis::RightX => 0.6 * (0.8 * t).sin(),
            Axis::RightY | Axis::LeftTrigger | Axis::RightTrigger => 0.0,
        }
    }

    fn button(&self, button: Button) -> bool {
        let t = self.t();
        match button {
            // Full speed for the second half of every 4 s
            Button::RightBumper => t % 4.0 >= 2.0,
            Button::Y => t % 5.0 < 0.1,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Drivetrain

/// Point-mass drivetrain that integrates field-relative velocity.
#[derive(Debug, Default)]
pub struct SimDrivetrain {
    pose: Pose2d,
    manual: DrivetrainCommand,
    trajectory: Option<TrajectoryCommand>,
    last_update: Option<Duration>,
    distance_m: f64,
}

impl SimDrivetrain {
    pub fn new() -> Self {
        Self::default()
    }

    fn active_command(&self) -> DrivetrainCommand {
        self.trajectory.map_or(self.manual, |traj| traj.velocity)
    }
}

impl Subsystem for SimDrivetrain {
    fn name(&self) -> &str {
        "drivetrain"
    }

    fn shutdown(&mut self) {
        self.manual = DrivetrainCommand::ZERO;
        self.trajectory = None;
        info!(
            x_m = self.pose.x_m,
            y_m = self.pose.y_m,
            distance_m = self.distance_m,
            "drivetrain released"
        );
    }
}

impl Drivetrain for SimDrivetrain {
    fn set_manual_cmd(&mut self, cmd: DrivetrainCommand) {
        self.manual = cmd;
    }

    fn set_trajectory_cmd(&mut self, cmd: Option<TrajectoryCommand>) {
        self.trajectory = cmd;
    }

    fn reset_gyro(&mut self) {
        debug!(heading_rad = self.pose.heading_rad, "gyro reset");
        self.pose.heading_rad = 0.0;
    }

    fn set_known_pose(&mut self, pose: Pose2d) {
        self.pose = pose;
    }

    fn estimated_pose(&self) -> Pose2d {
        self.pose
    }

    fn update_cals(&mut self) {
        debug!("drivetrain calibration refreshed");
    }

    fn update(&mut self, now: Duration) -> HookResult {
        let dt = self
            .last_update
            .map_or(Duration::ZERO, |last| now.saturating_sub(last))
            .as_secs_f64();
        self.last_update = Some(now);

        let cmd = self.active_command();
        let dx = cmd.vel_x_mps * dt;
        let dy = cmd.vel_y_mps * dt;
        self.pose.x_m += dx;
        self.pose.y_m += dy;
        self.pose.heading_rad += cmd.vel_t_radps * dt;
        self.distance_m += dx.hypot(dy);

        if !self.pose.is_finite() {
            return Err(HookError::subsystem("drivetrain", "pose estimate diverged"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Autonomous sequencer

/// Autonomous routine that drives straight out of the starting zone.
#[derive(Debug)]
pub struct SimSequencer {
    period: Duration,
    start: Pose2d,
    speed_mps: f64,
    drive_for: Duration,
    elapsed: Duration,
    running: bool,
    selected: bool,
}

impl SimSequencer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            start: Pose2d::new(1.5, 5.5, 0.0),
            speed_mps: 1.0,
            drive_for: Duration::from_secs(2),
            elapsed: Duration::ZERO,
            running: false,
            selected: false,
        }
    }
}

impl Subsystem for SimSequencer {
    fn name(&self) -> &str {
        "sequencer"
    }
}

impl AutoSequencer for SimSequencer {
    fn update_mode(&mut self, force: bool) {
        if force || !self.selected {
            info!(routine = "drive-out", "autonomous routine selected");
            self.selected = true;
        }
    }

    fn initialize(&mut self) -> HookResult {
        if !self.selected {
            return Err(HookError::sequencer("no routine selected"));
        }
        self.elapsed = Duration::ZERO;
        self.running = true;
        Ok(())
    }

    fn update(&mut self) -> HookResult<Option<TrajectoryCommand>> {
        if !self.running || self.elapsed >= self.drive_for {
            return Ok(None);
        }
        self.elapsed += self.period;

        let travelled = self.speed_mps * self.elapsed.as_secs_f64();
        Ok(Some(TrajectoryCommand {
            pose: Pose2d::new(self.start.x_m + travelled, self.start.y_m, self.start.heading_rad),
            velocity: DrivetrainCommand::new(self.speed_mps, 0.0, 0.0),
        }))
    }

    fn end(&mut self) {
        if self.running {
            debug!(elapsed_s = self.elapsed.as_secs_f64(), "autonomous routine ended");
        }
        self.running = false;
    }

    fn starting_pose(&self) -> Option<Pose2d> {
        Some(self.start)
    }
}

// ---------------------------------------------------------------------------
// Telemetry

/// Telemetry sink that writes one JSON object per frame.
#[derive(Debug)]
pub struct LogTelemetry<W: Write> {
    writer: W,
    frames: u64,
}

impl<W: Write> LogTelemetry<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }
}

impl<W: Write> Subsystem for LogTelemetry<W> {
    fn name(&self) -> &str {
        "telemetry"
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "telemetry flush on shutdown failed");
        }
        info!(frames = self.frames, "telemetry closed");
    }
}

impl<W: Write> TelemetrySink for LogTelemetry<W> {
    fn publish(&mut self, frame: &TelemetryFrame) -> HookResult {
        serde_json::to_writer(&mut self.writer, frame)
            .map_err(|e| HookError::telemetry(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| HookError::telemetry(e.to_string()))?;
        self.frames += 1;
        Ok(())
    }

    fn clear_auto_trajectory(&mut self) {
        debug!("auto trajectory overlay cleared");
    }

    fn flush(&mut self) -> HookResult {
        self.writer
            .flush()
            .map_err(|e| HookError::telemetry(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Health monitor

/// Background thread that emits a heartbeat until stopped.
#[derive(Debug)]
pub struct SimHealthMonitor {
    handle: Option<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    beats: Arc<AtomicU64>,
}

impl SimHealthMonitor {
    /// Spawn the monitor thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn start(interval: Duration) -> std::io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let beats = Arc::new(AtomicU64::new(0));

        let handle = thread::Builder::new().name("health-monitor".into()).spawn({
            let shutdown = Arc::clone(&shutdown);
            let beats = Arc::clone(&beats);
            move || loop {
                let n = beats.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(beat = n, "health heartbeat");
                if shutdown.load(Ordering::Acquire) {
                    break;
                }
                thread::sleep(interval);
            }
        })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            beats,
        })
    }

    fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }
}

impl Subsystem for SimHealthMonitor {
    fn name(&self) -> &str {
        "health_monitor"
    }
}

impl HealthMonitor for SimHealthMonitor {
    fn stop_threads(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("health monitor thread panicked");
            }
            info!(beats = self.beats(), "health monitor stopped");
        }
    }
}

impl Drop for SimHealthMonitor {
    fn drop(&mut self) {
        self.stop_threads();
    }
}
