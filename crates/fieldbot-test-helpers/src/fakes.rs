//! Recording fakes of the robot's collaborators.
//!
//! Every fake is a cheap `Clone` handle over shared state, so a test can hand
//! one clone to the robot and keep another to script inputs and inspect calls.
//! Fakes created with the same [`CallLog`] record into one ordered list, which
//! is what transition-ordering tests assert on.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use fieldbot_driver::{AllianceSource, Axis, Button, DrivetrainCommand, InputDevice};
use fieldbot_errors::{HookError, HookResult};
use fieldbot_robot::{
    AutoSequencer, Drivetrain, HealthMonitor, Pose2d, Subsystem, TelemetryFrame, TelemetrySink,
    TrajectoryCommand,
};
use parking_lot::Mutex;

/// Ordered log of collaborator calls, shared between fakes.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().push(call.into());
    }

    /// Copy of every call so far.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Calls whose name starts with `prefix`.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.0.lock().iter().any(|c| c == call)
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().iter().filter(|c| *c == call).count()
    }

    /// Index of the first occurrence of `call`.
    pub fn position(&self, call: &str) -> Option<usize> {
        self.0.lock().iter().position(|c| c == call)
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

// ---------------------------------------------------------------------------
// Input

#[derive(Debug, Default)]
struct GamepadState {
    connected: bool,
    axes: HashMap<Axis, f64>,
    held: HashSet<Button>,
    polls: u64,
}

/// Scriptable gamepad.
#[derive(Debug, Clone)]
pub struct FakeGamepad {
    state: Arc<Mutex<GamepadState>>,
}

impl Default for FakeGamepad {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGamepad {
    /// A connected gamepad with sticks centred and nothing held.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(GamepadState {
                connected: true,
                ..GamepadState::default()
            })),
        }
    }

    /// An unplugged gamepad.
    pub fn unplugged() -> Self {
        let pad = Self::new();
        pad.set_connected(false);
        pad
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.lock().connected = connected;
    }

    pub fn set_axis(&self, axis: Axis, value: f64) {
        self.state.lock().axes.insert(axis, value);
    }

    pub fn press(&self, button: Button) {
        self.state.lock().held.insert(button);
    }

    pub fn release(&self, button: Button) {
        self.state.lock().held.remove(&button);
    }

    /// Centre both sticks and release every button.
    pub fn neutral(&self) {
        let mut state = self.state.lock();
        state.axes.clear();
        state.held.clear();
    }

    /// Number of `poll` calls.
    pub fn polls(&self) -> u64 {
        self.state.lock().polls
    }
}

impl InputDevice for FakeGamepad {
    fn poll(&mut self) {
        self.state.lock().polls += 1;
    }

    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn axis(&self, axis: Axis) -> f64 {
        self.state.lock().axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn button(&self, button: Button) -> bool {
        self.state.lock().held.contains(&button)
    }
}

/// Alliance that can be switched mid-test.
#[derive(Debug, Clone, Default)]
pub struct FakeAlliance {
    red: Arc<Mutex<bool>>,
    queries: Arc<Mutex<u64>>,
}

impl FakeAlliance {
    pub fn blue() -> Self {
        Self::default()
    }

    pub fn red() -> Self {
        let alliance = Self::default();
        alliance.set_red(true);
        alliance
    }

    pub fn set_red(&self, red: bool) {
        *self.red.lock() = red;
    }

    /// Number of alliance queries.
    pub fn queries(&self) -> u64 {
        *self.queries.lock()
    }
}

impl AllianceSource for FakeAlliance {
    fn is_on_mirrored_alliance(&self) -> bool {
        *self.queries.lock() += 1;
        *self.red.lock()
    }
}

// ---------------------------------------------------------------------------
// Drivetrain

#[derive(Debug, Default)]
struct DrivetrainState {
    pose: Pose2d,
    manual: Vec<DrivetrainCommand>,
    trajectory: Vec<Option<TrajectoryCommand>>,
    gyro_resets: u32,
    fail_update: Option<String>,
}

/// Drivetrain that records commands and holds a settable pose.
#[derive(Debug, Clone)]
pub struct RecordingDrivetrain {
    log: CallLog,
    state: Arc<Mutex<DrivetrainState>>,
}

impl RecordingDrivetrain {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            state: Arc::default(),
        }
    }

    /// Make every following `update` fail with `reason`.
    pub fn fail_update(&self, reason: impl Into<String>) {
        self.state.lock().fail_update = Some(reason.into());
    }

    pub fn manual_cmds(&self) -> Vec<DrivetrainCommand> {
        self.state.lock().manual.clone()
    }

    pub fn last_manual_cmd(&self) -> Option<DrivetrainCommand> {
        self.state.lock().manual.last().copied()
    }

    pub fn trajectory_cmds(&self) -> Vec<Option<TrajectoryCommand>> {
        self.state.lock().trajectory.clone()
    }

    pub fn gyro_resets(&self) -> u32 {
        self.state.lock().gyro_resets
    }

    pub fn pose(&self) -> Pose2d {
        self.state.lock().pose
    }
}

impl Subsystem for RecordingDrivetrain {
    fn name(&self) -> &str {
        "drivetrain"
    }

    fn shutdown(&mut self) {
        self.log.push("drivetrain.shutdown");
    }
}

impl Drivetrain for RecordingDrivetrain {
    fn set_manual_cmd(&mut self, cmd: DrivetrainCommand) {
        self.log.push("drivetrain.set_manual_cmd");
        self.state.lock().manual.push(cmd);
    }

    fn set_trajectory_cmd(&mut self, cmd: Option<TrajectoryCommand>) {
        self.log.push(if cmd.is_some() {
            "drivetrain.set_trajectory_cmd(some)"
        } else {
            "drivetrain.set_trajectory_cmd(none)"
        });
        self.state.lock().trajectory.push(cmd);
    }

    fn reset_gyro(&mut self) {
        self.log.push("drivetrain.reset_gyro");
        self.state.lock().gyro_resets += 1;
    }

    fn set_known_pose(&mut self, pose: Pose2d) {
        self.log.push("drivetrain.set_known_pose");
        self.state.lock().pose = pose;
    }

    fn estimated_pose(&self) -> Pose2d {
        self.state.lock().pose
    }

    fn update_cals(&mut self) {
        self.log.push("drivetrain.update_cals");
    }

    fn update(&mut self, _now: Duration) -> HookResult {
        self.log.push("drivetrain.update");
        match &self.state.lock().fail_update {
            Some(reason) => Err(HookError::subsystem("drivetrain", reason.clone())),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Autonomous sequencer

#[derive(Debug, Default)]
struct SequencerState {
    starting_pose: Option<Pose2d>,
    step: Option<TrajectoryCommand>,
    fail_initialize: Option<String>,
    fail_update: Option<String>,
    running: bool,
}

/// Sequencer with a scripted starting pose and trajectory output.
#[derive(Debug, Clone)]
pub struct RecordingSequencer {
    log: CallLog,
    state: Arc<Mutex<SequencerState>>,
}

impl RecordingSequencer {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            state: Arc::default(),
        }
    }

    pub fn with_starting_pose(self, pose: Pose2d) -> Self {
        self.state.lock().starting_pose = Some(pose);
        self
    }

    /// Trajectory sample returned by every `update`.
    pub fn with_step(self, step: TrajectoryCommand) -> Self {
        self.state.lock().step = Some(step);
        self
    }

    pub fn fail_initialize(&self, reason: impl Into<String>) {
        self.state.lock().fail_initialize = Some(reason.into());
    }

    pub fn fail_update(&self, reason: impl Into<String>) {
        self.state.lock().fail_update = Some(reason.into());
    }

    /// Whether initialize has run without a matching end.
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }
}

impl Subsystem for RecordingSequencer {
    fn name(&self) -> &str {
        "sequencer"
    }

    fn shutdown(&mut self) {
        self.log.push("sequencer.shutdown");
    }
}

impl AutoSequencer for RecordingSequencer {
    fn update_mode(&mut self, force: bool) {
        self.log.push(format!("sequencer.update_mode({force})"));
    }

    fn initialize(&mut self) -> HookResult {
        self.log.push("sequencer.initialize");
        let mut state = self.state.lock();
        if let Some(reason) = &state.fail_initialize {
            return Err(HookError::sequencer(reason.clone()));
        }
        state.running = true;
        Ok(())
    }

    fn update(&mut self) -> HookResult<Option<TrajectoryCommand>> {
        self.log.push("sequencer.update");
        let state = self.state.lock();
        match &state.fail_update {
            Some(reason) => Err(HookError::sequencer(reason.clone())),
            None => Ok(state.step),
        }
    }

    fn end(&mut self) {
        self.log.push("sequencer.end");
        self.state.lock().running = false;
    }

    fn starting_pose(&self) -> Option<Pose2d> {
        self.state.lock().starting_pose
    }
}

// ---------------------------------------------------------------------------
// Telemetry

#[derive(Debug, Default)]
struct TelemetryState {
    frames: Vec<TelemetryFrame>,
    flushes: u64,
    fail_publish: Option<String>,
}

/// Telemetry sink that keeps every frame.
#[derive(Debug, Clone)]
pub struct RecordingTelemetry {
    log: CallLog,
    state: Arc<Mutex<TelemetryState>>,
}

impl RecordingTelemetry {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            state: Arc::default(),
        }
    }

    pub fn fail_publish(&self, reason: impl Into<String>) {
        self.state.lock().fail_publish = Some(reason.into());
    }

    pub fn frames(&self) -> Vec<TelemetryFrame> {
        self.state.lock().frames.clone()
    }

    pub fn last_frame(&self) -> Option<TelemetryFrame> {
        self.state.lock().frames.last().cloned()
    }

    pub fn flushes(&self) -> u64 {
        self.state.lock().flushes
    }
}

impl Subsystem for RecordingTelemetry {
    fn name(&self) -> &str {
        "telemetry"
    }

    fn shutdown(&mut self) {
        self.log.push("telemetry.shutdown");
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn publish(&mut self, frame: &TelemetryFrame) -> HookResult {
        self.log.push("telemetry.publish");
        let mut state = self.state.lock();
        if let Some(reason) = &state.fail_publish {
            return Err(HookError::telemetry(reason.clone()));
        }
        state.frames.push(frame.clone());
        Ok(())
    }

    fn clear_auto_trajectory(&mut self) {
        self.log.push("telemetry.clear_auto_trajectory");
    }

    fn flush(&mut self) -> HookResult {
        self.log.push("telemetry.flush");
        self.state.lock().flushes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Health monitor

/// Health monitor that counts `stop_threads` calls.
#[derive(Debug, Clone)]
pub struct RecordingHealthMonitor {
    log: CallLog,
    stops: Arc<Mutex<u32>>,
}

impl RecordingHealthMonitor {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            stops: Arc::default(),
        }
    }

    pub fn stops(&self) -> u32 {
        *self.stops.lock()
    }
}

impl Subsystem for RecordingHealthMonitor {
    fn name(&self) -> &str {
        "health_monitor"
    }

    fn shutdown(&mut self) {
        self.log.push("health_monitor.shutdown");
    }
}

impl HealthMonitor for RecordingHealthMonitor {
    fn stop_threads(&mut self) {
        self.log.push("health_monitor.stop_threads");
        *self.stops.lock() += 1;
    }
}
