//! The robot: phase hooks over explicitly owned subsystems.

use std::time::Duration;

use fieldbot_driver::{AllianceSource, DriverCommandPipeline, DrivetrainCommand, InputDevice};
use fieldbot_errors::{FieldbotError, HookResult};
use fieldbot_faults::FaultRegistry;
use fieldbot_scheduler::{PhaseContext, PhaseHooks, SegmentTimeTracker};
use tracing::{debug, info, warn};

use crate::config::RobotConfig;
use crate::pose::Pose2d;
use crate::telemetry::TelemetryFrame;
use crate::timer::PhaseTimer;
use crate::traits::{AutoSequencer, Drivetrain, HealthMonitor, Subsystem, TelemetrySink};

/// Segment names recorded by the every-mode periodic hook.
pub mod segments {
    /// Reading and conditioning driver input
    pub const DRIVER_INTERFACE: &str = "Driver Interface";
    /// Drivetrain control and pose estimation
    pub const DRIVETRAIN: &str = "Drivetrain";
    /// Building and publishing the telemetry frame
    pub const TELEMETRY: &str = "Telemetry";
}

/// Collaborators handed to [`Robot::new`].
pub struct RobotParts {
    /// Driver gamepad
    pub input: Box<dyn InputDevice>,
    /// Alliance assignment
    pub alliance: Box<dyn AllianceSource>,
    /// Drivetrain and pose estimator
    pub drivetrain: Box<dyn Drivetrain>,
    /// Autonomous routine engine
    pub sequencer: Box<dyn AutoSequencer>,
    /// Telemetry transport
    pub telemetry: Box<dyn TelemetrySink>,
    /// Hardware-health monitor, if one is fitted
    pub health_monitor: Option<Box<dyn HealthMonitor>>,
}

impl std::fmt::Debug for RobotParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobotParts")
            .field("drivetrain", &self.drivetrain.name())
            .field("sequencer", &self.sequencer.name())
            .field("telemetry", &self.telemetry.name())
            .field(
                "health_monitor",
                &self.health_monitor.as_ref().map(|m| m.name().to_string()),
            )
            .finish_non_exhaustive()
    }
}

impl RobotParts {
    /// Teardown in registry order: stop the health monitor's threads if there
    /// is one, then shut down the sequencer, the drivetrain and finally the
    /// telemetry sink.
    fn teardown(&mut self) {
        match self.health_monitor.as_mut() {
            Some(monitor) => {
                debug!(subsystem = monitor.name(), "stopping health monitor threads");
                monitor.stop_threads();
            }
            None => debug!("no health monitor to stop"),
        }

        shut_down(self.sequencer.as_mut());
        shut_down(self.drivetrain.as_mut());
        shut_down(self.telemetry.as_mut());
    }
}

fn shut_down<S: Subsystem + ?Sized>(subsystem: &mut S) {
    debug!(subsystem = subsystem.name(), "shutting down");
    subsystem.shutdown();
}

/// Competition robot.
///
/// Owns the driver pipeline, the fault registry and every collaborator. The
/// scheduler borrows it each tick through [`PhaseHooks`].
///
/// Dropping the robot runs [`Robot::end_competition`] if it has not run yet.
pub struct Robot {
    config: RobotConfig,
    faults: FaultRegistry,
    pipeline: DriverCommandPipeline,
    parts: RobotParts,
    timing: SegmentTimeTracker,
    phase_timer: PhaseTimer,
    last_frame: Option<TelemetryFrame>,
    ended: bool,
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .field("parts", &self.parts)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl Robot {
    /// Build the robot.
    ///
    /// The driver pipeline registers its connectivity fault in `faults`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldbotError::Validation`] if `config` is invalid. The parts
    /// are torn down before the error is returned, so a fitted health monitor
    /// never outlives a failed construction.
    pub fn new(
        config: RobotConfig,
        mut parts: RobotParts,
        mut faults: FaultRegistry,
    ) -> Result<Self, FieldbotError> {
        let built = config.validate().and_then(|()| {
            DriverCommandPipeline::new(
                config.driver.clone(),
                config.loop_config.period(),
                &mut faults,
            )
        });

        let pipeline = match built {
            Ok(pipeline) => pipeline,
            Err(e) => {
                warn!(error = %e, "robot construction failed, tearing down parts");
                parts.teardown();
                return Err(e.into());
            }
        };

        let timing = SegmentTimeTracker::new(config.loop_config.budget());
        info!(
            period_ms = config.loop_config.period_ms,
            health_monitor = parts.health_monitor.is_some(),
            "robot constructed"
        );

        Ok(Self {
            config,
            faults,
            pipeline,
            parts,
            timing,
            phase_timer: PhaseTimer::new(),
            last_frame: None,
            ended: false,
        })
    }

    /// Release every subsystem.
    ///
    /// Stops the health monitor's threads only if a monitor exists, then shuts
    /// down the owned subsystems in registry order. A second call does
    /// nothing.
    pub fn end_competition(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.parts.teardown();
        info!("robot torn down");
    }

    /// Command the drivetrain to stop and drop any trajectory.
    pub fn disable_outputs(&mut self) {
        if self.ended {
            return;
        }
        self.parts.drivetrain.set_manual_cmd(DrivetrainCommand::ZERO);
        self.parts.drivetrain.set_trajectory_cmd(None);
        warn!("outputs disabled");
    }

    fn periodic_segments(&mut self, ctx: &PhaseContext) -> HookResult {
        self.pipeline
            .update(self.parts.input.as_mut(), self.parts.alliance.as_ref(), ctx.now);
        self.timing.mark(segments::DRIVER_INTERFACE);

        self.parts.drivetrain.update(ctx.now)?;
        self.timing.mark(segments::DRIVETRAIN);

        let frame = self.build_frame(ctx);
        self.parts.telemetry.publish(&frame)?;
        self.last_frame = Some(frame);
        self.timing.mark(segments::TELEMETRY);

        self.parts.telemetry.flush()
    }

    fn build_frame(&self, ctx: &PhaseContext) -> TelemetryFrame {
        TelemetryFrame {
            tick: ctx.tick,
            timestamp_s: ctx.now.as_secs_f64(),
            mode: ctx.mode,
            autonomous_has_run: ctx.autonomous_has_run,
            command: self.pipeline.command(),
            auto_drive: self.pipeline.auto_drive_intent(),
            auto_steer: self.pipeline.auto_steer_intent(),
            reset_heading: self.pipeline.reset_heading_intent(),
            debug_marker: self.pipeline.debug_marker_intent(),
            controller_connected: self.pipeline.is_connected(),
            active_faults: self
                .faults
                .active_names()
                .iter()
                .map(|n| n.to_string())
                .collect(),
            pose: self.parts.drivetrain.estimated_pose(),
            phase_elapsed_s: self.phase_timer.elapsed().as_secs_f64(),
            segments: self.timing.snapshot(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Fault registry.
    pub fn faults(&self) -> &FaultRegistry {
        &self.faults
    }

    /// Driver pipeline.
    pub fn pipeline(&self) -> &DriverCommandPipeline {
        &self.pipeline
    }

    /// Segment timing.
    pub fn timing(&self) -> &SegmentTimeTracker {
        &self.timing
    }

    /// Time in the current phase.
    pub fn phase_elapsed(&self) -> Duration {
        self.phase_timer.elapsed()
    }

    /// Estimated pose.
    pub fn pose(&self) -> Pose2d {
        self.parts.drivetrain.estimated_pose()
    }

    /// Last published telemetry frame.
    pub fn last_frame(&self) -> Option<&TelemetryFrame> {
        self.last_frame.as_ref()
    }

    /// Whether teardown has run.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl Drop for Robot {
    fn drop(&mut self) {
        self.end_competition();
    }
}

impl PhaseHooks for Robot {
    fn robot_periodic(&mut self, ctx: &PhaseContext) -> HookResult {
        self.timing.start();
        let result = self.periodic_segments(ctx);
        self.timing.end();
        result
    }

    fn disabled_init(&mut self, _ctx: &PhaseContext) -> HookResult {
        self.parts.sequencer.update_mode(true);
        Ok(())
    }

    fn disabled_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
        self.parts.sequencer.update_mode(false);
        self.parts.drivetrain.update_cals();
        Ok(())
    }

    fn autonomous_init(&mut self, _ctx: &PhaseContext) -> HookResult {
        self.phase_timer.start();
        self.parts.drivetrain.reset_gyro();
        self.parts.sequencer.initialize()?;

        match self.parts.sequencer.starting_pose() {
            Some(pose) => self.parts.drivetrain.set_known_pose(pose),
            None => warn!("autonomous routine has no starting pose, keeping estimate"),
        }

        self.phase_timer.restart();
        Ok(())
    }

    fn autonomous_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
        let cmd = self.parts.sequencer.update()?;
        self.parts.drivetrain.set_trajectory_cmd(cmd);
        Ok(())
    }

    fn autonomous_exit(&mut self, _ctx: &PhaseContext) -> HookResult {
        self.parts.sequencer.end();
        Ok(())
    }

    fn teleop_init(&mut self, ctx: &PhaseContext) -> HookResult {
        self.parts.telemetry.clear_auto_trajectory();

        // Pose is normally seeded by the autonomous routine
        if !ctx.autonomous_has_run {
            let pose = self.config.default_teleop_pose;
            info!(x_m = pose.x_m, y_m = pose.y_m, "autonomous never ran, seeding default pose");
            self.parts.drivetrain.set_known_pose(pose);
        }

        self.phase_timer.restart();
        Ok(())
    }

    fn teleop_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
        self.parts
            .drivetrain
            .set_manual_cmd(self.pipeline.command());

        if self.pipeline.reset_heading_intent() {
            self.parts.drivetrain.reset_gyro();
        }

        self.parts.drivetrain.set_trajectory_cmd(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::TrajectoryCommand;
    use fieldbot_driver::{Alliance, Axis, Button};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Unplugged;
    impl InputDevice for Unplugged {
        fn is_connected(&self) -> bool {
            false
        }
        fn axis(&self, _axis: Axis) -> f64 {
            0.0
        }
        fn button(&self, _button: Button) -> bool {
            false
        }
    }

    struct Stub(&'static str, Log);
    impl Subsystem for Stub {
        fn name(&self) -> &str {
            self.0
        }
        fn shutdown(&mut self) {
            self.1.borrow_mut().push(format!("{}.shutdown", self.0));
        }
    }
    impl Drivetrain for Stub {
        fn set_manual_cmd(&mut self, _cmd: DrivetrainCommand) {}
        fn set_trajectory_cmd(&mut self, _cmd: Option<TrajectoryCommand>) {}
        fn reset_gyro(&mut self) {}
        fn set_known_pose(&mut self, _pose: Pose2d) {}
        fn estimated_pose(&self) -> Pose2d {
            Pose2d::ORIGIN
        }
        fn update(&mut self, _now: Duration) -> HookResult {
            Ok(())
        }
    }
    impl AutoSequencer for Stub {
        fn update_mode(&mut self, _force: bool) {}
        fn initialize(&mut self) -> HookResult {
            Ok(())
        }
        fn update(&mut self) -> HookResult<Option<TrajectoryCommand>> {
            Ok(None)
        }
        fn end(&mut self) {}
        fn starting_pose(&self) -> Option<Pose2d> {
            None
        }
    }
    impl TelemetrySink for Stub {
        fn publish(&mut self, _frame: &TelemetryFrame) -> HookResult {
            Ok(())
        }
    }
    impl HealthMonitor for Stub {
        fn stop_threads(&mut self) {
            self.1.borrow_mut().push(format!("{}.stop_threads", self.0));
        }
    }

    fn parts(log: &Log, monitor: bool) -> RobotParts {
        RobotParts {
            input: Box::new(Unplugged),
            alliance: Box::new(Alliance::Blue),
            drivetrain: Box::new(Stub("drivetrain", Rc::clone(log))),
            sequencer: Box::new(Stub("sequencer", Rc::clone(log))),
            telemetry: Box::new(Stub("telemetry", Rc::clone(log))),
            health_monitor: monitor
                .then(|| Box::new(Stub("monitor", Rc::clone(log))) as Box<dyn HealthMonitor>),
        }
    }

    #[test]
    fn test_teardown_order_and_idempotence() -> Result<(), FieldbotError> {
        let log = Log::default();
        let mut robot = Robot::new(RobotConfig::default(), parts(&log, true), FaultRegistry::new())?;

        robot.end_competition();
        robot.end_competition();
        drop(robot);

        assert_eq!(
            *log.borrow(),
            vec![
                "monitor.stop_threads",
                "sequencer.shutdown",
                "drivetrain.shutdown",
                "telemetry.shutdown",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_teardown_without_monitor() -> Result<(), FieldbotError> {
        let log = Log::default();
        let mut robot = Robot::new(RobotConfig::default(), parts(&log, false), FaultRegistry::new())?;

        robot.end_competition();

        assert!(robot.is_ended());
        assert_eq!(log.borrow().len(), 3);
        assert!(!log.borrow().iter().any(|c| c.contains("stop_threads")));
        Ok(())
    }

    #[test]
    fn test_failed_construction_tears_down_parts() {
        let log = Log::default();
        let mut config = RobotConfig::default();
        config.driver.max_translate_accel_mps2 = -1.0;

        let result = Robot::new(config, parts(&log, true), FaultRegistry::new());

        assert!(result.is_err());
        assert_eq!(
            log.borrow().first().map(String::as_str),
            Some("monitor.stop_threads")
        );
    }

    #[test]
    fn test_drop_tears_down() -> Result<(), FieldbotError> {
        let log = Log::default();
        let robot = Robot::new(RobotConfig::default(), parts(&log, true), FaultRegistry::new())?;
        drop(robot);
        assert_eq!(log.borrow().len(), 4);
        Ok(())
    }
}
