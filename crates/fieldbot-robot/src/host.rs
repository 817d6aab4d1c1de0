//! Host loop: paces the robot and handles hook failures.

use std::time::Duration;

use fieldbot_faults::FaultSnapshot;
use fieldbot_scheduler::{
    LoopConfig, LoopMetricsSummary, LoopTimer, Mode, ModeScheduler, SchedulerResult,
    SegmentSample,
};
use serde::Serialize;
use tracing::{error, info};

use crate::robot::Robot;

/// Source of the mode requested by the competition control system.
pub trait ModeSource {
    /// Mode requested for the tick at `now`. `None` ends the run.
    fn requested_mode(&mut self, now: Duration) -> Option<Mode>;
}

impl<F: FnMut(Duration) -> Option<Mode>> ModeSource for F {
    fn requested_mode(&mut self, now: Duration) -> Option<Mode> {
        self(now)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Ticks executed
    pub ticks: u64,
    /// Mode transitions completed
    pub transitions: u64,
    /// Mode active when the run ended
    pub final_mode: Option<Mode>,
    /// Whether autonomous ran during the run
    pub autonomous_has_run: bool,
    /// Loop lateness statistics
    pub loop_metrics: LoopMetricsSummary,
    /// Ticks whose work exceeded the budget
    pub over_budget_ticks: u64,
    /// Per-segment timing
    pub segments: Vec<SegmentSample>,
    /// Fault states at the end of the run
    pub faults: Vec<FaultSnapshot>,
}

/// Fixed-period host for a [`Robot`].
#[derive(Debug)]
pub struct RobotLoop {
    scheduler: ModeScheduler,
    timer: LoopTimer,
}

impl RobotLoop {
    /// Create a host loop.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`](fieldbot_scheduler::SchedulerError::InvalidConfig) if `config` is invalid.
    pub fn new(config: &LoopConfig) -> SchedulerResult<Self> {
        Ok(Self {
            scheduler: ModeScheduler::new(),
            timer: LoopTimer::from_config(config)?,
        })
    }

    /// Run until the mode source returns `None` or `max_ticks` ticks have run,
    /// then tear the robot down.
    ///
    /// # Errors
    ///
    /// On the first hook failure the drivetrain is commanded to zero, the
    /// robot is torn down and the
    /// [`SchedulerError`](fieldbot_scheduler::SchedulerError) is returned.
    pub fn run<S: ModeSource + ?Sized>(
        &mut self,
        robot: &mut Robot,
        source: &mut S,
        max_ticks: Option<u64>,
    ) -> SchedulerResult<RunSummary> {
        info!(period_ms = self.timer.period().as_millis() as u64, "robot loop started");

        loop {
            if max_ticks.is_some_and(|max| self.scheduler.tick_count() >= max) {
                info!("tick limit reached");
                break;
            }

            let now = self.timer.wait_for_tick();
            let Some(mode) = source.requested_mode(now) else {
                info!("mode source finished");
                break;
            };

            if let Err(e) = self.scheduler.tick(robot, mode, now) {
                error!(error = %e, tick = self.scheduler.tick_count(), "hook failed, disabling outputs");
                robot.disable_outputs();
                robot.end_competition();
                return Err(e);
            }
        }

        robot.end_competition();
        Ok(self.summary(robot))
    }

    fn summary(&mut self, robot: &Robot) -> RunSummary {
        RunSummary {
            ticks: self.scheduler.tick_count(),
            transitions: self.scheduler.transition_count(),
            final_mode: self.scheduler.current(),
            autonomous_has_run: self.scheduler.autonomous_has_run(),
            loop_metrics: self.timer.metrics_mut().summary(),
            over_budget_ticks: robot.timing().over_budget(),
            segments: robot.timing().snapshot(),
            faults: robot.faults().snapshot(),
        }
    }

    /// The scheduler driving the robot.
    pub fn scheduler(&self) -> &ModeScheduler {
        &self.scheduler
    }

    /// The loop pacer.
    pub fn timer(&self) -> &LoopTimer {
        &self.timer
    }
}
