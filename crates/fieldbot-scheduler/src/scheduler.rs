//! Mode scheduler: the phase state machine.
//!
//! The scheduler is the only writer of the current mode. It does not own the
//! hooks; the host lends them for each tick, which keeps the robot's
//! subsystems owned in one place.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{HookKind, SchedulerError, SchedulerResult};
use crate::mode::{Mode, PhaseContext, PhaseHooks, call_exit, call_init, call_periodic};

/// A completed mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode that was exited, `None` on the first tick or after a failed init
    pub from: Option<Mode>,
    /// Mode that was entered
    pub to: Mode,
}

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Mode active at the end of the tick
    pub mode: Mode,
    /// Transition performed this tick, if any
    pub transition: Option<Transition>,
}

/// Finite-state dispatcher for [`Mode`] transitions.
///
/// # Invariants
///
/// - At most one mode is active at a time.
/// - For a transition A → B, `A.exit` returns before `B.init` starts and
///   `B.init` returns before the first `B.periodic`.
/// - A mode becomes current only after its init succeeded. If init fails the
///   scheduler has no current mode, and the next tick retries init without
///   calling any exit hook again.
#[derive(Debug, Clone, Default)]
pub struct ModeScheduler {
    current: Option<Mode>,
    autonomous_has_run: bool,
    tick_count: u64,
    transition_count: u64,
}

impl ModeScheduler {
    /// Create a scheduler with no active mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one loop tick.
    ///
    /// Performs the transition hooks if `requested` differs from the current
    /// mode, then the requested mode's periodic hook, then
    /// [`PhaseHooks::robot_periodic`].
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::HookFailed`] for the first hook that fails.
    /// The remaining hooks of the tick are skipped.
    pub fn tick<H: PhaseHooks + ?Sized>(
        &mut self,
        hooks: &mut H,
        requested: Mode,
        now: Duration,
    ) -> SchedulerResult<TickOutcome> {
        self.tick_count += 1;

        let transition = if self.current == Some(requested) {
            None
        } else {
            Some(self.transition(hooks, requested, now)?)
        };

        let ctx = self.context(requested, now);
        call_periodic(hooks, &ctx)
            .map_err(|e| SchedulerError::hook(requested, HookKind::Periodic, e))?;
        hooks
            .robot_periodic(&ctx)
            .map_err(|e| SchedulerError::hook(requested, HookKind::RobotPeriodic, e))?;

        Ok(TickOutcome {
            tick: self.tick_count,
            mode: requested,
            transition,
        })
    }

    fn transition<H: PhaseHooks + ?Sized>(
        &mut self,
        hooks: &mut H,
        to: Mode,
        now: Duration,
    ) -> SchedulerResult<Transition> {
        let from = self.current;

        if let Some(prev) = from {
            let ctx = self.context(prev, now);
            call_exit(hooks, &ctx).map_err(|e| SchedulerError::hook(prev, HookKind::Exit, e))?;
            self.current = None;
            debug!(mode = %prev, "exited mode");
        }

        let ctx = self.context(to, now);
        call_init(hooks, &ctx).map_err(|e| SchedulerError::hook(to, HookKind::Init, e))?;

        self.current = Some(to);
        if to == Mode::Autonomous {
            self.autonomous_has_run = true;
        }
        self.transition_count += 1;

        match from {
            Some(prev) => info!(from = %prev, to = %to, "mode transition"),
            None => info!(to = %to, "mode entered"),
        }

        Ok(Transition { from, to })
    }

    fn context(&self, mode: Mode, now: Duration) -> PhaseContext {
        PhaseContext {
            now,
            mode,
            autonomous_has_run: self.autonomous_has_run,
            tick: self.tick_count,
        }
    }

    /// Currently active mode.
    #[inline]
    pub fn current(&self) -> Option<Mode> {
        self.current
    }

    /// Whether autonomous init has completed at least once.
    #[inline]
    pub fn autonomous_has_run(&self) -> bool {
        self.autonomous_has_run
    }

    /// Ticks run so far, including failed ones.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Completed transitions so far.
    #[inline]
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }
}
