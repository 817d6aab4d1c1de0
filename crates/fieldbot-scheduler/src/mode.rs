//! Operating modes and the phase-hook contract.

use core::fmt;
use std::time::Duration;

use fieldbot_errors::HookResult;
use serde::{Deserialize, Serialize};

/// Competition-enforced operating phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Outputs disabled; operators select routines and tune calibrations
    Disabled,
    /// Autonomous sequencer drives the robot
    Autonomous,
    /// Driver commands reach the drivetrain
    Teleop,
}

impl Mode {
    /// All modes, in match order.
    pub const ALL: [Mode; 3] = [Mode::Disabled, Mode::Autonomous, Mode::Teleop];

    /// Whether actuators may move in this mode.
    #[inline]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Mode::Disabled)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Disabled => write!(f, "disabled"),
            Mode::Autonomous => write!(f, "autonomous"),
            Mode::Teleop => write!(f, "teleop"),
        }
    }
}

/// Read-only view of scheduler state handed to every hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseContext {
    /// Scheduler timestamp of this tick (monotonic, from loop start)
    pub now: Duration,
    /// Mode whose hook is being called
    pub mode: Mode,
    /// Whether autonomous init has completed at least once this power cycle
    pub autonomous_has_run: bool,
    /// Tick number, starting at 1
    pub tick: u64,
}

/// Per-phase entry, periodic and exit hooks.
///
/// Every hook defaults to doing nothing, so implementors only override what
/// they need. Hooks run on the scheduler thread and must not block.
///
/// # Errors
///
/// Any error returned from a hook aborts the current tick and is surfaced to
/// the host loop. The scheduler never retries or swallows it.
pub trait PhaseHooks {
    /// Every-mode periodic hook, called after the active mode's periodic hook.
    fn robot_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Entered disabled.
    fn disabled_init(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Tick while disabled.
    fn disabled_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Leaving disabled.
    fn disabled_exit(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Entered autonomous.
    fn autonomous_init(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Tick while autonomous.
    fn autonomous_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Leaving autonomous. Must stop the sequencer whatever the reason.
    fn autonomous_exit(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Entered teleop.
    fn teleop_init(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Tick while teleop.
    fn teleop_periodic(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }

    /// Leaving teleop.
    fn teleop_exit(&mut self, _ctx: &PhaseContext) -> HookResult {
        Ok(())
    }
}

pub(crate) fn call_init<H: PhaseHooks + ?Sized>(hooks: &mut H, ctx: &PhaseContext) -> HookResult {
    match ctx.mode {
        Mode::Disabled => hooks.disabled_init(ctx),
        Mode::Autonomous => hooks.autonomous_init(ctx),
        Mode::Teleop => hooks.teleop_init(ctx),
    }
}

pub(crate) fn call_periodic<H: PhaseHooks + ?Sized>(
    hooks: &mut H,
    ctx: &PhaseContext,
) -> HookResult {
    match ctx.mode {
        Mode::Disabled => hooks.disabled_periodic(ctx),
        Mode::Autonomous => hooks.autonomous_periodic(ctx),
        Mode::Teleop => hooks.teleop_periodic(ctx),
    }
}

pub(crate) fn call_exit<H: PhaseHooks + ?Sized>(hooks: &mut H, ctx: &PhaseContext) -> HookResult {
    match ctx.mode {
        Mode::Disabled => hooks.disabled_exit(ctx),
        Mode::Autonomous => hooks.autonomous_exit(ctx),
        Mode::Teleop => hooks.teleop_exit(ctx),
    }
}
