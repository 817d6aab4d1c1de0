//! Error types for the scheduler crate.

use core::fmt;

use fieldbot_errors::{FieldbotError, HookError, ValidationError};

use crate::mode::Mode;

/// Which hook of a phase was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Entry hook, once per transition into a mode
    Init,
    /// Per-tick hook of the active mode
    Periodic,
    /// Exit hook, once per transition out of a mode
    Exit,
    /// Every-mode periodic hook
    RobotPeriodic,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Init => write!(f, "init"),
            HookKind::Periodic => write!(f, "periodic"),
            HookKind::Exit => write!(f, "exit"),
            HookKind::RobotPeriodic => write!(f, "robot_periodic"),
        }
    }
}

/// Scheduler error.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// A phase hook returned an error
    #[error("{mode} {hook} hook failed: {source}")]
    HookFailed {
        /// Mode whose hook was running
        mode: Mode,
        /// Which hook
        hook: HookKind,
        /// The hook's error
        #[source]
        source: HookError,
    },

    /// Loop configuration rejected at construction time
    #[error("Invalid loop configuration: {0}")]
    InvalidConfig(#[from] ValidationError),
}

impl SchedulerError {
    pub(crate) fn hook(mode: Mode, hook: HookKind, source: HookError) -> Self {
        SchedulerError::HookFailed { mode, hook, source }
    }

    /// Mode in which the failure happened, if it came from a hook.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            SchedulerError::HookFailed { mode, .. } => Some(*mode),
            SchedulerError::InvalidConfig(_) => None,
        }
    }
}

impl From<SchedulerError> for FieldbotError {
    fn from(e: SchedulerError) -> Self {
        match e {
            SchedulerError::HookFailed { source, .. } => FieldbotError::Hook(source),
            SchedulerError::InvalidConfig(v) => FieldbotError::Validation(v),
        }
    }
}

/// Scheduler result type
pub type SchedulerResult<T = ()> = Result<T, SchedulerError>;
