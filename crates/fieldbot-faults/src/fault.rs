//! Fault handle and severity.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How urgently an operator should react to a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FaultSeverity {
    /// Robot cannot be driven safely while this is active
    Critical,
    /// Degraded operation
    Warning,
    /// Informational only
    Info,
}

impl fmt::Display for FaultSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultSeverity::Critical => write!(f, "critical"),
            FaultSeverity::Warning => write!(f, "warning"),
            FaultSeverity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct FaultCell {
    pub(crate) name: Arc<str>,
    pub(crate) severity: FaultSeverity,
    pub(crate) active: AtomicBool,
    pub(crate) assert_count: AtomicU64,
}

/// Handle to one registered fault.
///
/// Cloning the handle is cheap; every clone refers to the same flag.
#[derive(Debug, Clone)]
pub struct Fault {
    pub(crate) cell: Arc<FaultCell>,
}

impl Fault {
    pub(crate) fn new(name: &str, severity: FaultSeverity) -> Self {
        Self {
            cell: Arc::new(FaultCell {
                name: Arc::from(name),
                severity,
                active: AtomicBool::new(false),
                assert_count: AtomicU64::new(0),
            }),
        }
    }

    /// Fault name as shown to operators.
    pub fn name(&self) -> &str {
        &self.cell.name
    }

    /// Fault severity.
    pub fn severity(&self) -> FaultSeverity {
        self.cell.severity
    }

    /// Whether the fault is currently asserted.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.cell.active.load(Ordering::Acquire)
    }

    /// Number of normal → faulted transitions since registration.
    pub fn assert_count(&self) -> u64 {
        self.cell.assert_count.load(Ordering::Relaxed)
    }

    /// Assert the fault. Logs only on the normal → faulted edge.
    #[inline]
    pub fn set_faulted(&self) {
        if !self.cell.active.swap(true, Ordering::AcqRel) {
            self.cell.assert_count.fetch_add(1, Ordering::Relaxed);
            warn!(fault = %self.cell.name, severity = %self.cell.severity, "fault asserted");
        }
    }

    /// Clear the fault. Logs only on the faulted → normal edge.
    #[inline]
    pub fn set_no_fault(&self) {
        if self.cell.active.swap(false, Ordering::AcqRel) {
            info!(fault = %self.cell.name, "fault cleared");
        }
    }

    /// Set the fault state from a boolean.
    pub fn set(&self, faulted: bool) {
        if faulted {
            self.set_faulted();
        } else {
            self.set_no_fault();
        }
    }
}
