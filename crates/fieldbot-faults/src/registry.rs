//! Fault registry.

use std::sync::Arc;

use serde::Serialize;

use crate::fault::{Fault, FaultSeverity};

/// Point-in-time view of one fault, suitable for telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultSnapshot {
    /// Fault name
    pub name: String,
    /// Fault severity
    pub severity: FaultSeverity,
    /// Whether the fault was asserted when the snapshot was taken
    pub active: bool,
    /// Number of times the fault has been asserted
    pub assert_count: u64,
}

/// Owner of every fault in the process.
///
/// Created once at startup and passed explicitly to the components that
/// register faults; there is no global fault list.
#[derive(Debug, Default, Clone)]
pub struct FaultRegistry {
    faults: Vec<Fault>,
}

impl FaultRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fault and return its handle.
    ///
    /// Registering a name that already exists returns a handle to the
    /// existing fault; the first registered severity is kept.
    pub fn register(&mut self, name: &str, severity: FaultSeverity) -> Fault {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        let fault = Fault::new(name, severity);
        self.faults.push(fault.clone());
        fault
    }

    /// Look up a fault by name.
    pub fn get(&self, name: &str) -> Option<Fault> {
        self.faults.iter().find(|f| f.name() == name).cloned()
    }

    /// Whether the named fault exists and is asserted.
    pub fn is_faulted(&self, name: &str) -> bool {
        self.faults.iter().any(|f| f.name() == name && f.is_active())
    }

    /// Whether any fault is asserted.
    pub fn any_active(&self) -> bool {
        self.faults.iter().any(Fault::is_active)
    }

    /// Number of asserted faults.
    pub fn active_count(&self) -> usize {
        self.faults.iter().filter(|f| f.is_active()).count()
    }

    /// Asserted faults, in registration order.
    pub fn active(&self) -> impl Iterator<Item = &Fault> + '_ {
        self.faults.iter().filter(|f| f.is_active())
    }

    /// Names of asserted faults, in registration order.
    pub fn active_names(&self) -> Vec<Arc<str>> {
        self.active().map(|f| Arc::clone(&f.cell.name)).collect()
    }

    /// Highest severity among asserted faults.
    pub fn worst_active_severity(&self) -> Option<FaultSeverity> {
        self.active().map(Fault::severity).min()
    }

    /// Snapshot of every registered fault.
    pub fn snapshot(&self) -> Vec<FaultSnapshot> {
        self.faults
            .iter()
            .map(|f| FaultSnapshot {
                name: f.name().to_string(),
                severity: f.severity(),
                active: f.is_active(),
                assert_count: f.assert_count(),
            })
            .collect()
    }

    /// Number of registered faults.
    pub fn len(&self) -> usize {
        self.faults.len()
    }

    /// Whether no faults are registered.
    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// Clear every fault.
    pub fn clear_all(&self) {
        for fault in &self.faults {
            fault.set_no_fault();
        }
    }
}
