//! Fault lifecycle as seen by an operator display.

use fieldbot_faults::prelude::*;

#[test]
fn test_controller_unplug_replug_cycle() {
    let mut registry = FaultRegistry::new();
    let unplugged = registry.register("Driver controller (0) unplugged", FaultSeverity::Critical);

    // 1. Nominal
    assert!(!registry.any_active());

    // 2. Controller pulled
    unplugged.set_faulted();
    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot[0].active);

    // 3. Display keeps showing it until cleared
    unplugged.set_faulted();
    assert_eq!(registry.active_count(), 1);

    // 4. Controller back
    unplugged.set_no_fault();
    let snapshot = registry.snapshot();
    assert!(!snapshot[0].active);
    assert_eq!(snapshot[0].assert_count, 1);
}

#[test]
fn test_active_names_in_registration_order() {
    let mut registry = FaultRegistry::new();
    let a = registry.register("first", FaultSeverity::Warning);
    let _b = registry.register("second", FaultSeverity::Warning);
    let c = registry.register("third", FaultSeverity::Critical);

    c.set_faulted();
    a.set_faulted();

    let names: Vec<String> = registry.active_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(names, vec!["first".to_string(), "third".to_string()]);
}
