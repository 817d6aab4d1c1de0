//! Driver pipeline behaviour over many ticks.

use std::time::Duration;

use approx::assert_abs_diff_eq;
use fieldbot_driver::prelude::*;
use fieldbot_faults::FaultRegistry;
use fieldbot_test_helpers::prelude::*;
use proptest::prelude::*;

const TICK: Duration = Duration::from_millis(20);
const UNPLUGGED: &str = "Driver controller (0) unplugged";

fn at(tick: u32) -> Duration {
    TICK * tick
}

fn unlimited() -> DriverInputConfig {
    DriverInputConfig {
        max_translate_accel_mps2: 1.0e6,
        max_rotate_accel_radps2: 1.0e6,
        ..DriverInputConfig::default()
    }
}

fn pipeline(config: DriverInputConfig) -> (DriverCommandPipeline, FaultRegistry) {
    let mut faults = FaultRegistry::new();
    let p = must(DriverCommandPipeline::new(config, TICK, &mut faults));
    (p, faults)
}

#[test]
fn test_registers_unplugged_fault() {
    let (p, faults) = pipeline(DriverInputConfig::default());
    assert_eq!(faults.len(), 1);
    assert!(faults.get(UNPLUGGED).is_some());
    assert!(!p.unplugged_fault().is_active());
}

#[test]
fn test_invalid_config_registers_nothing() {
    let mut faults = FaultRegistry::new();
    let config = DriverInputConfig {
        deadband: 1.5,
        ..DriverInputConfig::default()
    };
    must_err(DriverCommandPipeline::new(config, TICK, &mut faults));
    assert!(faults.is_empty());
}

#[test]
fn test_full_stick_ramps_to_max_speed() {
    let (mut p, _faults) = pipeline(DriverInputConfig::default());
    let mut pad = FakeGamepad::new();
    let alliance = FakeAlliance::blue();
    pad.set_axis(Axis::LeftY, 1.0);
    pad.press(Button::RightBumper);

    let mut previous = 0.0;
    for tick in 0..30 {
        p.update(&mut pad, &alliance, at(tick));
        let now = p.command().vel_x_mps;
        assert!(now - previous <= 0.16 + 1e-9, "tick {tick}: {previous} -> {now}");
        previous = now;
    }
    // 25 ticks at 0.16 m/s per tick reach 4 m/s
    assert_abs_diff_eq!(previous, 4.0, epsilon = 1e-9);
}

#[test]
fn test_reduced_speed_without_bumper() {
    let (mut p, _faults) = pipeline(unlimited());
    let mut pad = FakeGamepad::new();
    pad.set_axis(Axis::LeftX, -1.0);
    pad.set_axis(Axis::RightX, 1.0);

    p.update(&mut pad, &FakeAlliance::blue(), at(0));

    let cmd = p.command();
    assert_abs_diff_eq!(cmd.vel_y_mps, -2.8, epsilon = 1e-9);
    // right stick is negated and derated
    assert_abs_diff_eq!(cmd.vel_t_radps, -4.8, epsilon = 1e-9);
}

#[test]
fn test_repeated_timestamp_is_idempotent() {
    let (mut p, _faults) = pipeline(DriverInputConfig::default());
    let mut pad = FakeGamepad::new();
    let alliance = FakeAlliance::blue();
    pad.set_axis(Axis::LeftY, 0.9);
    pad.press(Button::A);

    p.update(&mut pad, &alliance, at(3));
    let first = p.command();
    p.update(&mut pad, &alliance, at(3));

    assert_eq!(p.command(), first);
    assert!(p.auto_steer_intent());
}

#[test]
fn test_debug_marker_fires_once_per_press() {
    let (mut p, _faults) = pipeline(DriverInputConfig::default());
    let mut pad = FakeGamepad::new();
    let alliance = FakeAlliance::blue();

    pad.press(Button::Y);
    let held: Vec<bool> = (0..5)
        .map(|tick| {
            p.update(&mut pad, &alliance, at(tick));
            p.debug_marker_intent()
        })
        .collect();
    assert_eq!(held, vec![true, false, false, false, false]);

    pad.release(Button::Y);
    p.update(&mut pad, &alliance, at(5));
    assert!(!p.debug_marker_intent());

    pad.press(Button::Y);
    p.update(&mut pad, &alliance, at(6));
    assert!(p.debug_marker_intent());
}

#[test]
fn test_alliance_only_queried_while_connected() {
    let (mut p, _faults) = pipeline(DriverInputConfig::default());
    let mut pad = FakeGamepad::new();
    let alliance = FakeAlliance::red();

    for tick in 0..3 {
        p.update(&mut pad, &alliance, at(tick));
    }
    pad.set_connected(false);
    for tick in 3..6 {
        p.update(&mut pad, &alliance, at(tick));
    }

    assert_eq!(alliance.queries(), 3);
    assert_eq!(pad.polls(), 6);
}

#[test]
fn test_unplug_clears_everything_and_recovers() {
    let (mut p, faults) = pipeline(DriverInputConfig::default());
    let mut pad = FakeGamepad::new();
    let alliance = FakeAlliance::blue();
    pad.set_axis(Axis::LeftY, 1.0);
    pad.press(Button::RightBumper);
    pad.press(Button::B);
    pad.press(Button::Back);

    p.update(&mut pad, &alliance, at(0));
    assert!(p.auto_drive_intent());
    assert!(p.reset_heading_intent());

    pad.set_connected(false);
    p.update(&mut pad, &alliance, at(1));

    assert!(p.command().is_stopped());
    assert!(!p.auto_drive_intent());
    assert!(!p.reset_heading_intent());
    assert!(!p.is_connected());
    assert!(faults.is_faulted(UNPLUGGED));

    pad.set_connected(true);
    p.update(&mut pad, &alliance, at(2));

    assert!(p.is_connected());
    assert!(!faults.any_active());
    // limiter resumes from 0.16 over the 40 ms since its last update
    assert_abs_diff_eq!(p.command().vel_x_mps, 0.48, epsilon = 1e-9);
    assert_eq!(must_some(faults.get(UNPLUGGED), "fault").assert_count(), 1);
}

#[test]
fn test_reset_forgets_limiter_history() {
    let (mut p, _faults) = pipeline(DriverInputConfig::default());
    let mut pad = FakeGamepad::new();
    let alliance = FakeAlliance::blue();
    pad.set_axis(Axis::LeftY, 1.0);
    pad.press(Button::RightBumper);

    for tick in 0..10 {
        p.update(&mut pad, &alliance, at(tick));
    }
    p.reset();
    assert!(p.command().is_stopped());

    p.update(&mut pad, &alliance, Duration::from_secs(60));
    assert_abs_diff_eq!(p.command().vel_x_mps, 0.16, epsilon = 1e-9);
}

fn axis_value() -> impl Strategy<Value = f64> {
    -1.0f64..=1.0
}

proptest! {
    #[test]
    fn prop_alliances_mirror_translation(
        lx in axis_value(),
        ly in axis_value(),
        rx in axis_value(),
        bumper in any::<bool>(),
    ) {
        let (mut blue, _f1) = pipeline(unlimited());
        let (mut red, _f2) = pipeline(unlimited());
        let mut pad = FakeGamepad::new();
        pad.set_axis(Axis::LeftX, lx);
        pad.set_axis(Axis::LeftY, ly);
        pad.set_axis(Axis::RightX, rx);
        if bumper {
            pad.press(Button::RightBumper);
        }

        blue.update(&mut pad, &FakeAlliance::blue(), at(0));
        red.update(&mut pad, &FakeAlliance::red(), at(0));

        let (b, r) = (blue.command(), red.command());
        prop_assert!((b.vel_x_mps + r.vel_x_mps).abs() < 1e-9);
        prop_assert!((b.vel_y_mps + r.vel_y_mps).abs() < 1e-9);
        prop_assert!((b.vel_t_radps - r.vel_t_radps).abs() < 1e-9);
    }

    #[test]
    fn prop_command_is_bounded_and_rate_limited(
        script in prop::collection::vec((axis_value(), axis_value(), axis_value(), any::<bool>()), 1..60),
    ) {
        let config = DriverInputConfig::default();
        let (mut p, _faults) = pipeline(config.clone());
        let mut pad = FakeGamepad::new();
        let alliance = FakeAlliance::blue();
        let max_dv = config.max_translate_accel_mps2 * TICK.as_secs_f64() + 1e-9;
        let max_dw = config.max_rotate_accel_radps2 * TICK.as_secs_f64() + 1e-9;

        let mut previous = DrivetrainCommand::ZERO;
        for (tick, (lx, ly, rx, bumper)) in (0u32..).zip(script) {
            pad.set_axis(Axis::LeftX, lx);
            pad.set_axis(Axis::LeftY, ly);
            pad.set_axis(Axis::RightX, rx);
            if bumper {
                pad.press(Button::RightBumper);
            } else {
                pad.release(Button::RightBumper);
            }
            p.update(&mut pad, &alliance, at(tick));
            let cmd = p.command();

            prop_assert!(cmd.vel_x_mps.abs() <= config.max_fwd_rev_speed_mps + 1e-9);
            prop_assert!(cmd.vel_y_mps.abs() <= config.max_strafe_speed_mps + 1e-9);
            prop_assert!(cmd.vel_t_radps.abs() <= config.max_rotate_speed_radps + 1e-9);
            prop_assert!((cmd.vel_x_mps - previous.vel_x_mps).abs() <= max_dv);
            prop_assert!((cmd.vel_y_mps - previous.vel_y_mps).abs() <= max_dv);
            prop_assert!((cmd.vel_t_radps - previous.vel_t_radps).abs() <= max_dw);
            previous = cmd;
        }
    }

    #[test]
    fn prop_disconnect_on_any_tick_zeroes_command(k in 0u32..30) {
        let (mut p, faults) = pipeline(DriverInputConfig::default());
        let mut pad = FakeGamepad::new();
        let alliance = FakeAlliance::blue();
        pad.set_axis(Axis::LeftY, -1.0);
        pad.set_axis(Axis::RightX, 0.6);
        pad.press(Button::B);

        for tick in 0..=k {
            pad.set_connected(tick != k);
            p.update(&mut pad, &alliance, at(tick));
        }

        prop_assert!(p.command().is_stopped());
        prop_assert!(!p.auto_drive_intent());
        prop_assert!(faults.is_faulted(UNPLUGGED));
    }

    #[test]
    fn prop_inside_deadband_is_zero(v in -0.2f64..=0.2) {
        let (mut p, _faults) = pipeline(unlimited());
        let mut pad = FakeGamepad::new();
        pad.set_axis(Axis::LeftX, v);
        pad.set_axis(Axis::LeftY, v);
        pad.set_axis(Axis::RightX, v);
        p.update(&mut pad, &FakeAlliance::red(), at(0));
        prop_assert!(p.command().is_stopped());
    }
}
