//! Driver command pipeline.

use core::time::Duration;

use fieldbot_errors::ValidationError;
use fieldbot_faults::{Fault, FaultRegistry, FaultSeverity};
use fieldbot_filters::SignalConditioner;
use fieldbot_filters::prelude::FilterState;
use tracing::{info, warn};

use crate::command::DrivetrainCommand;
use crate::config::DriverInputConfig;
use crate::edge::ButtonEdge;
use crate::input::{AllianceSource, Axis, Button, InputDevice};

/// Turns one gamepad into a [`DrivetrainCommand`] and driver intents.
///
/// Call [`update`](Self::update) exactly once per tick; every getter returns
/// the result of the most recent update.
///
/// # Button map
///
/// | Input | Effect |
/// |---|---|
/// | Left stick Y | forward/backward |
/// | Left stick X | strafe |
/// | Right stick X | rotation (negated) |
/// | Right bumper (held) | full translational speed, else reduced |
/// | B (held) | auto-drive intent |
/// | A (held) | auto-steer intent |
/// | Back (held) | reset-heading intent |
/// | Y (pressed) | debug-marker intent, one tick per press |
#[derive(Debug)]
pub struct DriverCommandPipeline {
    config: DriverInputConfig,
    forward: SignalConditioner,
    strafe: SignalConditioner,
    rotate: SignalConditioner,
    debug_marker_edge: ButtonEdge,

    command: DrivetrainCommand,
    auto_drive: bool,
    auto_steer: bool,
    reset_heading: bool,
    debug_marker: bool,
    connected: bool,

    unplugged: Fault,
}

impl DriverCommandPipeline {
    /// Build the pipeline and register its connectivity fault.
    ///
    /// `nominal_period` is the loop period, used as the limiter time step on
    /// the very first update.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `config` is invalid.
    pub fn new(
        config: DriverInputConfig,
        nominal_period: Duration,
        faults: &mut FaultRegistry,
    ) -> Result<Self, ValidationError> {
        config.validate()?;

        let forward = SignalConditioner::new(config.forward_conditioner()?, nominal_period);
        let strafe = SignalConditioner::new(config.strafe_conditioner()?, nominal_period);
        let rotate = SignalConditioner::new(config.rotate_conditioner()?, nominal_period);
        let unplugged = faults.register(&config.unplugged_fault_name(), FaultSeverity::Critical);

        Ok(Self {
            config,
            forward,
            strafe,
            rotate,
            debug_marker_edge: ButtonEdge::Released,
            command: DrivetrainCommand::ZERO,
            auto_drive: false,
            auto_steer: false,
            reset_heading: false,
            debug_marker: false,
            connected: false,
            unplugged,
        })
    }

    /// Read the device and recompute the command and intents.
    ///
    /// `now` is the scheduler timestamp of this tick. The alliance is queried
    /// once, and only while the device is connected.
    pub fn update<D, A>(&mut self, device: &mut D, alliance: &A, now: Duration)
    where
        D: InputDevice + ?Sized,
        A: AllianceSource + ?Sized,
    {
        device.poll();

        if !device.is_connected() {
            self.enter_safe_state();
            return;
        }

        // Joystick conventions to robot conventions
        let mut fwd_raw = device.axis(Axis::LeftY);
        let mut strafe_raw = device.axis(Axis::LeftX);
        let rot_raw = -device.axis(Axis::RightX);

        // Flip before the deadband so the threshold is alliance-symmetric
        if alliance.is_on_mirrored_alliance() {
            fwd_raw = -fwd_raw;
            strafe_raw = -strafe_raw;
        }

        let speed = if device.button(Button::RightBumper) {
            1.0
        } else {
            self.config.reduced_speed_multiplier
        };

        self.command = DrivetrainCommand {
            vel_x_mps: self.forward.calculate_scaled(fwd_raw, speed, now),
            vel_y_mps: self.strafe.calculate_scaled(strafe_raw, speed, now),
            vel_t_radps: self
                .rotate
                .calculate_scaled(rot_raw, self.config.rotation_derate, now),
        };

        self.auto_drive = device.button(Button::B);
        self.auto_steer = device.button(Button::A);
        self.reset_heading = device.button(Button::Back);
        self.debug_marker = self.debug_marker_edge.update(device.button(Button::Y));

        if !self.connected {
            info!(
                controller = self.config.controller_index,
                "Driver controller connected"
            );
        }
        self.connected = true;
        self.unplugged.set_no_fault();
    }

    /// Zero command, no intents, fault asserted. The limiters are left
    /// untouched; the debug-marker edge is released so a button still held on
    /// reconnect reports a press.
    fn enter_safe_state(&mut self) {
        if self.connected {
            warn!(
                controller = self.config.controller_index,
                "Driver controller disconnected, commanding zero motion"
            );
        }
        self.command = DrivetrainCommand::ZERO;
        self.auto_drive = false;
        self.auto_steer = false;
        self.reset_heading = false;
        self.debug_marker = false;
        self.debug_marker_edge.reset();
        self.connected = false;
        self.unplugged.set_faulted();
    }

    /// Command from the last update.
    #[inline]
    pub fn command(&self) -> DrivetrainCommand {
        self.command
    }

    /// Driver is asking the robot to drive itself to a target.
    #[inline]
    pub fn auto_drive_intent(&self) -> bool {
        self.auto_drive
    }

    /// Driver is asking the robot to steer itself toward a target.
    #[inline]
    pub fn auto_steer_intent(&self) -> bool {
        self.auto_steer
    }

    /// Driver is asking to re-zero the heading.
    #[inline]
    pub fn reset_heading_intent(&self) -> bool {
        self.reset_heading
    }

    /// Driver pressed the debug-marker button this tick.
    #[inline]
    pub fn debug_marker_intent(&self) -> bool {
        self.debug_marker
    }

    /// Whether the device was connected at the last update.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connectivity fault handle.
    pub fn unplugged_fault(&self) -> &Fault {
        &self.unplugged
    }

    /// Configuration in use.
    pub fn config(&self) -> &DriverInputConfig {
        &self.config
    }

    /// Zero the limiters and the edge detector, e.g. after a long pause.
    pub fn reset(&mut self) {
        self.forward.reset();
        self.strafe.reset();
        self.rotate.reset();
        self.debug_marker_edge.reset();
        self.command = DrivetrainCommand::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Alliance;
    use approx::assert_abs_diff_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Pad {
        connected: bool,
        axes: HashMap<Axis, f64>,
        held: Vec<Button>,
        polls: u32,
    }

    impl InputDevice for Pad {
        fn poll(&mut self) {
            self.polls += 1;
        }
        fn is_connected(&self) -> bool {
            self.connected
        }
        fn axis(&self, axis: Axis) -> f64 {
            self.axes.get(&axis).copied().unwrap_or(0.0)
        }
        fn button(&self, button: Button) -> bool {
            self.held.contains(&button)
        }
    }

    const TICK: Duration = Duration::from_millis(20);

    fn unlimited() -> DriverInputConfig {
        DriverInputConfig {
            max_translate_accel_mps2: 1.0e6,
            max_rotate_accel_radps2: 1.0e6,
            ..DriverInputConfig::default()
        }
    }

    fn pipeline(config: DriverInputConfig) -> Result<(DriverCommandPipeline, FaultRegistry), ValidationError> {
        let mut faults = FaultRegistry::new();
        let pipeline = DriverCommandPipeline::new(config, TICK, &mut faults)?;
        Ok((pipeline, faults))
    }

    #[test]
    fn test_worked_example() -> Result<(), ValidationError> {
        let (mut p, _) = pipeline(unlimited())?;
        let mut pad = Pad {
            connected: true,
            ..Pad::default()
        };
        pad.axes.insert(Axis::LeftY, 0.5);

        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);

        assert_abs_diff_eq!(p.command().vel_x_mps, 1.05, epsilon = 1e-9);
        assert_abs_diff_eq!(p.command().vel_y_mps, 0.0);
        assert_eq!(pad.polls, 1);
        Ok(())
    }

    #[test]
    fn test_bumper_selects_full_speed() -> Result<(), ValidationError> {
        let (mut p, _) = pipeline(unlimited())?;
        let mut pad = Pad {
            connected: true,
            held: vec![Button::RightBumper],
            ..Pad::default()
        };
        pad.axes.insert(Axis::LeftX, 1.0);

        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);

        assert_abs_diff_eq!(p.command().vel_y_mps, 4.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_rotation_negated_and_derated() -> Result<(), ValidationError> {
        let (mut p, _) = pipeline(unlimited())?;
        let mut pad = Pad {
            connected: true,
            held: vec![Button::RightBumper],
            ..Pad::default()
        };
        pad.axes.insert(Axis::RightX, 1.0);

        p.update(&mut pad, &Alliance::Red, Duration::ZERO);

        // bumper does not affect rotation; alliance does not either
        assert_abs_diff_eq!(p.command().vel_t_radps, -6.0 * 0.8, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_disconnect_safe_state() -> Result<(), ValidationError> {
        let (mut p, faults) = pipeline(unlimited())?;
        let mut pad = Pad {
            connected: true,
            held: vec![Button::A, Button::B, Button::Back],
            ..Pad::default()
        };
        pad.axes.insert(Axis::LeftY, 1.0);
        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);
        assert!(p.auto_drive_intent() && p.auto_steer_intent() && p.reset_heading_intent());

        pad.connected = false;
        p.update(&mut pad, &Alliance::Blue, TICK);

        assert_eq!(p.command(), DrivetrainCommand::ZERO);
        assert!(!p.auto_drive_intent());
        assert!(!p.auto_steer_intent());
        assert!(!p.reset_heading_intent());
        assert!(!p.is_connected());
        assert!(faults.is_faulted("Driver controller (0) unplugged"));
        Ok(())
    }

    #[test]
    fn test_disconnect_does_not_advance_limiter() -> Result<(), ValidationError> {
        let (mut p, _) = pipeline(DriverInputConfig::default())?;
        let mut pad = Pad {
            connected: true,
            held: vec![Button::RightBumper],
            ..Pad::default()
        };
        pad.axes.insert(Axis::LeftY, 1.0);

        // Ramp: 8 m/s² × 20 ms = 0.16 m/s per tick
        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);
        p.update(&mut pad, &Alliance::Blue, TICK);
        assert_abs_diff_eq!(p.command().vel_x_mps, 0.32, epsilon = 1e-9);

        pad.connected = false;
        p.update(&mut pad, &Alliance::Blue, TICK * 2);
        assert_eq!(p.command(), DrivetrainCommand::ZERO);

        // Resumes from 0.32 with dt measured from the last conditioned tick
        pad.connected = true;
        p.update(&mut pad, &Alliance::Blue, TICK * 3);
        assert_abs_diff_eq!(p.command().vel_x_mps, 0.64, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_reconnect_clears_fault() -> Result<(), ValidationError> {
        let (mut p, faults) = pipeline(unlimited())?;
        let mut pad = Pad::default();

        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);
        assert!(faults.any_active());

        pad.connected = true;
        p.update(&mut pad, &Alliance::Blue, TICK);
        assert!(!faults.any_active());
        assert!(p.is_connected());
        Ok(())
    }

    #[test]
    fn test_debug_marker_edge() -> Result<(), ValidationError> {
        let (mut p, _) = pipeline(unlimited())?;
        let mut pad = Pad {
            connected: true,
            held: vec![Button::Y],
            ..Pad::default()
        };

        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);
        assert!(p.debug_marker_intent());
        p.update(&mut pad, &Alliance::Blue, TICK);
        assert!(!p.debug_marker_intent());

        pad.held.clear();
        p.update(&mut pad, &Alliance::Blue, TICK * 2);
        pad.held.push(Button::Y);
        p.update(&mut pad, &Alliance::Blue, TICK * 3);
        assert!(p.debug_marker_intent());
        Ok(())
    }

    #[test]
    fn test_debug_marker_held_through_disconnect_fires_on_reconnect() -> Result<(), ValidationError> {
        let (mut p, _) = pipeline(unlimited())?;
        let mut pad = Pad {
            connected: true,
            held: vec![Button::Y],
            ..Pad::default()
        };
        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);
        assert!(p.debug_marker_intent());

        pad.connected = false;
        p.update(&mut pad, &Alliance::Blue, TICK);
        assert!(!p.debug_marker_intent());

        // Y never released
        pad.connected = true;
        p.update(&mut pad, &Alliance::Blue, TICK * 2);
        assert!(p.debug_marker_intent());
        p.update(&mut pad, &Alliance::Blue, TICK * 3);
        assert!(!p.debug_marker_intent());
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DriverInputConfig {
            max_rotate_accel_radps2: -3.0,
            ..DriverInputConfig::default()
        };
        let mut faults = FaultRegistry::new();
        assert!(DriverCommandPipeline::new(config, TICK, &mut faults).is_err());
        assert!(faults.is_empty());
    }

    #[test]
    fn test_reset_zeroes_limiters() -> Result<(), ValidationError> {
        let (mut p, _) = pipeline(DriverInputConfig::default())?;
        let mut pad = Pad {
            connected: true,
            held: vec![Button::RightBumper],
            ..Pad::default()
        };
        pad.axes.insert(Axis::LeftY, 1.0);
        p.update(&mut pad, &Alliance::Blue, Duration::ZERO);
        p.update(&mut pad, &Alliance::Blue, TICK);

        p.reset();
        assert_eq!(p.command(), DrivetrainCommand::ZERO);

        p.update(&mut pad, &Alliance::Blue, TICK * 2);
        assert_abs_diff_eq!(p.command().vel_x_mps, 0.16, epsilon = 1e-9);
        Ok(())
    }
}
