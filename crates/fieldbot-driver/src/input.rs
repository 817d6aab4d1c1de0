//! Input device and alliance contracts.

use serde::{Deserialize, Serialize};

/// Analog axes of a dual-stick gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left stick, horizontal
    LeftX,
    /// Left stick, vertical
    LeftY,
    /// Right stick, horizontal
    RightX,
    /// Right stick, vertical
    RightY,
    /// Left trigger
    LeftTrigger,
    /// Right trigger
    RightTrigger,
}

/// Digital buttons of a dual-stick gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// A (bottom face button)
    A,
    /// B (right face button)
    B,
    /// X (left face button)
    X,
    /// Y (top face button)
    Y,
    /// Left bumper
    LeftBumper,
    /// Right bumper
    RightBumper,
    /// Back / view
    Back,
    /// Start / menu
    Start,
    /// Left stick click
    LeftStick,
    /// Right stick click
    RightStick,
}

/// One physical human-interface device.
///
/// Reads are synchronous and bounded-time. Only level state is reported;
/// rising edges are derived by the caller with [`crate::ButtonEdge`].
pub trait InputDevice {
    /// Refresh cached device state. Called once per tick before any read.
    fn poll(&mut self) {}

    /// Whether the device is present and reporting.
    fn is_connected(&self) -> bool;

    /// Axis value, nominally in `[-1, 1]`.
    fn axis(&self, axis: Axis) -> f64;

    /// Whether a button is currently held.
    fn button(&self, button: Button) -> bool;
}

impl<D: InputDevice + ?Sized> InputDevice for Box<D> {
    fn poll(&mut self) {
        (**self).poll();
    }
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
    fn axis(&self, axis: Axis) -> f64 {
        (**self).axis(axis)
    }
    fn button(&self, button: Button) -> bool {
        (**self).button(button)
    }
}

/// Source of the robot's alliance assignment.
pub trait AllianceSource {
    /// Whether the robot is on the alliance whose field coordinates are
    /// mirrored (red).
    fn is_on_mirrored_alliance(&self) -> bool;
}

/// Alliance colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    /// Red: field coordinates mirrored
    Red,
    /// Blue: field coordinates as-is
    #[default]
    Blue,
}

impl AllianceSource for Alliance {
    fn is_on_mirrored_alliance(&self) -> bool {
        matches!(self, Alliance::Red)
    }
}

impl<A: AllianceSource + ?Sized> AllianceSource for Box<A> {
    fn is_on_mirrored_alliance(&self) -> bool {
        (**self).is_on_mirrored_alliance()
    }
}
