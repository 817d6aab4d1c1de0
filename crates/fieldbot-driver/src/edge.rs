//! Rising-edge detection for buttons.

/// Two-state machine turning a level-sensitive button into a one-tick
/// "pressed" pulse.
///
/// ```text
///            held
///   Released ────► Pressed   (update returns true)
///      ▲              │
///      └──────────────┘
///          released           (update returns false)
/// ```
///
/// Staying in `Pressed` while the button is held returns `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonEdge {
    /// Button up
    #[default]
    Released,
    /// Button down
    Pressed,
}

impl ButtonEdge {
    /// Advance with the current level. Returns `true` only on the
    /// released → pressed transition.
    #[inline]
    pub fn update(&mut self, held: bool) -> bool {
        let rising = held && *self == ButtonEdge::Released;
        *self = if held {
            ButtonEdge::Pressed
        } else {
            ButtonEdge::Released
        };
        rising
    }

    /// Whether the button was held at the last update.
    pub fn is_pressed(self) -> bool {
        self == ButtonEdge::Pressed
    }

    /// Forget the last level.
    pub fn reset(&mut self) {
        *self = ButtonEdge::Released;
    }
}
