//! Filter state trait.

use crate::conditioner::SignalConditioner;
use crate::slew_rate::SlewRateState;

/// Common operations on stateful filters.
pub trait FilterState: core::fmt::Debug {
    /// Reset the filter state to initial values.
    fn reset(&mut self);
}

impl FilterState for SlewRateState {
    fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}

impl FilterState for SignalConditioner {
    fn reset(&mut self) {
        self.reset_state();
    }
}
