//! Slew Rate Limiter
//!
//! Restricts the rate of change of a setpoint so that commanded velocities
//! respect the drivetrain's acceleration limits.

use core::time::Duration;

/// State for the slew rate limiter.
///
/// The limit is expressed in units per second; the allowed change for a given
/// call is `rate_limit × dt`. Using the elapsed time rather than a fixed
/// per-tick step keeps the bound correct when the loop period varies.
///
/// # Loop Safety
///
/// - `#[repr(C)]` for stable layout
/// - No heap allocations
/// - O(1) time complexity
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlewRateState {
    /// Maximum rate of change in units per second
    pub rate_limit: f64,
    /// Previous output value
    pub prev_output: f64,
}

impl SlewRateState {
    /// Create a new slew rate limiter state starting at zero.
    ///
    /// # Arguments
    ///
    /// * `rate_limit` - Maximum rate of change per second (e.g. 8.0 m/s² for a
    ///   velocity setpoint)
    ///
    /// # Example
    ///
    /// ```
    /// use fieldbot_filters::SlewRateState;
    ///
    /// let state = SlewRateState::new(8.0);
    /// assert_eq!(state.prev_output, 0.0);
    /// ```
    pub fn new(rate_limit: f64) -> Self {
        Self {
            rate_limit,
            prev_output: 0.0,
        }
    }

    /// Create a limiter that never clamps.
    pub fn unlimited() -> Self {
        Self {
            rate_limit: f64::INFINITY,
            prev_output: 0.0,
        }
    }

    /// Largest change allowed over `dt`.
    #[inline]
    pub fn max_change(&self, dt: Duration) -> f64 {
        if self.rate_limit.is_infinite() {
            return f64::INFINITY;
        }
        self.rate_limit * dt.as_secs_f64()
    }
}

impl Default for SlewRateState {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Slew rate limiter - limits rate of change.
///
/// Moves the previous output towards `target` by at most
/// `state.rate_limit × dt`, stores the result and returns it.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use fieldbot_filters::{SlewRateState, slew_rate_filter};
///
/// let mut state = SlewRateState::new(8.0);
/// let out = slew_rate_filter(4.0, Duration::from_millis(20), &mut state);
/// assert!((out - 0.16).abs() < 1e-12);
/// ```
#[inline]
pub fn slew_rate_filter(target: f64, dt: Duration, state: &mut SlewRateState) -> f64 {
    let max_change = state.max_change(dt);
    let change = target - state.prev_output;

    let limited_change = if change.is_nan() {
        0.0
    } else {
        change.clamp(-max_change, max_change)
    };
    let limited_output = state.prev_output + limited_change;

    state.prev_output = limited_output;
    limited_output
}
