//! Deadband with continuous rescale.

/// Apply a deadband to a normalized axis value.
///
/// Values with `|value| < threshold` map to `0.0`. Values beyond the threshold
/// are rescaled linearly so that the output is `0.0` at the threshold and
/// `±1.0` at full deflection:
///
/// ```text
/// out = sign(x) · (|x| − threshold) / (1 − threshold)
/// ```
///
/// The input is clamped to `[-1.0, 1.0]` first. Non-finite input is treated as
/// a centered stick and returns `0.0`.
///
/// `threshold` must lie in `[0.0, 1.0)`; [`crate::ConditionerConfig`] enforces
/// this at construction.
///
/// # Example
///
/// ```
/// use fieldbot_filters::apply_deadband;
///
/// assert_eq!(apply_deadband(0.19, 0.2), 0.0);
/// assert!((apply_deadband(0.6, 0.2) - 0.5).abs() < 1e-12);
/// assert!((apply_deadband(-1.0, 0.2) + 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn apply_deadband(value: f64, threshold: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    let value = value.clamp(-1.0, 1.0);
    let magnitude = value.abs();
    if magnitude < threshold {
        return 0.0;
    }

    let span = 1.0 - threshold;
    if span <= 0.0 {
        return 0.0;
    }

    value.signum() * (magnitude - threshold) / span
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_inside_deadband_is_zero() {
        for raw in [0.0, 0.05, -0.1, 0.199_999, -0.199_999] {
            assert_eq!(apply_deadband(raw, 0.2), 0.0);
        }
    }

    #[test]
    fn test_threshold_boundary_is_continuous() {
        assert_abs_diff_eq!(apply_deadband(0.2, 0.2), 0.0);
        assert_abs_diff_eq!(apply_deadband(0.200_001, 0.2), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(apply_deadband(-0.200_001, 0.2), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_full_deflection_maps_to_unit() {
        assert_abs_diff_eq!(apply_deadband(1.0, 0.2), 1.0);
        assert_abs_diff_eq!(apply_deadband(-1.0, 0.2), -1.0);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_abs_diff_eq!(apply_deadband(3.0, 0.2), 1.0);
        assert_abs_diff_eq!(apply_deadband(-7.5, 0.2), -1.0);
    }

    #[test]
    fn test_non_finite_input_is_centered() {
        assert_eq!(apply_deadband(f64::NAN, 0.2), 0.0);
        assert_eq!(apply_deadband(f64::INFINITY, 0.2), 0.0);
        assert_eq!(apply_deadband(f64::NEG_INFINITY, 0.2), 0.0);
    }

    #[test]
    fn test_zero_threshold_is_identity() {
        assert_abs_diff_eq!(apply_deadband(0.37, 0.0), 0.37);
        assert_abs_diff_eq!(apply_deadband(-0.8, 0.0), -0.8);
    }

    #[test]
    fn test_half_deflection_rescale() {
        // (0.5 - 0.2) / (1 - 0.2)
        assert_abs_diff_eq!(apply_deadband(0.5, 0.2), 0.375, epsilon = 1e-12);
    }
}
