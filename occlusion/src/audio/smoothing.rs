//! Exponential smoothing of occlusion parameters

/// Advance `current` one step toward `target`
///
/// A first-order exponential moving average: each step closes
/// `1 / coefficient` of the remaining gap. A coefficient of `0.0` snaps
/// straight to the target. Coefficients above `1.0` converge without
/// overshoot; values in `(0, 1)` overshoot and negative values diverge, which
/// is why configuration loading rejects them.
pub fn advance(current: f32, target: f32, coefficient: f32) -> f32 {
    if coefficient == 0.0 {
        return target;
    }
    current + (target - current) / coefficient
}

/// A parameter value with memory of its previous output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedValue {
    current: f32,
}

impl SmoothedValue {
    /// Start from `initial`
    pub fn new(initial: f32) -> Self {
        Self { current: initial }
    }

    /// Last output
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Step toward `target` and return the new value
    pub fn advance(&mut self, target: f32, coefficient: f32) -> f32 {
        self.current = advance(self.current, target, coefficient);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_at_target() {
        for coefficient in [0.5, 1.0, 2.0, 10.0, 250.0] {
            for x in [-3.0, 0.0, 0.42, 22000.0] {
                assert_eq!(advance(x, x, coefficient), x);
            }
        }
    }

    #[test]
    fn test_zero_coefficient_snaps() {
        assert_eq!(advance(0.3, 0.9, 0.0), 0.9);
        assert_eq!(advance(22000.0, 150.0, 0.0), 150.0);
    }

    #[test]
    fn test_unit_coefficient_reaches_target() {
        assert_eq!(advance(4.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_step_is_symmetric() {
        let up = advance(0.0, 1.0, 10.0) - 0.0;
        let down = 1.0 - advance(1.0, 0.0, 10.0);
        assert!((up - 0.1).abs() < 1e-6);
        assert!((up - down).abs() < 1e-6);
    }

    #[test]
    fn test_converges_monotonically_without_overshoot() {
        for (start, target) in [(0.0_f32, 1.0_f32), (22000.0, 2578.0), (1.0, -0.26)] {
            let mut value = SmoothedValue::new(start);
            let mut previous_gap = (target - start).abs();

            for _ in 0..200 {
                let next = value.advance(target, 10.0);
                let gap = (target - next).abs();
                assert!(gap <= previous_gap);
                // Never crosses to the other side of the target
                assert!((next - target).signum() == (start - target).signum() || gap == 0.0);
                previous_gap = gap;
            }

            assert!(previous_gap < 1e-2);
        }
    }

    #[test]
    fn test_fractional_coefficient_overshoots() {
        // Documented behaviour for coefficients in (0, 1)
        assert_eq!(advance(0.0, 1.0, 0.5), 2.0);
    }

    #[test]
    fn test_smoothed_value_keeps_memory() {
        let mut value = SmoothedValue::new(1.0);
        value.advance(0.0, 2.0);
        assert_eq!(value.current(), 0.5);
        value.advance(0.0, 2.0);
        assert_eq!(value.current(), 0.25);
    }
}
