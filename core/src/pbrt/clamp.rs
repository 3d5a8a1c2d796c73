//! Clamp

use super::Float;
use num_traits::Num;

/// Clamps a value x to [min, max].
///
/// * `x`   - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
#[inline(always)]
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Clamps a value to [0, 1].
///
/// * `x` - The number to clamp.
#[inline(always)]
pub fn saturate(x: Float) -> Float {
    clamp(x, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_inside_and_outside_range() {
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(-2, 0, 10), 0);
        assert_eq!(clamp(12, 0, 10), 10);
    }

    #[test]
    fn saturate_limits() {
        assert_eq!(saturate(-0.1), 0.0);
        assert_eq!(saturate(1.7), 1.0);
        assert_eq!(saturate(0.25), 0.25);
    }
}
