//! Common
//!
//! Trigonometric helpers for directions expressed in the local shading frame
//! where the normal is the y-axis, the first tangent is the x-axis and the
//! second tangent is the z-axis.

use crate::geometry::*;
use crate::pbrt::*;

/// Returns the cosine of the angle θ measured from the given direction to the
/// y-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.y
}

/// Returns the square of the cosine of the angle θ measured from the given
/// direction to the y-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.y * w.y
}

/// Returns the absolute value of the cosine of the angle θ measured from the
/// given direction to the y-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.y)
}

/// Returns the square of the sine of the angle θ measured from the given
/// direction to the y-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_2_theta(w: &Vector3f) -> Float {
    max(0.0, 1.0 - cos_2_theta(w))
}

/// Returns the sine of the angle θ measured from the given direction to the
/// y-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

/// Returns the tangent of the angle θ measured from the given direction to the
/// y-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn tan_theta(w: &Vector3f) -> Float {
    sin_theta(w) / cos_theta(w)
}

/// Returns the square of the tangent of the angle θ measured from the given
/// direction to the y-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn tan_2_theta(w: &Vector3f) -> Float {
    sin_2_theta(w) / cos_2_theta(w)
}

/// Returns the cosine of the angle Φ measured from the x-axis after projecting
/// the given direction onto the xz plane.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        1.0
    } else {
        clamp(w.x / s, -1.0, 1.0)
    }
}

/// Returns the sine of the angle Φ measured from the x-axis after projecting
/// the given direction onto the xz plane.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        0.0
    } else {
        clamp(w.z / s, -1.0, 1.0)
    }
}

/// Returns the square of the cosine of the angle Φ.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_2_phi(w: &Vector3f) -> Float {
    cos_phi(w) * cos_phi(w)
}

/// Returns the square of the sine of the angle Φ.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_2_phi(w: &Vector3f) -> Float {
    sin_phi(w) * sin_phi(w)
}

/// Returns a direction from spherical coordinates with θ measured from the
/// y-axis and Φ from the x-axis.
///
/// * `sin_theta` - sin(θ).
/// * `cos_theta` - cos(θ).
/// * `phi`       - Φ.
#[inline]
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(sin_theta * cos(phi), cos_theta, sin_theta * sin(phi))
}

/// Reflect a direction about a normal. Both point away from the surface.
///
/// * `wo` - The direction to reflect.
/// * `n`  - The normal.
#[inline]
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    2.0 * wo.dot(n) * *n - *wo
}

/// Returns true if two directions lie strictly in the same local hemisphere.
///
/// * `w`  - The first direction.
/// * `wp` - The second direction.
#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.y * wp.y > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn normal_direction() {
        let w = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(cos_theta(&w), 1.0);
        assert_eq!(sin_theta(&w), 0.0);
        assert_eq!(cos_phi(&w), 1.0);
        assert_eq!(sin_phi(&w), 0.0);
    }

    #[test]
    fn reflect_about_normal() {
        let wo = Vector3f::new(0.6, 0.8, 0.0);
        let wi = reflect(&wo, &Vector3f::new(0.0, 1.0, 0.0));
        assert!(approx_eq!(Float, wi.x, -0.6, epsilon = 1e-6));
        assert!(approx_eq!(Float, wi.y, 0.8, epsilon = 1e-6));
        assert!(approx_eq!(Float, wi.z, 0.0, epsilon = 1e-6));
    }

    #[test]
    fn hemispheres() {
        let up = Vector3f::new(0.0, 1.0, 0.0);
        let down = Vector3f::new(0.0, -1.0, 0.0);
        let flat = Vector3f::new(1.0, 0.0, 0.0);
        assert!(same_hemisphere(&up, &up));
        assert!(!same_hemisphere(&up, &down));
        assert!(!same_hemisphere(&up, &flat));
    }

    proptest! {
        #[test]
        fn spherical_direction_roundtrip(theta in 0.01..1.5f32, phi in -3.0..3.0f32) {
            let w = spherical_direction(sin(theta), cos(theta), phi);
            prop_assert!(approx_eq!(Float, cos_theta(&w), cos(theta), epsilon = 1e-5));
            prop_assert!(approx_eq!(Float, cos_phi(&w), cos(phi), epsilon = 1e-4));
            prop_assert!(approx_eq!(Float, sin_phi(&w), sin(phi), epsilon = 1e-4));
        }

        #[test]
        fn reflect_preserves_length_and_angle(
            x in -1.0..1.0f32, y in 0.05..1.0f32, z in -1.0..1.0f32,
        ) {
            let wo = Vector3f::new(x, y, z).normalize();
            let n = Vector3f::new(0.0, 1.0, 0.0);
            let wi = reflect(&wo, &n);
            prop_assert!(approx_eq!(Float, wi.length(), 1.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(Float, wi.dot(&n), wo.dot(&n), epsilon = 1e-5));
        }
    }
}
