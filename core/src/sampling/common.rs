//! Common sampling functions.
//!
//! Hemisphere directions are expressed in the y-up local shading frame.

use crate::geometry::*;
use crate::pbrt::*;

/// Uniformly sample a point on the unit disk using the concentric mapping.
/// Returns the (x, y) coordinates of the point.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &[Float; 2]) -> (Float, Float) {
    // Map uniform random numbers to [-1,1]^2.
    let ox = 2.0 * u[0] - 1.0;
    let oy = 2.0 * u[1] - 1.0;

    // Handle degeneracy at the origin.
    if ox == 0.0 && oy == 0.0 {
        return (0.0, 0.0);
    }

    // Apply concentric mapping to point.
    let (r, theta) = if abs(ox) > abs(oy) {
        (ox, PI_OVER_FOUR * (oy / ox))
    } else {
        (oy, PI_OVER_TWO - PI_OVER_FOUR * (ox / oy))
    };
    (r * cos(theta), r * sin(theta))
}

/// Returns a cosine-weighted direction in the upper (y > 0) hemisphere.
///
/// * `u` - The random sample point.
pub fn cosine_sample_hemisphere(u: &[Float; 2]) -> Vector3f {
    let (x, z) = concentric_sample_disk(u);
    let y = max(0.0, 1.0 - x * x - z * z).sqrt();
    Vector3f::new(x, y, z)
}

/// Returns the PDF for cosine-weighted hemisphere sampling.
///
/// * `cos_theta` - Cosine of the angle to the normal.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Uniformly sample a direction in the upper (y > 0) hemisphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_hemisphere(u: &[Float; 2]) -> Vector3f {
    let y = u[0];
    let r = max(0.0, 1.0 - y * y).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * cos(phi), y, r * sin(phi))
}

/// Returns the PDF for uniform hemisphere sampling.
#[inline]
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn disk_samples_inside_unit_disk(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let (x, y) = concentric_sample_disk(&[u0, u1]);
            prop_assert!(x * x + y * y <= 1.0 + 1e-5);
        }

        #[test]
        fn cosine_samples_are_unit_and_upper(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let w = cosine_sample_hemisphere(&[u0, u1]);
            prop_assert!(w.y >= 0.0);
            prop_assert!((w.length() - 1.0).abs() < 1e-4);
        }

        #[test]
        fn uniform_samples_are_unit_and_upper(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let w = uniform_sample_hemisphere(&[u0, u1]);
            prop_assert!(w.y >= 0.0);
            prop_assert!((w.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn disk_center_maps_to_origin() {
        assert_eq!(concentric_sample_disk(&[0.5, 0.5]), (0.0, 0.0));
    }

    #[test]
    fn hemisphere_pdfs() {
        assert_eq!(cosine_hemisphere_pdf(1.0), INV_PI);
        assert_eq!(uniform_hemisphere_pdf(), INV_TWO_PI);
    }
}
