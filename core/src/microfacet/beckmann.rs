//! Beckmann Distribution

use super::{upper_hemisphere_view, MicrofacetDistribution};
use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

/// Shared instance of the Beckmann distribution.
pub static BECKMANN_DISTRIBUTION: BeckmannDistribution = BeckmannDistribution;

/// Implements the anisotropic Beckmann–Spizzichino distribution.
#[derive(Copy, Clone, Debug, Default)]
pub struct BeckmannDistribution;

impl MicrofacetDistribution for BeckmannDistribution {
    /// Return the differential area of microfacets oriented with the normal
    /// `m`.
    ///
    /// * `m`       - The microfacet normal.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    #[rustfmt::skip]
    fn d(&self, m: &Vector3f, alpha_x: Float, alpha_y: Float) -> Float {
        if m.y <= 0.0 {
            return 0.0;
        }

        let tan2_theta = tan_2_theta(m);
        if tan2_theta.is_infinite() {
            0.0
        } else {
            let cos4_theta = cos_2_theta(m) * cos_2_theta(m);
            (-tan2_theta * (cos_2_phi(m) / (alpha_x * alpha_x) +
                            sin_2_phi(m) / (alpha_y * alpha_y))
            ).exp() /
            (PI * alpha_x * alpha_y * cos4_theta)
        }
    }

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `v`       - The direction from camera/viewer.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    #[rustfmt::skip]
    fn lambda(&self, v: &Vector3f, alpha_x: Float, alpha_y: Float) -> Float {
        let abs_tan_theta = abs(tan_theta(v));
        if abs_tan_theta.is_infinite() {
            0.0
        } else {
            // Compute _alpha_ for direction `v`.
            let alpha = (cos_2_phi(v) * alpha_x * alpha_x +
                         sin_2_phi(v) * alpha_y * alpha_y).sqrt();
            let a = 1.0 / (alpha * abs_tan_theta);
            if a >= 1.6 {
                0.0
            } else {
                (1.0 - 1.259 * a + 0.396 * a * a) / (3.535 * a + 2.181 * a * a)
            }
        }
    }

    /// Samples a microfacet normal from the distribution of normals visible
    /// from `wo`.
    ///
    /// * `wo`      - Outgoing direction.
    /// * `s`       - Uniform random values. Only the first two are used.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    fn sample(&self, wo: &Vector3f, s: &[Float; 3], alpha_x: Float, alpha_y: Float) -> Vector3f {
        let v = upper_hemisphere_view(wo);
        beckmann_sample(&v, alpha_x, alpha_y, s[0], s[1])
    }
}

/// Samples the slopes of the visible normals for unit roughness.
///
/// * `cos_theta_i` - Cosine of the angle θ measured from the incident direction
///                   to the y-axis.
/// * `u1`          - The uniform random value.
/// * `u2`          - The uniform random value.
fn beckmann_sample_11(cos_theta_i: Float, u1: Float, u2: Float) -> (Float, Float) {
    // Special case (normal incidence).
    if cos_theta_i > 0.9999 {
        let r = (-(1.0 - u1).ln()).sqrt();
        let slope_x = r * cos(TWO_PI * u2);
        let slope_y = r * sin(TWO_PI * u2);
        return (slope_x, slope_y);
    }

    // Numerical inversion of the slope CDF. Continuous in the samples, which
    // keeps stratification intact.
    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let tan_theta_i = sin_theta_i / cos_theta_i;
    let cot_theta_i = 1.0 / tan_theta_i;

    // Search interval, parameterized in the erf() domain.
    let mut a = -1.0;
    let mut c = erf(cot_theta_i);
    let sample_x = max(u1, 1e-6);

    // Initial guess from a fitted inverse.
    let theta_i = acos(cos_theta_i);
    let fit = 1.0 + theta_i * (-0.876 + theta_i * (0.4265 - 0.0594 * theta_i));
    let mut b = c - (1.0 + c) * (1.0 - sample_x).powf(fit);

    // Normalization factor for the CDF.
    let inv_sqrt_pi = 1.0 / PI.sqrt();
    let normalization =
        1.0 / (1.0 + c + inv_sqrt_pi * tan_theta_i * (-cot_theta_i * cot_theta_i).exp());

    for _ in 1..10 {
        // Bisection fallback; the negated test also catches NaN.
        if !(b >= a && b <= c) {
            b = 0.5 * (a + c);
        }

        // Evaluate the CDF and its derivative (i.e. the density function).
        let inv_erf = erf_inv(b);
        let value = normalization
            * (1.0 + b + inv_sqrt_pi * tan_theta_i * (-inv_erf * inv_erf).exp())
            - sample_x;
        let derivative = normalization * (1.0 - inv_erf * tan_theta_i);

        if abs(value) < 1e-5 {
            break;
        }

        // Update bisection intervals.
        if value > 0.0 {
            c = b;
        } else {
            a = b;
        }

        b -= value / derivative;
    }

    // Convert back into a slope value.
    let slope_x = erf_inv(b);

    // Simulate Y component.
    let slope_y = erf_inv(2.0 * max(u2, 1e-6) - 1.0);

    debug_assert!(slope_x.is_finite());
    debug_assert!(slope_y.is_finite());

    (slope_x, slope_y)
}

/// Samples a visible normal by stretching the view direction to unit
/// roughness, sampling slopes and unstretching.
///
/// * `wi`      - Direction in the upper hemisphere.
/// * `alpha_x` - Roughness width along the x-axis.
/// * `alpha_y` - Roughness width along the z-axis.
/// * `u1`      - The uniform random value.
/// * `u2`      - The uniform random value.
fn beckmann_sample(wi: &Vector3f, alpha_x: Float, alpha_y: Float, u1: Float, u2: Float) -> Vector3f {
    // 1. Stretch wi.
    let wi_stretched = Vector3f::new(alpha_x * wi.x, wi.y, alpha_y * wi.z).normalize();

    // 2. Simulate P22_{wi}(x_slope, y_slope, 1, 1).
    let (mut slope_x, mut slope_y) = beckmann_sample_11(cos_theta(&wi_stretched), u1, u2);

    // 3. Rotate.
    let tmp = cos_phi(&wi_stretched) * slope_x - sin_phi(&wi_stretched) * slope_y;
    slope_y = sin_phi(&wi_stretched) * slope_x + cos_phi(&wi_stretched) * slope_y;
    slope_x = tmp;

    // 4. Unstretch.
    slope_x *= alpha_x;
    slope_y *= alpha_y;

    // 5. Compute normal.
    Vector3f::new(-slope_x, 1.0, -slope_y).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn d_at_normal_incidence() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let d = BECKMANN_DISTRIBUTION.d(&n, 0.5, 0.25);
        assert!(approx_eq!(Float, d, 1.0 / (PI * 0.125), epsilon = 1e-5));
    }

    #[test]
    fn lambda_vanishes_near_normal() {
        let v = Vector3f::new(0.1, 1.0, 0.0).normalize();
        assert_eq!(BECKMANN_DISTRIBUTION.lambda(&v, 0.2, 0.2), 0.0);
    }

    proptest! {
        #[test]
        fn slopes_are_finite(cos_theta in 0.05..1.0f32, u1 in 0.0..1.0f32, u2 in 0.0..1.0f32) {
            let (x, y) = beckmann_sample_11(cos_theta, u1, u2);
            prop_assert!(x.is_finite() && y.is_finite());
        }
    }
}
