//! Trowbridge-Reitz Distribution

use super::{upper_hemisphere_view, MicrofacetDistribution};
use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

/// Shared instance of the GGX distribution.
pub static TROWBRIDGE_REITZ_DISTRIBUTION: TrowbridgeReitzDistribution = TrowbridgeReitzDistribution;

/// Implements the anisotropic variant of the Trowbridge-Reitz (GGX)
/// distribution.
#[derive(Copy, Clone, Debug, Default)]
pub struct TrowbridgeReitzDistribution;

impl MicrofacetDistribution for TrowbridgeReitzDistribution {
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
            let e =
                (cos_2_phi(m) / (alpha_x * alpha_x) +
                 sin_2_phi(m) / (alpha_y * alpha_y)) *
                tan2_theta;
            1.0 / (PI * alpha_x * alpha_y * cos4_theta * (1.0 + e) * (1.0 + e))
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
            // Compute _alpha_ for direction _v_
            let alpha = (cos_2_phi(v) * alpha_x * alpha_x +
                         sin_2_phi(v) * alpha_y * alpha_y).sqrt();
            let alpha2_tan2_theta = (alpha * abs_tan_theta) * (alpha * abs_tan_theta);
            (-1.0 + (1.0 + alpha2_tan2_theta).sqrt()) / 2.0
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
        trowbridge_reitz_sample(&v, alpha_x, alpha_y, s[0], s[1])
    }
}

/// Samples the slopes of the visible normals for unit roughness.
///
/// * `cos_theta` - Cosine of the angle θ measured from the incident direction
///                 to the y-axis.
/// * `u1`        - The uniform random value.
/// * `u2`        - The uniform random value.
#[rustfmt::skip]
fn trowbridge_reitz_sample_11(cos_theta: Float, u1: Float, u2: Float) -> (Float, Float) {
    // special case (normal incidence)
    if cos_theta > 0.9999 {
        let r = (u1 / (1.0 - u1)).sqrt();
        let phi = TWO_PI * u2;
        let slope_x = r * cos(phi);
        let slope_y = r * sin(phi);
        return (slope_x, slope_y);
    }

    let sin_theta = (max(0.0, 1.0 - cos_theta * cos_theta)).sqrt();
    let tan_theta = sin_theta / cos_theta;
    let a = 1.0 / tan_theta;
    let g1 = 2.0 / (1.0 + (1.0 + 1.0 / (a * a)).sqrt());

    // Sample slope_x.
    let a = 2.0 * u1 / g1 - 1.0;
    let tmp = min(1.0 / (a * a - 1.0), 1e10);

    let b = tan_theta;
    let d = max(b * b * tmp * tmp - (a * a - b * b) * tmp, 0.0).sqrt();
    let slope_x_1 = b * tmp - d;
    let slope_x_2 = b * tmp + d;
    let slope_x = if a < 0.0 || slope_x_2 > 1.0 / tan_theta {
        slope_x_1
    } else {
        slope_x_2
    };

    // Sample slope_y.
    let (s, u2) = if u2 > 0.5 {
        (1.0, 2.0 * (u2 - 0.5))
    } else {
        (-1.0, 2.0 * (0.5 - u2))
    };
    let z =
        (u2 * (u2 * (u2 * 0.27385 - 0.73369) + 0.46341)) /
        (u2 * (u2 * (u2 * 0.093073 + 0.309420) - 1.000000) + 0.597999);
    let slope_y = s * z * (1.0 + slope_x * slope_x).sqrt();

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
fn trowbridge_reitz_sample(wi: &Vector3f, alpha_x: Float, alpha_y: Float, u1: Float, u2: Float) -> Vector3f {
    // 1. Stretch wi.
    let wi_stretched = Vector3f::new(alpha_x * wi.x, wi.y, alpha_y * wi.z).normalize();

    // 2. Simulate P22_{wi}(x_slope, y_slope, 1, 1)
    let (mut slope_x, mut slope_y) = trowbridge_reitz_sample_11(cos_theta(&wi_stretched), u1, u2);

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
