//! Microfacet Distribution Models
//!
//! Distributions are stateless. The anisotropic roughness widths are passed
//! with every call so a single shared instance of each model serves all
//! shading points. Directions are expressed in the y-up local shading frame;
//! `alpha_x` stretches the x-axis and `alpha_y` the z-axis.

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::str::FromStr;

mod beckmann;
mod trowbridge_reitz;

// Re-exports
pub use beckmann::*;
pub use trowbridge_reitz::*;

/// Interface for microfacet distribution models.
pub trait MicrofacetDistribution: Send + Sync {
    /// Return the differential area of microfacets oriented with the normal
    /// `m`.
    ///
    /// * `m`       - The microfacet normal.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    fn d(&self, m: &Vector3f, alpha_x: Float, alpha_y: Float) -> Float;

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `v`       - The direction from camera/viewer.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    fn lambda(&self, v: &Vector3f, alpha_x: Float, alpha_y: Float) -> Float;

    /// Evaluates Smith's masking function which gives the fraction of
    /// microfacets with normal `m` that are visible from direction `v`.
    ///
    /// * `v`       - The direction from camera/viewer.
    /// * `m`       - The microfacet normal.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    fn g1(&self, v: &Vector3f, m: &Vector3f, alpha_x: Float, alpha_y: Float) -> Float {
        // Back-facing microfacets are never visible.
        if v.dot(m) * v.y <= 0.0 {
            return 0.0;
        }
        1.0 / (1.0 + self.lambda(v, alpha_x, alpha_y))
    }

    /// Returns the fraction of microfacets with normal `m` visible from both
    /// directions `wi` and `wo` (height-correlated form).
    ///
    /// * `wi`      - Incident direction.
    /// * `wo`      - Outgoing direction.
    /// * `m`       - The microfacet normal.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    fn g(&self, wi: &Vector3f, wo: &Vector3f, _m: &Vector3f, alpha_x: Float, alpha_y: Float) -> Float {
        1.0 / (1.0 + self.lambda(wo, alpha_x, alpha_y) + self.lambda(wi, alpha_x, alpha_y))
    }

    /// Samples a microfacet normal from the distribution of normals visible
    /// from `wo`. The result always lies in the upper hemisphere.
    ///
    /// * `wo`      - Outgoing direction.
    /// * `s`       - Uniform random values. Only the first two are used.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    fn sample(&self, wo: &Vector3f, s: &[Float; 3], alpha_x: Float, alpha_y: Float) -> Vector3f;

    /// Evaluates the PDF of sampling normal `m` given outgoing direction `wo`.
    ///
    /// * `wo`      - Outgoing direction.
    /// * `m`       - The microfacet normal.
    /// * `alpha_x` - Roughness width along the x-axis.
    /// * `alpha_y` - Roughness width along the z-axis.
    fn pdf(&self, wo: &Vector3f, m: &Vector3f, alpha_x: Float, alpha_y: Float) -> Float {
        let cos_theta_o = wo.y;
        if cos_theta_o == 0.0 {
            return 0.0;
        }
        self.g1(wo, m, alpha_x, alpha_y) * wo.abs_dot(m) * self.d(m, alpha_x, alpha_y) / abs(cos_theta_o)
    }
}

/// Returns the direction used for visible normal sampling. Flipped into the
/// upper hemisphere and kept away from the horizon.
///
/// * `wo` - Outgoing direction.
fn upper_hemisphere_view(wo: &Vector3f) -> Vector3f {
    let y = max(abs(wo.y), 1e-5);
    Vector3f::new(wo.x, y, wo.z).normalize()
}

/// Selects one of the shared microfacet distributions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MicrofacetKind {
    /// Beckmann distribution.
    Beckmann,

    /// Trowbridge-Reitz (GGX) distribution.
    GGX,
}

impl Default for MicrofacetKind {
    fn default() -> Self {
        Self::GGX
    }
}

impl MicrofacetKind {
    /// Returns the shared distribution instance.
    pub fn distribution(&self) -> &'static dyn MicrofacetDistribution {
        match self {
            Self::Beckmann => &BECKMANN_DISTRIBUTION,
            Self::GGX => &TROWBRIDGE_REITZ_DISTRIBUTION,
        }
    }
}

impl FromStr for MicrofacetKind {
    type Err = String;

    /// Parses "beckmann" or "ggx" (case insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beckmann" => Ok(Self::Beckmann),
            "ggx" | "trowbridgereitz" => Ok(Self::GGX),
            _ => Err(format!("unknown microfacet distribution '{}'", s)),
        }
    }
}

impl fmt::Display for MicrofacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beckmann => write!(f, "beckmann"),
            Self::GGX => write!(f, "ggx"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::*;
    use float_cmp::*;

    const N: usize = 512;

    /// Integrates `f` over the upper hemisphere with a stratified midpoint grid.
    fn integrate_hemisphere<F: Fn(&Vector3f) -> Float>(f: F) -> Float {
        let mut sum = 0.0_f64;
        for i in 0..N {
            for j in 0..N {
                let u = [
                    (i as Float + 0.5) / N as Float,
                    (j as Float + 0.5) / N as Float,
                ];
                let w = uniform_sample_hemisphere(&u);
                sum += f(&w) as f64;
            }
        }
        (sum / (N * N) as f64) as Float / uniform_hemisphere_pdf()
    }

    fn kinds() -> [MicrofacetKind; 2] {
        [MicrofacetKind::Beckmann, MicrofacetKind::GGX]
    }

    #[test]
    fn projected_area_is_one() {
        for kind in kinds() {
            let mdf = kind.distribution();
            for (ax, ay) in [(0.5, 0.5), (0.4, 0.7), (0.8, 0.3)] {
                let area = integrate_hemisphere(|m| mdf.d(m, ax, ay) * m.y);
                assert!(
                    approx_eq!(Float, area, 1.0, epsilon = 0.02),
                    "{} ({}, {}) area = {}",
                    kind,
                    ax,
                    ay,
                    area
                );
            }
        }
    }

    #[test]
    fn visible_normal_pdf_integrates_to_one() {
        let wo = Vector3f::new(0.5, 0.8, -0.3).normalize();
        for kind in kinds() {
            let mdf = kind.distribution();
            let total = integrate_hemisphere(|m| mdf.pdf(&wo, m, 0.5, 0.6));
            assert!(
                approx_eq!(Float, total, 1.0, epsilon = 0.03),
                "{} total = {}",
                kind,
                total
            );
        }
    }

    #[test]
    fn samples_are_unit_and_upper() {
        let mut ctx = SamplingContext::new(11);
        for kind in kinds() {
            let mdf = kind.distribution();
            for _ in 0..1000 {
                let u = ctx.next_2d();
                let wo = cosine_sample_hemisphere(&u);
                let s = ctx.next_4d();
                let m = mdf.sample(&wo, &[s[0], s[1], s[2]], 0.3, 0.6);
                assert!(m.y > 0.0, "{} m = {}", kind, m);
                assert!(m.is_normalized(1e-3), "{} m = {}", kind, m);
                assert!(!m.has_nans());
            }
        }
    }

    #[test]
    fn sampling_ignores_third_random() {
        let wo = Vector3f::new(0.0, 1.0, 0.0);
        for kind in kinds() {
            let mdf = kind.distribution();
            let a = mdf.sample(&wo, &[0.3, 0.7, 0.1], 0.4, 0.4);
            let b = mdf.sample(&wo, &[0.3, 0.7, 0.9], 0.4, 0.4);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn d_vanishes_below_horizon() {
        let m = Vector3f::new(0.0, -1.0, 0.0);
        for kind in kinds() {
            assert_eq!(kind.distribution().d(&m, 0.5, 0.5), 0.0);
        }
    }

    #[test]
    fn g_is_symmetric() {
        let wi = Vector3f::new(0.3, 0.9, 0.1).normalize();
        let wo = Vector3f::new(-0.6, 0.5, 0.2).normalize();
        let m = (wi + wo).normalize();
        for kind in kinds() {
            let mdf = kind.distribution();
            let a = mdf.g(&wi, &wo, &m, 0.3, 0.5);
            let b = mdf.g(&wo, &wi, &m, 0.3, 0.5);
            assert!(approx_eq!(Float, a, b, epsilon = 1e-6));
        }
    }

    #[test]
    fn kind_parses_and_displays() {
        assert_eq!("GGX".parse::<MicrofacetKind>(), Ok(MicrofacetKind::GGX));
        assert_eq!("beckmann".parse::<MicrofacetKind>(), Ok(MicrofacetKind::Beckmann));
        assert!("blinn".parse::<MicrofacetKind>().is_err());
        assert_eq!(MicrofacetKind::default().to_string(), "ggx");
    }
}
