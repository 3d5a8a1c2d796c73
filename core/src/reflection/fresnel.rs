//! Fresnel Dielectrics and Conductors

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::mem::swap;

/// Computes spectral Fresnel reflectance for a direction and microfacet normal.
#[derive(Copy, Clone, Debug)]
pub enum Fresnel {
    Dielectric(FresnelDielectric),
    FriendlyConductor(FresnelFriendlyConductor),
}

impl Fresnel {
    /// Returns the amount of light reflected by the surface.
    ///
    /// * `o` - Outgoing direction.
    /// * `h` - Microfacet (half-vector) normal.
    /// * `n` - Shading normal.
    pub fn evaluate(&self, o: &Vector3f, h: &Vector3f, n: &Vector3f) -> Spectrum {
        match self {
            Self::Dielectric(f) => f.evaluate(o, h, n),
            Self::FriendlyConductor(f) => f.evaluate(o, h, n),
        }
    }
}

/// Implements `Fresnel` for dielectric coatings.
#[derive(Copy, Clone, Debug)]
pub struct FresnelDielectric {
    /// Spectral tint applied to the reflectance.
    reflectance: Spectrum,

    /// Scalar multiplier applied to the reflectance.
    multiplier: Float,

    /// Ratio of outside to inside index of refraction.
    eta: Float,
}

impl FresnelDielectric {
    /// Create a new `FresnelDielectric`.
    ///
    /// * `reflectance` - Spectral tint applied to the reflectance.
    /// * `multiplier`  - Scalar multiplier applied to the reflectance.
    /// * `eta`         - Ratio of outside to inside index of refraction.
    pub fn new(reflectance: Spectrum, multiplier: Float, eta: Float) -> Self {
        Self {
            reflectance,
            multiplier,
            eta,
        }
    }

    /// Returns the amount of light reflected by the surface.
    ///
    /// * `o` - Outgoing direction.
    /// * `h` - Microfacet (half-vector) normal.
    /// * `_n` - Shading normal.
    pub fn evaluate(&self, o: &Vector3f, h: &Vector3f, _n: &Vector3f) -> Spectrum {
        let cos_theta_i = min(o.abs_dot(h), 1.0);
        let f = fr_dielectric(cos_theta_i, 1.0, 1.0 / self.eta);
        self.reflectance * (self.multiplier * f)
    }
}

impl From<FresnelDielectric> for Fresnel {
    fn from(f: FresnelDielectric) -> Self {
        Self::Dielectric(f)
    }
}

/// Implements `Fresnel` for conductors described by their reflectance at
/// normal incidence and their tint at grazing angles.
#[derive(Copy, Clone, Debug)]
pub struct FresnelFriendlyConductor {
    /// Index of refraction of the conductor.
    eta: Spectrum,

    /// Absorption coefficient of the conductor.
    k: Spectrum,

    /// Index of refraction of the outside medium.
    outside_ior: Float,
}

impl FresnelFriendlyConductor {
    /// Create a new `FresnelFriendlyConductor`.
    ///
    /// * `normal_reflectance` - Reflectance at normal incidence.
    /// * `edge_tint`          - Reflectance tint near grazing angles.
    /// * `outside_ior`        - Index of refraction of the outside medium.
    pub fn new(normal_reflectance: Spectrum, edge_tint: Spectrum, outside_ior: Float) -> Self {
        let (eta, k) = artist_friendly_to_conductor(&normal_reflectance, &edge_tint);
        Self { eta, k, outside_ior }
    }

    /// Returns the amount of light reflected by the surface.
    ///
    /// * `o` - Outgoing direction.
    /// * `h` - Microfacet (half-vector) normal.
    /// * `_n` - Shading normal.
    pub fn evaluate(&self, o: &Vector3f, h: &Vector3f, _n: &Vector3f) -> Spectrum {
        let cos_theta_i = min(o.abs_dot(h), 1.0);
        fr_conductor(cos_theta_i, Spectrum::new(self.outside_ior), self.eta, self.k)
    }
}

impl From<FresnelFriendlyConductor> for Fresnel {
    fn from(f: FresnelFriendlyConductor) -> Self {
        Self::FriendlyConductor(f)
    }
}

/// Maps normal reflectance `r` and edge tint `g` to the complex index of
/// refraction (η, k) of a conductor (Gulbrandsen 2014).
///
/// * `r` - Reflectance at normal incidence.
/// * `g` - Edge tint.
pub fn artist_friendly_to_conductor(r: &Spectrum, g: &Spectrum) -> (Spectrum, Spectrum) {
    let r = r.clamp(0.0, 0.99);

    let eta = r.zip_map(g, |r, g| {
        let sqrt_r = r.sqrt();
        let n_min = (1.0 - r) / (1.0 + r);
        let n_max = (1.0 + sqrt_r) / (1.0 - sqrt_r);
        lerp(g, n_max, n_min)
    });

    let k = r.zip_map(&eta, |r, n| {
        let k2 = ((n + 1.0) * (n + 1.0) * r - (n - 1.0) * (n - 1.0)) / (1.0 - r);
        max(k2, 0.0).sqrt()
    });

    (eta, k)
}

/// Returns the fresnel reflection for dielectric materials and unpolarized light.
///
/// * `cos_theta_i` - cos(θi) for angle between incident direction and geometric
///                   surface normal.
/// * `eta_i`       - index of refraction for medium that incident ray is in.
/// * `eta_t`       - index of refraction for medium that incident ray is entering.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let mut eta_i = eta_i;
    let mut eta_t = eta_t;

    // Potentially swap indices of refraction.
    let entering = cos_theta_i > 0.0;
    if !entering {
        swap(&mut eta_i, &mut eta_t);
        cos_theta_i = abs(cos_theta_i);
    }

    // Compute _cosThetaT_ using Snell's law.
    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= 1.0 {
        1.0
    } else {
        let cos_theta_t = max(0.0, 1.0 - sin_theta_t * sin_theta_t).sqrt();
        let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
            / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
        let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
            / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
        (r_parl * r_parl + r_perp * r_perp) / 2.0
    }
}

/// Returns the Fresnel reflection at the boundary between a conductor and
/// dielectric medium for unpolarized light.
///
/// * `cos_theta_i` - cos(θi) for angle between incident direction and geometric
///                   surface normal on the same side as incident direction `wi`.
/// * `eta_i`       - Index of refraction for medium that incident ray is in.
/// * `eta_t`       - Index of refraction for medium that incident ray is entering.
/// * `k`           - The absorption coefficient.
pub fn fr_conductor(cos_theta_i: Float, eta_i: Spectrum, eta_t: Spectrum, k: Spectrum) -> Spectrum {
    let cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let eta = eta_t / eta_i;
    let eta_k = k / eta_i;

    let cos_theta_i_2 = cos_theta_i * cos_theta_i;
    let sin_theta_i_2 = 1.0 - cos_theta_i_2;
    let eta_2 = eta * eta;
    let eta_k_2 = eta_k * eta_k;

    let t0 = eta_2 - eta_k_2 - Spectrum::new(sin_theta_i_2);
    let a2_plus_b2 = (t0 * t0 + 4.0 * eta_2 * eta_k_2).sqrt();
    let t1 = a2_plus_b2 + Spectrum::new(cos_theta_i_2);
    let a = (0.5 * (a2_plus_b2 + t0)).sqrt();
    let t2 = 2.0 * cos_theta_i * a;
    let rs = (t1 - t2) / (t1 + t2);

    let t3 = cos_theta_i_2 * a2_plus_b2 + Spectrum::new(sin_theta_i_2 * sin_theta_i_2);
    let t4 = t2 * sin_theta_i_2;
    let rp = rs * (t3 - t4) / (t3 + t4);

    0.5 * (rp + rs)
}
