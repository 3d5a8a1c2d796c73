//! AlSurface Layer BRDF
//!
//! A rough specular coating over an arbitrary substrate closure tree. Each
//! sampling call picks the coating with a probability equal to the largest
//! channel of the coating's Fresnel reflectance, and defers to the substrate
//! otherwise. Evaluation blends both, weighting the substrate by the energy
//! the coating does not reflect.

use crate::closure::*;
use crate::closure_bsdf::*;
use bumpalo::Bump;
use layered_core::geometry::*;
use layered_core::interaction::*;
use layered_core::microfacet::*;
use layered_core::paramset::*;
use layered_core::pbrt::*;
use layered_core::reflection::*;
use layered_core::sampling::*;
use layered_core::spectrum::*;
use std::fmt;
use std::str::FromStr;

/// Model identifier of `AlSurfaceLayerBRDF`.
pub const AL_SURFACE_LAYER_BRDF_MODEL: &str = "al_surface_layer_brdf";

/// How the coating reflectance is parameterized.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FresnelMode {
    /// Dielectric coating described by its index of refraction.
    Dielectric,

    /// Conductive coating described by normal reflectance and edge tint.
    Metallic,
}

impl Default for FresnelMode {
    fn default() -> Self {
        Self::Dielectric
    }
}

impl FromStr for FresnelMode {
    type Err = String;

    /// Parses "dielectric" or "metallic" (case insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dielectric" => Ok(Self::Dielectric),
            "metallic" | "conductor" => Ok(Self::Metallic),
            _ => Err(format!("unknown fresnel mode '{}'", s)),
        }
    }
}

impl fmt::Display for FresnelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dielectric => write!(f, "dielectric"),
            Self::Metallic => write!(f, "metallic"),
        }
    }
}

/// Values derived from the parameters once per shading point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AlSurfaceLayerBRDFPrecomputedValues {
    /// Roughness width along the first tangent.
    pub alpha_x: Float,

    /// Roughness width along the second tangent.
    pub alpha_y: Float,
}

/// Per shading point parameters of `AlSurfaceLayerBRDF`.
#[derive(Copy, Clone, Debug)]
pub struct AlSurfaceLayerBRDFInputValues<'arena> {
    /// Coating roughness in (0, 1].
    pub roughness: Float,

    /// Coating anisotropy in [0, 1]; 0.5 is isotropic.
    pub anisotropy: Float,

    /// Microfacet distribution of the coating.
    pub distribution: MicrofacetKind,

    /// How the coating reflectance is parameterized.
    pub fresnel_mode: FresnelMode,

    /// Spectral tint of the coating reflection.
    pub reflectance: Spectrum,

    /// Index of refraction of a dielectric coating.
    pub ior: Float,

    /// Reflectance at normal incidence of a metallic coating.
    pub normal_reflectance: Spectrum,

    /// Reflectance tint near grazing angles of a metallic coating.
    pub edge_tint: Spectrum,

    /// Raw closure tree of the substrate.
    pub substrate: Option<&'arena ClosureColor<'arena>>,

    /// Dispatcher that evaluates the prepared substrate.
    pub osl_bsdf: Option<&'arena ClosureBSDF>,

    /// The prepared substrate.
    pub substrate_closure_data: Option<&'arena CompositeSurfaceClosure<'arena>>,

    /// Values derived by `prepare_inputs`.
    pub precomputed: AlSurfaceLayerBRDFPrecomputedValues,
}

impl<'arena> Default for AlSurfaceLayerBRDFInputValues<'arena> {
    fn default() -> Self {
        Self {
            roughness: 0.1,
            anisotropy: 0.5,
            distribution: MicrofacetKind::GGX,
            fresnel_mode: FresnelMode::Dielectric,
            reflectance: Spectrum::ONE,
            ior: 1.5,
            normal_reflectance: Spectrum::new(0.8),
            edge_tint: Spectrum::ONE,
            substrate: None,
            osl_bsdf: None,
            substrate_closure_data: None,
            precomputed: AlSurfaceLayerBRDFPrecomputedValues::default(),
        }
    }
}

impl<'arena> AlSurfaceLayerBRDFInputValues<'arena> {
    /// Reads the parameters from a parameter array and clamps them to their
    /// valid ranges.
    ///
    /// * `params`    - The parameter array.
    /// * `substrate` - Raw closure tree of the substrate.
    pub fn from_params(params: &ParamArray, substrate: Option<&'arena ClosureColor<'arena>>) -> Self {
        let defaults = Self::default();
        Self {
            roughness: params.get_optional("roughness", defaults.roughness),
            anisotropy: params.get_optional("anisotropy", defaults.anisotropy),
            distribution: params.get_optional("distribution", defaults.distribution),
            fresnel_mode: params.get_optional("fresnel_mode", defaults.fresnel_mode),
            reflectance: params.get_spectrum("reflectance", defaults.reflectance),
            ior: params.get_optional("ior", defaults.ior),
            normal_reflectance: params.get_spectrum("normal_reflectance", defaults.normal_reflectance),
            edge_tint: params.get_spectrum("edge_tint", defaults.edge_tint),
            substrate,
            ..defaults
        }
        .sanitized()
    }

    /// Returns the parameters clamped to their valid ranges. Every adjusted
    /// value is reported.
    pub fn sanitized(self) -> Self {
        let roughness = clamp(self.roughness, 0.0001, 1.0);
        if roughness != self.roughness {
            warn!("Layer roughness {} clamped to {}.", self.roughness, roughness);
        }

        let anisotropy = clamp(self.anisotropy, 0.0, 1.0);
        if anisotropy != self.anisotropy {
            warn!("Layer anisotropy {} clamped to {}.", self.anisotropy, anisotropy);
        }

        let ior = max(self.ior, 0.001);
        if ior != self.ior {
            warn!("Layer ior {} clamped to {}.", self.ior, ior);
        }

        Self {
            roughness,
            anisotropy,
            ior,
            reflectance: saturate_spectrum("reflectance", &self.reflectance),
            normal_reflectance: saturate_spectrum("normal_reflectance", &self.normal_reflectance),
            edge_tint: saturate_spectrum("edge_tint", &self.edge_tint),
            ..self
        }
    }
}

/// Clamps a spectral parameter to [0, 1] and reports the adjustment.
///
/// * `name`  - Parameter name.
/// * `value` - The value.
fn saturate_spectrum(name: &str, value: &Spectrum) -> Spectrum {
    let saturated = value.saturate();
    if saturated != *value {
        warn!("Layer {} {} clamped to {}.", name, value, saturated);
    }
    saturated
}

/// Maps roughness and anisotropy to the roughness widths along both tangents.
/// Anisotropy below 0.5 stretches the first tangent and above 0.5 the second.
///
/// * `roughness`  - Roughness in (0, 1].
/// * `anisotropy` - Anisotropy in [0, 1].
pub fn compute_alphas(roughness: Float, anisotropy: Float) -> (Float, Float) {
    let alpha = roughness * roughness;
    if anisotropy == 0.5 {
        return (alpha, alpha);
    }

    let t = square(2.0 * anisotropy - 1.0);
    if anisotropy < 0.5 {
        (lerp(t, alpha, 1.0), alpha)
    } else {
        (alpha, lerp(t, alpha, 1.0))
    }
}

/// Returns the normalized half vector of a reflection, in the upper hemisphere.
///
/// * `wo` - Outgoing direction (local).
/// * `wi` - Incoming direction (local).
fn half_reflection_vector(wo: &Vector3f, wi: &Vector3f) -> Vector3f {
    let h = *wi + *wo;
    if h.length_squared() == 0.0 {
        return Vector3f::Y_AXIS;
    }

    let m = h.normalize();
    if m.y < 0.0 {
        -m
    } else {
        m
    }
}

/// Returns the microfacet reflection term D G / |4 cos(wo) cos(wi)|.
///
/// * `mdf`     - Microfacet distribution.
/// * `wo`      - Outgoing direction (local).
/// * `wi`      - Incoming direction (local).
/// * `m`       - Microfacet normal.
/// * `alpha_x` - Roughness width along the first tangent.
/// * `alpha_y` - Roughness width along the second tangent.
fn reflection_value(
    mdf: &dyn MicrofacetDistribution,
    wo: &Vector3f,
    wi: &Vector3f,
    m: &Vector3f,
    alpha_x: Float,
    alpha_y: Float,
) -> Float {
    let denom = abs(4.0 * wo.y * wi.y);
    if denom == 0.0 {
        return 0.0;
    }

    let d = mdf.d(m, alpha_x, alpha_y);
    let g = mdf.g(wi, wo, m, alpha_x, alpha_y);
    d * g / denom
}

/// Returns the density of sampling a reflection off microfacet `m`.
///
/// * `mdf`     - Microfacet distribution.
/// * `wo`      - Outgoing direction (local).
/// * `m`       - Microfacet normal.
/// * `alpha_x` - Roughness width along the first tangent.
/// * `alpha_y` - Roughness width along the second tangent.
fn reflection_pdf(
    mdf: &dyn MicrofacetDistribution,
    wo: &Vector3f,
    m: &Vector3f,
    alpha_x: Float,
    alpha_y: Float,
) -> Float {
    let cos_om = wo.dot(m);
    if cos_om == 0.0 {
        return 0.0;
    }

    mdf.pdf(wo, m, alpha_x, alpha_y) / abs(4.0 * cos_om)
}

/// Implements a rough specular coating layered over a substrate closure tree.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlSurfaceLayerBRDF;

impl AlSurfaceLayerBRDF {
    /// Computes the coating reflectance for `wo` and microfacet `m`. Writes the
    /// spectral reflectance to `value` and returns the probability of choosing
    /// the coating.
    ///
    /// * `values` - The prepared parameters.
    /// * `wo`     - Outgoing direction (local).
    /// * `m`      - Microfacet normal.
    /// * `value`  - Receives the spectral reflectance.
    fn fresnel_term(
        &self,
        values: &AlSurfaceLayerBRDFInputValues<'_>,
        wo: &Vector3f,
        m: &Vector3f,
        value: &mut Spectrum,
    ) -> Float {
        let wo = if wo.y < 0.0 { -*wo } else { *wo };
        let n = Vector3f::Y_AXIS;

        let fresnel: Fresnel = match values.fresnel_mode {
            FresnelMode::Dielectric => FresnelDielectric::new(values.reflectance, 1.0, 1.0 / values.ior).into(),
            FresnelMode::Metallic => {
                FresnelFriendlyConductor::new(values.normal_reflectance, values.edge_tint, 1.0).into()
            }
        };

        *value = fresnel.evaluate(&wo, m, &n);
        if values.fresnel_mode == FresnelMode::Metallic {
            *value *= values.reflectance;
        }

        saturate(value.max_component_value())
    }

    /// Returns the prepared substrate.
    ///
    /// * `values` - The prepared parameters.
    fn substrate<'a>(
        &self,
        values: &AlSurfaceLayerBRDFInputValues<'a>,
    ) -> Option<(&'a ClosureBSDF, &'a CompositeSurfaceClosure<'a>)> {
        debug_assert!(values.substrate_closure_data.is_some(), "layer used before preparation");
        values.osl_bsdf.zip(values.substrate_closure_data)
    }
}

impl BSDF for AlSurfaceLayerBRDF {
    type InputValues<'arena> = AlSurfaceLayerBRDFInputValues<'arena>;

    fn get_model(&self) -> &'static str {
        AL_SURFACE_LAYER_BRDF_MODEL
    }

    fn get_type(&self) -> BSDFType {
        BSDFType::ALL
    }

    fn get_modes(&self) -> ScatteringMode {
        ScatteringMode::ALL
    }

    fn prepare_inputs<'arena>(
        &self,
        arena: &'arena Bump,
        shading_point: &ShadingPoint,
        values: &mut AlSurfaceLayerBRDFInputValues<'arena>,
    ) {
        let (alpha_x, alpha_y) = compute_alphas(values.roughness, values.anisotropy);
        values.precomputed = AlSurfaceLayerBRDFPrecomputedValues { alpha_x, alpha_y };

        // Build the substrate. Nested layers share the dispatcher but keep their
        // own parameters.
        let osl_bsdf: &'static ClosureBSDF = &CLOSURE_BSDF;
        let mut composite =
            CompositeSurfaceClosure::new_in(arena, *shading_point.get_shading_basis(), values.substrate);
        composite.inject_layer_values(osl_bsdf);

        osl_bsdf.prepare_inputs(arena, shading_point, &mut composite);

        let composite: &'arena CompositeSurfaceClosure<'arena> = arena.alloc(composite);
        values.osl_bsdf = Some(osl_bsdf);
        values.substrate_closure_data = Some(composite);
    }

    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        values: &AlSurfaceLayerBRDFInputValues<'_>,
        adjoint: bool,
        _cosine_mult: bool,
        sample: &mut BSDFSample,
    ) {
        let basis = *sample.get_shading_basis();
        let wo = basis.transform_to_local(&sample.outgoing.get_value());
        let AlSurfaceLayerBRDFPrecomputedValues { alpha_x, alpha_y } = values.precomputed;

        // Draw the microfacet normal and the branch in one block.
        let s = sampling_context.next_4d();
        let mdf = values.distribution.distribution();
        let m = mdf.sample(&wo, &[s[0], s[1], s[2]], alpha_x, alpha_y);
        debug_assert!(m.y > 0.0);

        let layer_probability = self.fresnel_term(values, &wo, &m, &mut sample.value);

        if s[3] < layer_probability {
            let wi = reflect(&wo, &m);
            if wi.y * wo.y <= 0.0 {
                sample.set_to_absorption();
                return;
            }

            sample.value *= reflection_value(mdf, &wo, &wi, &m, alpha_x, alpha_y);

            let probability = reflection_pdf(mdf, &wo, &m, alpha_x, alpha_y);
            if probability <= 0.0 {
                sample.set_to_absorption();
                return;
            }

            sample.set_to_scattering(ScatteringEvent::Glossy, probability);
            sample.incoming = Dual3f::new(basis.transform_to_parent(&wi));
            sample.compute_reflected_differentials();
        } else {
            sample.value = Spectrum::ZERO;
            match self.substrate(values) {
                Some((osl_bsdf, substrate)) => {
                    osl_bsdf.sample(sampling_context, substrate, adjoint, false, sample)
                }
                None => sample.set_to_absorption(),
            }
        }
    }

    fn evaluate(
        &self,
        values: &AlSurfaceLayerBRDFInputValues<'_>,
        adjoint: bool,
        _cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
        value: &mut Spectrum,
    ) -> Float {
        let (osl_bsdf, substrate) = match self.substrate(values) {
            Some(s) => s,
            None => {
                *value = Spectrum::ZERO;
                return 0.0;
            }
        };

        let wo = shading_basis.transform_to_local(outgoing);
        let wi = shading_basis.transform_to_local(incoming);

        if !modes.has_glossy() || wi.y * wo.y < 0.0 {
            return osl_bsdf.evaluate(
                substrate,
                adjoint,
                false,
                geometric_normal,
                shading_basis,
                outgoing,
                incoming,
                modes,
                value,
            );
        }

        let AlSurfaceLayerBRDFPrecomputedValues { alpha_x, alpha_y } = values.precomputed;
        let mdf = values.distribution.distribution();

        let m = half_reflection_vector(&wo, &wi);
        let layer_weight = self.fresnel_term(values, &wo, &m, value);
        *value *= reflection_value(mdf, &wo, &wi, &m, alpha_x, alpha_y);
        let coating_pdf = layer_weight * reflection_pdf(mdf, &wo, &m, alpha_x, alpha_y);

        let mut substrate_value = Spectrum::ZERO;
        let substrate_pdf = osl_bsdf.evaluate(
            substrate,
            adjoint,
            false,
            geometric_normal,
            shading_basis,
            outgoing,
            incoming,
            modes,
            &mut substrate_value,
        );
        madd(value, &substrate_value, 1.0 - layer_weight);

        coating_pdf + substrate_pdf * (1.0 - layer_weight)
    }

    fn evaluate_pdf(
        &self,
        values: &AlSurfaceLayerBRDFInputValues<'_>,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
    ) -> Float {
        let (osl_bsdf, substrate) = match self.substrate(values) {
            Some(s) => s,
            None => return 0.0,
        };

        let wo = shading_basis.transform_to_local(outgoing);
        let wi = shading_basis.transform_to_local(incoming);

        if !modes.has_glossy() || wi.y * wo.y < 0.0 {
            return osl_bsdf.evaluate_pdf(substrate, geometric_normal, shading_basis, outgoing, incoming, modes);
        }

        let AlSurfaceLayerBRDFPrecomputedValues { alpha_x, alpha_y } = values.precomputed;
        let mdf = values.distribution.distribution();

        let m = half_reflection_vector(&wo, &wi);
        let mut fresnel = Spectrum::ZERO;
        let layer_weight = self.fresnel_term(values, &wo, &m, &mut fresnel);
        let coating_pdf = layer_weight * reflection_pdf(mdf, &wo, &m, alpha_x, alpha_y);

        let substrate_pdf =
            osl_bsdf.evaluate_pdf(substrate, geometric_normal, shading_basis, outgoing, incoming, modes);

        coating_pdf + substrate_pdf * (1.0 - layer_weight)
    }

    fn sample_ior(
        &self,
        sampling_context: &mut SamplingContext,
        values: &AlSurfaceLayerBRDFInputValues<'_>,
    ) -> Float {
        match self.substrate(values) {
            Some((osl_bsdf, substrate)) => osl_bsdf.sample_ior(sampling_context, substrate),
            None => 1.0,
        }
    }

    fn compute_absorption(
        &self,
        values: &AlSurfaceLayerBRDFInputValues<'_>,
        distance: Float,
        absorption: &mut Spectrum,
    ) {
        match self.substrate(values) {
            Some((osl_bsdf, substrate)) => osl_bsdf.compute_absorption(substrate, distance, absorption),
            None => absorption.set(1.0),
        }
    }
}
