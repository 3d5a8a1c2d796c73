//! Lambertian BRDF

use layered_core::geometry::*;
use layered_core::paramset::*;
use layered_core::pbrt::*;
use layered_core::reflection::*;
use layered_core::sampling::*;
use layered_core::spectrum::*;

/// Model identifier of `LambertianBRDF`.
pub const LAMBERTIAN_BRDF_MODEL: &str = "lambertian_brdf";

/// Per shading point parameters of `LambertianBRDF`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LambertianBRDFInputValues {
    /// Diffuse reflectance.
    pub reflectance: Spectrum,

    /// Scalar multiplier applied to the reflectance.
    pub reflectance_multiplier: Float,
}

impl Default for LambertianBRDFInputValues {
    fn default() -> Self {
        Self {
            reflectance: Spectrum::new(0.5),
            reflectance_multiplier: 1.0,
        }
    }
}

impl LambertianBRDFInputValues {
    /// Create a new `LambertianBRDFInputValues`.
    ///
    /// * `reflectance` - Diffuse reflectance.
    pub fn new(reflectance: Spectrum) -> Self {
        Self {
            reflectance,
            reflectance_multiplier: 1.0,
        }
    }

    /// Reads the parameters from a parameter array.
    ///
    /// * `params` - The parameter array.
    pub fn from_params(params: &ParamArray) -> Self {
        let defaults = Self::default();
        Self {
            reflectance: params.get_spectrum("reflectance", defaults.reflectance),
            reflectance_multiplier: params
                .get_optional("reflectance_multiplier", defaults.reflectance_multiplier),
        }
    }
}

/// Implements perfectly diffuse reflection.
#[derive(Copy, Clone, Debug, Default)]
pub struct LambertianBRDF;

impl BSDF for LambertianBRDF {
    type InputValues<'arena> = LambertianBRDFInputValues;

    fn get_model(&self) -> &'static str {
        LAMBERTIAN_BRDF_MODEL
    }

    fn get_modes(&self) -> ScatteringMode {
        ScatteringMode::DIFFUSE
    }

    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        values: &LambertianBRDFInputValues,
        _adjoint: bool,
        _cosine_mult: bool,
        sample: &mut BSDFSample,
    ) {
        let basis = *sample.get_shading_basis();
        let wo = basis.transform_to_local(&sample.outgoing.get_value());

        // Cosine-weighted direction on the side of the outgoing direction.
        let s = sampling_context.next_2d();
        let mut wi = cosine_sample_hemisphere(&s);
        if wo.y < 0.0 {
            wi.y = -wi.y;
        }

        let probability = abs_cos_theta(&wi) * INV_PI;
        if probability <= 0.0 {
            sample.set_to_absorption();
            return;
        }

        sample.value = values.reflectance * (values.reflectance_multiplier * INV_PI);
        sample.incoming = Dual3f::new(basis.transform_to_parent(&wi));
        sample.set_to_scattering(ScatteringEvent::Diffuse, probability);
    }

    fn evaluate(
        &self,
        values: &LambertianBRDFInputValues,
        _adjoint: bool,
        _cosine_mult: bool,
        _geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
        value: &mut Spectrum,
    ) -> Float {
        let wo = shading_basis.transform_to_local(outgoing);
        let wi = shading_basis.transform_to_local(incoming);
        if !modes.has_diffuse() || !same_hemisphere(&wo, &wi) {
            *value = Spectrum::ZERO;
            return 0.0;
        }

        *value = values.reflectance * (values.reflectance_multiplier * INV_PI);
        abs_cos_theta(&wi) * INV_PI
    }

    fn evaluate_pdf(
        &self,
        _values: &LambertianBRDFInputValues,
        _geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
    ) -> Float {
        let wo = shading_basis.transform_to_local(outgoing);
        let wi = shading_basis.transform_to_local(incoming);
        if !modes.has_diffuse() || !same_hemisphere(&wo, &wi) {
            return 0.0;
        }

        abs_cos_theta(&wi) * INV_PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use layered_core::interaction::*;

    #[test]
    fn evaluate_same_hemisphere() {
        let values = LambertianBRDFInputValues::new(Spectrum::new(0.5));
        let basis = Basis3f::default();
        let n = Vector3f::Y_AXIS;
        let wi = Vector3f::new(0.6, 0.8, 0.0);
        let mut value = Spectrum::ZERO;
        let pdf = LambertianBRDF.evaluate(&values, false, false, &n, &basis, &n, &wi, ScatteringMode::ALL, &mut value);
        assert!(approx_eq!(Float, pdf, 0.8 * INV_PI, epsilon = 1e-6));
        assert!(approx_eq!(Float, value[0], 0.5 * INV_PI, epsilon = 1e-6));
    }

    #[test]
    fn evaluate_opposite_hemisphere_is_zero() {
        let values = LambertianBRDFInputValues::default();
        let basis = Basis3f::default();
        let n = Vector3f::Y_AXIS;
        let wi = Vector3f::new(0.6, -0.8, 0.0);
        let mut value = Spectrum::ONE;
        let pdf = LambertianBRDF.evaluate(&values, false, false, &n, &basis, &n, &wi, ScatteringMode::ALL, &mut value);
        assert_eq!(pdf, 0.0);
        assert!(value.is_black());
        assert_eq!(LambertianBRDF.evaluate_pdf(&values, &n, &basis, &n, &wi, ScatteringMode::ALL), 0.0);
    }

    #[test]
    fn evaluate_requires_diffuse_mode() {
        let values = LambertianBRDFInputValues::default();
        let basis = Basis3f::default();
        let n = Vector3f::Y_AXIS;
        let mut value = Spectrum::ONE;
        let pdf = LambertianBRDF.evaluate(&values, false, false, &n, &basis, &n, &n, ScatteringMode::GLOSSY, &mut value);
        assert_eq!(pdf, 0.0);
        assert!(value.is_black());
    }

    #[test]
    fn sample_matches_evaluate() {
        let values = LambertianBRDFInputValues::new(Spectrum::from_rgb(0.2, 0.4, 0.6));
        let sp = ShadingPoint::default();
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let mut ctx = SamplingContext::new(5);
        for _ in 0..100 {
            let mut sample = BSDFSample::new(&sp, Dual3f::new(wo));
            LambertianBRDF.sample(&mut ctx, &values, false, false, &mut sample);
            assert_eq!(sample.get_event(), ScatteringEvent::Diffuse);

            let wi = sample.incoming.get_value();
            let mut value = Spectrum::ZERO;
            let pdf = LambertianBRDF.evaluate(
                &values,
                false,
                false,
                &sp.get_geometric_normal(),
                sp.get_shading_basis(),
                &wo,
                &wi,
                ScatteringMode::ALL,
                &mut value,
            );
            assert!(approx_eq!(Float, pdf, sample.probability, epsilon = 1e-5));
            assert_eq!(value, sample.value);
        }
        assert_eq!(ctx.draw_count(), 200);
    }

    #[test]
    fn from_params_reads_values() {
        let params = ParamArray::new()
            .insert("reflectance", "0.1 0.2 0.3")
            .insert("reflectance_multiplier", 0.5);
        let values = LambertianBRDFInputValues::from_params(&params);
        assert_eq!(values.reflectance, Spectrum::from_rgb(0.1, 0.2, 0.3));
        assert_eq!(values.reflectance_multiplier, 0.5);
    }
}
