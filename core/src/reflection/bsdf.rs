//! BSDF
//!
//! Protocol every scattering function implements, plus the host wrapper that
//! applies the cosine factor of the rendering equation on behalf of the models.

use super::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;
use bumpalo::Bump;
use std::mem::size_of;

/// Interface for scattering functions.
///
/// Models are immutable and shared across threads. All per shading point
/// state lives in `InputValues`, allocated by the caller (typically from a
/// per-thread arena) and prepared once per shading point by `prepare_inputs`.
/// Directions passed in and out are in world space and point away from the
/// surface.
pub trait BSDF: Send + Sync {
    /// Per shading point parameter block.
    type InputValues<'arena>;

    /// Returns the model identifier.
    fn get_model(&self) -> &'static str;

    /// Returns the hemispheres the model scatters into.
    fn get_type(&self) -> BSDFType {
        BSDFType::REFLECTIVE
    }

    /// Returns the scattering modes the model supports.
    fn get_modes(&self) -> ScatteringMode {
        ScatteringMode::ALL
    }

    /// Returns the size in bytes of the parameter block.
    fn compute_input_data_size(&self) -> usize {
        size_of::<Self::InputValues<'static>>()
    }

    /// Precomputes values that only depend on the shading point.
    ///
    /// * `arena`         - Per-thread arena for allocations that must live as
    ///                     long as the parameter block.
    /// * `shading_point` - The shading point.
    /// * `values`        - The parameter block to update in place.
    fn prepare_inputs<'arena>(
        &self,
        _arena: &'arena Bump,
        _shading_point: &ShadingPoint,
        _values: &mut Self::InputValues<'arena>,
    ) {
    }

    /// Samples an incoming direction for the outgoing direction stored in
    /// `sample` and fills in value, density and event.
    ///
    /// * `sampling_context` - Source of random numbers.
    /// * `values`           - The prepared parameter block.
    /// * `adjoint`          - Whether importance rather than radiance is transported.
    /// * `cosine_mult`      - Whether to include the cosine factor in the value.
    /// * `sample`           - The sample to fill.
    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        values: &Self::InputValues<'_>,
        adjoint: bool,
        cosine_mult: bool,
        sample: &mut BSDFSample,
    );

    /// Evaluates the scattering function for a pair of directions. Writes the
    /// value and returns the density of sampling `incoming`.
    ///
    /// * `values`           - The prepared parameter block.
    /// * `adjoint`          - Whether importance rather than radiance is transported.
    /// * `cosine_mult`      - Whether to include the cosine factor in the value.
    /// * `geometric_normal` - Geometric normal.
    /// * `shading_basis`    - Shading frame.
    /// * `outgoing`         - World space outgoing direction.
    /// * `incoming`         - World space incoming direction.
    /// * `modes`            - The scattering modes to consider.
    /// * `value`            - Receives the value.
    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &self,
        values: &Self::InputValues<'_>,
        adjoint: bool,
        cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
        value: &mut Spectrum,
    ) -> Float;

    /// Returns the density of sampling `incoming` given `outgoing`.
    ///
    /// * `values`           - The prepared parameter block.
    /// * `geometric_normal` - Geometric normal.
    /// * `shading_basis`    - Shading frame.
    /// * `outgoing`         - World space outgoing direction.
    /// * `incoming`         - World space incoming direction.
    /// * `modes`            - The scattering modes to consider.
    fn evaluate_pdf(
        &self,
        values: &Self::InputValues<'_>,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
    ) -> Float;

    /// Returns the index of refraction on the inside of the surface.
    ///
    /// * `sampling_context` - Source of random numbers.
    /// * `values`           - The prepared parameter block.
    fn sample_ior(&self, _sampling_context: &mut SamplingContext, _values: &Self::InputValues<'_>) -> Float {
        1.0
    }

    /// Computes the attenuation of light travelling `distance` inside the
    /// material.
    ///
    /// * `values`     - The prepared parameter block.
    /// * `distance`   - Distance travelled.
    /// * `absorption` - Receives the attenuation.
    fn compute_absorption(&self, _values: &Self::InputValues<'_>, _distance: Float, absorption: &mut Spectrum) {
        absorption.set(1.0);
    }
}

/// Host-side adapter around a scattering function. Applies the cosine factor
/// (with the shading normal correction for adjoint transport) when requested.
/// Densities pass through unchanged.
#[derive(Clone, Debug, Default)]
pub struct BSDFWrapper<B> {
    /// Name of the instance.
    name: String,

    /// The scattering function.
    bsdf: B,
}

impl<B: BSDF> BSDFWrapper<B> {
    /// Wraps a scattering function.
    ///
    /// * `name` - Name of the instance.
    /// * `bsdf` - The scattering function.
    pub fn new(name: &str, bsdf: B) -> Self {
        Self {
            name: name.to_string(),
            bsdf,
        }
    }

    /// Returns the name of the instance.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

/// Returns the cosine factor for a pair of directions.
///
/// * `adjoint`          - Whether importance rather than radiance is transported.
/// * `geometric_normal` - Geometric normal.
/// * `shading_normal`   - Shading normal.
/// * `outgoing`         - World space outgoing direction.
/// * `incoming`         - World space incoming direction.
fn cosine_factor(
    adjoint: bool,
    geometric_normal: &Vector3f,
    shading_normal: &Vector3f,
    outgoing: &Vector3f,
    incoming: &Vector3f,
) -> Float {
    if adjoint {
        let cos_on = outgoing.abs_dot(shading_normal);
        let cos_ig = incoming.abs_dot(geometric_normal);
        let cos_og = outgoing.abs_dot(geometric_normal);
        if cos_og == 0.0 {
            0.0
        } else {
            cos_on * cos_ig / cos_og
        }
    } else {
        incoming.abs_dot(shading_normal)
    }
}

impl<B: BSDF> BSDF for BSDFWrapper<B> {
    type InputValues<'arena> = B::InputValues<'arena>;

    fn get_model(&self) -> &'static str {
        self.bsdf.get_model()
    }

    fn get_type(&self) -> BSDFType {
        self.bsdf.get_type()
    }

    fn get_modes(&self) -> ScatteringMode {
        self.bsdf.get_modes()
    }

    fn compute_input_data_size(&self) -> usize {
        self.bsdf.compute_input_data_size()
    }

    fn prepare_inputs<'arena>(
        &self,
        arena: &'arena Bump,
        shading_point: &ShadingPoint,
        values: &mut Self::InputValues<'arena>,
    ) {
        self.bsdf.prepare_inputs(arena, shading_point, values)
    }

    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        values: &Self::InputValues<'_>,
        adjoint: bool,
        cosine_mult: bool,
        sample: &mut BSDFSample,
    ) {
        debug_assert!(sample.outgoing.get_value().is_normalized(1e-3));
        debug_assert!(sample.get_geometric_normal().is_normalized(1e-3));

        self.bsdf.sample(sampling_context, values, adjoint, false, sample);

        if !sample.is_absorption() && cosine_mult {
            let shading_normal = sample.get_shading_normal();
            let cos = cosine_factor(
                adjoint,
                &sample.get_geometric_normal(),
                &shading_normal,
                &sample.outgoing.get_value(),
                &sample.incoming.get_value(),
            );
            sample.value *= cos;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &self,
        values: &Self::InputValues<'_>,
        adjoint: bool,
        cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
        value: &mut Spectrum,
    ) -> Float {
        debug_assert!(outgoing.is_normalized(1e-3));
        debug_assert!(geometric_normal.is_normalized(1e-3));

        let pdf = self.bsdf.evaluate(
            values,
            adjoint,
            false,
            geometric_normal,
            shading_basis,
            outgoing,
            incoming,
            modes,
            value,
        );

        if pdf > 0.0 && cosine_mult {
            let cos = cosine_factor(
                adjoint,
                geometric_normal,
                &shading_basis.get_normal(),
                outgoing,
                incoming,
            );
            *value *= cos;
        }

        pdf
    }

    fn evaluate_pdf(
        &self,
        values: &Self::InputValues<'_>,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
    ) -> Float {
        debug_assert!(outgoing.is_normalized(1e-3));
        debug_assert!(geometric_normal.is_normalized(1e-3));

        self.bsdf
            .evaluate_pdf(values, geometric_normal, shading_basis, outgoing, incoming, modes)
    }

    fn sample_ior(&self, sampling_context: &mut SamplingContext, values: &Self::InputValues<'_>) -> Float {
        self.bsdf.sample_ior(sampling_context, values)
    }

    fn compute_absorption(&self, values: &Self::InputValues<'_>, distance: Float, absorption: &mut Spectrum) {
        self.bsdf.compute_absorption(values, distance, absorption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    /// Scatters every direction into a fixed direction with unit value.
    struct Fixed {
        incoming: Vector3f,
    }

    impl BSDF for Fixed {
        type InputValues<'arena> = Spectrum;

        fn get_model(&self) -> &'static str {
            "fixed"
        }

        fn sample(
            &self,
            sampling_context: &mut SamplingContext,
            values: &Spectrum,
            _adjoint: bool,
            _cosine_mult: bool,
            sample: &mut BSDFSample,
        ) {
            if sampling_context.next_1d() < 0.5 {
                sample.incoming = Dual3f::new(self.incoming);
                sample.value = *values;
                sample.set_to_scattering(ScatteringEvent::Diffuse, 1.0);
            }
        }

        fn evaluate(
            &self,
            values: &Spectrum,
            _adjoint: bool,
            _cosine_mult: bool,
            _geometric_normal: &Vector3f,
            _shading_basis: &Basis3f,
            _outgoing: &Vector3f,
            incoming: &Vector3f,
            _modes: ScatteringMode,
            value: &mut Spectrum,
        ) -> Float {
            *value = *values;
            if incoming.y > 0.0 {
                1.0
            } else {
                0.0
            }
        }

        fn evaluate_pdf(
            &self,
            _values: &Spectrum,
            _geometric_normal: &Vector3f,
            _shading_basis: &Basis3f,
            _outgoing: &Vector3f,
            _incoming: &Vector3f,
            _modes: ScatteringMode,
        ) -> Float {
            0.25
        }
    }

    fn wrapper() -> BSDFWrapper<Fixed> {
        BSDFWrapper::new(
            "fixed_bsdf",
            Fixed {
                incoming: Vector3f::new(0.6, 0.8, 0.0),
            },
        )
    }

    #[test]
    fn sample_applies_radiance_cosine() {
        let w = wrapper();
        let mut ctx = SamplingContext::from_sequence(&[0.1]);
        let mut s = BSDFSample::new(&ShadingPoint::default(), Dual3f::new(Vector3f::Y_AXIS));
        w.sample(&mut ctx, &Spectrum::ONE, false, true, &mut s);
        assert!(approx_eq!(Float, s.value[0], 0.8, epsilon = 1e-6));
    }

    #[test]
    fn sample_applies_adjoint_correction() {
        let w = wrapper();
        let mut ctx = SamplingContext::from_sequence(&[0.1]);
        let ng = Vector3f::new(0.0, 0.6, 0.8);
        let sp = ShadingPoint::new(Basis3f::default(), ng);
        let wo = Vector3f::new(0.0, 0.8, 0.6);
        let mut s = BSDFSample::new(&sp, Dual3f::new(wo));
        w.sample(&mut ctx, &Spectrum::ONE, true, true, &mut s);

        // |wo.ns| |wi.ng| / |wo.ng| = 0.8 * 0.48 / 0.96
        assert!(approx_eq!(Float, s.value[1], 0.4, epsilon = 1e-5), "{}", s.value);
    }

    #[test]
    fn sample_without_cosine_is_unscaled() {
        let w = wrapper();
        let mut ctx = SamplingContext::from_sequence(&[0.1]);
        let mut s = BSDFSample::new(&ShadingPoint::default(), Dual3f::new(Vector3f::Y_AXIS));
        w.sample(&mut ctx, &Spectrum::ONE, false, false, &mut s);
        assert_eq!(s.value, Spectrum::ONE);
    }

    #[test]
    fn absorption_is_untouched() {
        let w = wrapper();
        let mut ctx = SamplingContext::from_sequence(&[0.9]);
        let mut s = BSDFSample::new(&ShadingPoint::default(), Dual3f::new(Vector3f::Y_AXIS));
        w.sample(&mut ctx, &Spectrum::ONE, false, true, &mut s);
        assert!(s.is_absorption());
        assert!(s.value.is_black());
    }

    #[test]
    fn evaluate_applies_cosine_only_with_density() {
        let w = wrapper();
        let basis = Basis3f::default();
        let ng = Vector3f::Y_AXIS;
        let wo = Vector3f::Y_AXIS;
        let mut value = Spectrum::ZERO;

        let wi = Vector3f::new(0.6, 0.8, 0.0);
        let pdf = w.evaluate(&Spectrum::ONE, false, true, &ng, &basis, &wo, &wi, ScatteringMode::ALL, &mut value);
        assert_eq!(pdf, 1.0);
        assert!(approx_eq!(Float, value[2], 0.8, epsilon = 1e-6));

        let wi = Vector3f::new(0.6, -0.8, 0.0);
        let pdf = w.evaluate(&Spectrum::ONE, false, true, &ng, &basis, &wo, &wi, ScatteringMode::ALL, &mut value);
        assert_eq!(pdf, 0.0);
        assert_eq!(value, Spectrum::ONE);
    }

    #[test]
    fn pass_through_operations() {
        let w = wrapper();
        let basis = Basis3f::default();
        let ng = Vector3f::Y_AXIS;
        let pdf = w.evaluate_pdf(&Spectrum::ONE, &ng, &basis, &ng, &ng, ScatteringMode::ALL);
        assert_eq!(pdf, 0.25);

        let mut ctx = SamplingContext::new(0);
        assert_eq!(w.sample_ior(&mut ctx, &Spectrum::ONE), 1.0);

        let mut absorption = Spectrum::ZERO;
        w.compute_absorption(&Spectrum::ONE, 2.0, &mut absorption);
        assert_eq!(absorption, Spectrum::ONE);

        assert_eq!(w.get_model(), "fixed");
        assert_eq!(w.get_name(), "fixed_bsdf");
        assert_eq!(w.compute_input_data_size(), size_of::<Spectrum>());
    }
}
