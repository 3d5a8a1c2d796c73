//! Closure BSDF
//!
//! Process-wide scattering function that drives a `CompositeSurfaceClosure`:
//! one closure is chosen per sampling call while evaluation sums over all of
//! them.

use crate::closure::*;
use crate::factory::*;
use crate::model::*;
use bumpalo::Bump;
use layered_core::geometry::*;
use layered_core::interaction::*;
use layered_core::paramset::*;
use layered_core::pbrt::*;
use layered_core::reflection::*;
use layered_core::sampling::*;
use layered_core::spectrum::*;

/// Model identifier of `ClosureBSDF`.
pub const CLOSURE_BSDF_MODEL: &str = "osl_bsdf";

lazy_static! {
    /// The shared closure dispatcher.
    pub static ref CLOSURE_BSDF: ClosureBSDF = ClosureBSDF::new();
}

/// Scattering function of a flattened closure list.
#[derive(Clone, Debug)]
pub struct ClosureBSDF {
    /// Model for Lambertian closures.
    lambertian: BSDFModel,

    /// Model for layer closures.
    al_surface_layer: BSDFModel,
}

impl Default for ClosureBSDF {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosureBSDF {
    /// Create a new `ClosureBSDF` with one model per closure kind.
    pub fn new() -> Self {
        let params = ParamArray::new();
        Self {
            lambertian: LambertianBRDFFactory::static_create("osl_lambertian_brdf", &params),
            al_surface_layer: AlSurfaceLayerBRDFFactory::static_create("osl_al_surface_layer_brdf", &params),
        }
    }

    /// Returns the model for a closure kind.
    ///
    /// * `id` - The closure kind.
    fn get_closure_model(&self, id: ClosureId) -> &BSDFModel {
        let model = match id {
            ClosureId::Lambertian => &self.lambertian,
            ClosureId::AlSurfaceLayer => &self.al_surface_layer,
        };
        debug_assert_eq!(model.get_closure_id(), id);
        model
    }
}

impl BSDF for ClosureBSDF {
    type InputValues<'arena> = CompositeSurfaceClosure<'arena>;

    fn get_model(&self) -> &'static str {
        CLOSURE_BSDF_MODEL
    }

    fn get_type(&self) -> BSDFType {
        BSDFType::ALL
    }

    fn prepare_inputs<'arena>(
        &self,
        arena: &'arena Bump,
        shading_point: &ShadingPoint,
        values: &mut CompositeSurfaceClosure<'arena>,
    ) {
        for entry in values.iter_mut() {
            self.get_closure_model(entry.values.get_id())
                .prepare_inputs(arena, shading_point, &mut entry.values);
        }
    }

    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        values: &CompositeSurfaceClosure<'_>,
        adjoint: bool,
        cosine_mult: bool,
        sample: &mut BSDFSample,
    ) {
        if values.get_closure_count() == 0 {
            sample.set_to_absorption();
            return;
        }

        let index = values.choose_closure(sampling_context.next_1d());
        let entry = values.get_closure(index);

        self.get_closure_model(entry.values.get_id()).sample(
            sampling_context,
            &entry.values,
            adjoint,
            cosine_mult,
            sample,
        );

        if !sample.is_absorption() {
            sample.value *= entry.weight;
            sample.probability *= entry.pdf_weight;
        }
    }

    fn evaluate(
        &self,
        values: &CompositeSurfaceClosure<'_>,
        adjoint: bool,
        cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
        value: &mut Spectrum,
    ) -> Float {
        *value = Spectrum::ZERO;
        let mut pdf = 0.0;

        for entry in values.iter() {
            let mut closure_value = Spectrum::ZERO;
            let closure_pdf = self.get_closure_model(entry.values.get_id()).evaluate(
                &entry.values,
                adjoint,
                cosine_mult,
                geometric_normal,
                shading_basis,
                outgoing,
                incoming,
                modes,
                &mut closure_value,
            );

            *value += closure_value * entry.weight;
            pdf += closure_pdf * entry.pdf_weight;
        }

        pdf
    }

    fn evaluate_pdf(
        &self,
        values: &CompositeSurfaceClosure<'_>,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
    ) -> Float {
        values
            .iter()
            .map(|entry| {
                let pdf = self.get_closure_model(entry.values.get_id()).evaluate_pdf(
                    &entry.values,
                    geometric_normal,
                    shading_basis,
                    outgoing,
                    incoming,
                    modes,
                );
                pdf * entry.pdf_weight
            })
            .sum()
    }

    fn sample_ior(&self, sampling_context: &mut SamplingContext, values: &CompositeSurfaceClosure<'_>) -> Float {
        if values.get_closure_count() == 0 {
            return 1.0;
        }

        let index = values.choose_closure(sampling_context.next_1d());
        let entry = values.get_closure(index);
        self.get_closure_model(entry.values.get_id())
            .sample_ior(sampling_context, &entry.values)
    }

    fn compute_absorption(
        &self,
        values: &CompositeSurfaceClosure<'_>,
        distance: Float,
        absorption: &mut Spectrum,
    ) {
        if values.get_closure_count() == 0 {
            absorption.set(1.0);
            return;
        }

        *absorption = Spectrum::ZERO;
        for entry in values.iter() {
            let mut a = Spectrum::ONE;
            self.get_closure_model(entry.values.get_id())
                .compute_absorption(&entry.values, distance, &mut a);
            madd(absorption, &a, entry.pdf_weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::al_surface_layer::*;
    use crate::lambertian::*;
    use float_cmp::*;

    fn two_lambertians(arena: &Bump) -> CompositeSurfaceClosure<'_> {
        let a = ClosureColor::alloc_component(
            arena,
            ClosureInputValues::Lambertian(LambertianBRDFInputValues::new(Spectrum::new(1.0))),
            Spectrum::new(0.25),
        );
        let b = ClosureColor::alloc_component(
            arena,
            ClosureInputValues::Lambertian(LambertianBRDFInputValues::new(Spectrum::new(0.5))),
            Spectrum::new(0.75),
        );
        let tree = ClosureColor::alloc_add(arena, a, b);
        CompositeSurfaceClosure::new_in(arena, Basis3f::default(), Some(tree))
    }

    #[test]
    fn evaluate_sums_weighted_closures() {
        let arena = Bump::new();
        let mut c = two_lambertians(&arena);
        let sp = ShadingPoint::default();
        CLOSURE_BSDF.prepare_inputs(&arena, &sp, &mut c);

        let n = Vector3f::Y_AXIS;
        let wi = Vector3f::new(0.6, 0.8, 0.0);
        let mut value = Spectrum::ZERO;
        let pdf = CLOSURE_BSDF.evaluate(&c, false, false, &n, &Basis3f::default(), &n, &wi, ScatteringMode::ALL, &mut value);

        // 0.25 * 1/pi + 0.75 * 0.5/pi
        assert!(approx_eq!(Float, value[0], 0.625 * INV_PI, epsilon = 1e-6));
        assert!(approx_eq!(Float, pdf, 0.8 * INV_PI, epsilon = 1e-6));

        let pdf_only = CLOSURE_BSDF.evaluate_pdf(&c, &n, &Basis3f::default(), &n, &wi, ScatteringMode::ALL);
        assert!(approx_eq!(Float, pdf_only, pdf, epsilon = 1e-6));
    }

    #[test]
    fn sample_scales_by_chosen_closure() {
        let arena = Bump::new();
        let c = two_lambertians(&arena);
        let sp = ShadingPoint::default();

        // First random picks the first closure, two more drive the Lambertian.
        let mut ctx = SamplingContext::from_sequence(&[0.1, 0.3, 0.6]);
        let mut sample = BSDFSample::new(&sp, Dual3f::new(Vector3f::Y_AXIS));
        CLOSURE_BSDF.sample(&mut ctx, &c, false, false, &mut sample);

        assert_eq!(ctx.draw_count(), 3);
        assert_eq!(sample.get_event(), ScatteringEvent::Diffuse);
        assert!(approx_eq!(Float, sample.value[0], 0.25 * INV_PI, epsilon = 1e-6));
        let cos = sample.incoming.get_value().y;
        assert!(approx_eq!(Float, sample.probability, 0.25 * cos * INV_PI, epsilon = 1e-6));
    }

    #[test]
    fn models_match_closure_kinds() {
        for id in [ClosureId::Lambertian, ClosureId::AlSurfaceLayer] {
            assert_eq!(CLOSURE_BSDF.get_closure_model(id).get_closure_id(), id);
        }
        assert_eq!(CLOSURE_BSDF.get_closure_model(ClosureId::Lambertian).get_model(), LAMBERTIAN_BRDF_MODEL);
        assert_eq!(
            CLOSURE_BSDF.get_closure_model(ClosureId::AlSurfaceLayer).get_model(),
            AL_SURFACE_LAYER_BRDF_MODEL
        );
    }

    #[test]
    fn empty_composite_absorbs() {
        let arena = Bump::new();
        let c = CompositeSurfaceClosure::new_in(&arena, Basis3f::default(), None);
        let sp = ShadingPoint::default();
        let mut ctx = SamplingContext::new(0);
        let mut sample = BSDFSample::new(&sp, Dual3f::new(Vector3f::Y_AXIS));
        CLOSURE_BSDF.sample(&mut ctx, &c, false, false, &mut sample);

        assert!(sample.is_absorption());
        assert_eq!(ctx.draw_count(), 0);
        assert_eq!(CLOSURE_BSDF.sample_ior(&mut ctx, &c), 1.0);

        let mut absorption = Spectrum::ZERO;
        CLOSURE_BSDF.compute_absorption(&c, 1.0, &mut absorption);
        assert_eq!(absorption, Spectrum::ONE);
    }

    #[test]
    fn pass_through_operations() {
        let arena = Bump::new();
        let c = two_lambertians(&arena);
        let mut ctx = SamplingContext::new(0);
        assert_eq!(CLOSURE_BSDF.sample_ior(&mut ctx, &c), 1.0);
        assert_eq!(ctx.draw_count(), 1);

        let mut absorption = Spectrum::ZERO;
        CLOSURE_BSDF.compute_absorption(&c, 1.0, &mut absorption);
        assert!(approx_eq!(Float, absorption[1], 1.0, epsilon = 1e-6));
        assert_eq!(CLOSURE_BSDF.get_model(), CLOSURE_BSDF_MODEL);
    }
}
