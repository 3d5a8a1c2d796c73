//! BSDF Models
//!
//! Enum dispatch over the wrapped scattering functions so heterogeneous
//! closures can be driven through the same `BSDF` interface.

use crate::al_surface_layer::*;
use crate::closure::*;
use crate::lambertian::*;
use bumpalo::Bump;
use layered_core::geometry::*;
use layered_core::interaction::*;
use layered_core::pbrt::*;
use layered_core::reflection::*;
use layered_core::sampling::*;
use layered_core::spectrum::*;

/// A scattering function instance wrapped for the host.
#[derive(Clone, Debug)]
pub enum BSDFModel {
    Lambertian(BSDFWrapper<LambertianBRDF>),
    AlSurfaceLayer(BSDFWrapper<AlSurfaceLayerBRDF>),
}

impl BSDFModel {
    /// Returns the name of the instance.
    pub fn get_name(&self) -> &str {
        match self {
            Self::Lambertian(b) => b.get_name(),
            Self::AlSurfaceLayer(b) => b.get_name(),
        }
    }

    /// Returns the kind of closure the model evaluates.
    pub fn get_closure_id(&self) -> ClosureId {
        match self {
            Self::Lambertian(_) => ClosureId::Lambertian,
            Self::AlSurfaceLayer(_) => ClosureId::AlSurfaceLayer,
        }
    }
}

impl BSDF for BSDFModel {
    type InputValues<'arena> = ClosureInputValues<'arena>;

    fn get_model(&self) -> &'static str {
        match self {
            Self::Lambertian(b) => b.get_model(),
            Self::AlSurfaceLayer(b) => b.get_model(),
        }
    }

    fn get_type(&self) -> BSDFType {
        match self {
            Self::Lambertian(b) => b.get_type(),
            Self::AlSurfaceLayer(b) => b.get_type(),
        }
    }

    fn get_modes(&self) -> ScatteringMode {
        match self {
            Self::Lambertian(b) => b.get_modes(),
            Self::AlSurfaceLayer(b) => b.get_modes(),
        }
    }

    fn compute_input_data_size(&self) -> usize {
        match self {
            Self::Lambertian(b) => b.compute_input_data_size(),
            Self::AlSurfaceLayer(b) => b.compute_input_data_size(),
        }
    }

    fn prepare_inputs<'arena>(
        &self,
        arena: &'arena Bump,
        shading_point: &ShadingPoint,
        values: &mut ClosureInputValues<'arena>,
    ) {
        match (self, values) {
            (Self::Lambertian(b), ClosureInputValues::Lambertian(v)) => {
                b.prepare_inputs(arena, shading_point, v)
            }
            (Self::AlSurfaceLayer(b), ClosureInputValues::AlSurfaceLayer(v)) => {
                b.prepare_inputs(arena, shading_point, v)
            }
            (model, values) => mismatch(model, values),
        }
    }

    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        values: &ClosureInputValues<'_>,
        adjoint: bool,
        cosine_mult: bool,
        sample: &mut BSDFSample,
    ) {
        match (self, values) {
            (Self::Lambertian(b), ClosureInputValues::Lambertian(v)) => {
                b.sample(sampling_context, v, adjoint, cosine_mult, sample)
            }
            (Self::AlSurfaceLayer(b), ClosureInputValues::AlSurfaceLayer(v)) => {
                b.sample(sampling_context, v, adjoint, cosine_mult, sample)
            }
            (model, values) => {
                mismatch(model, values);
                sample.set_to_absorption();
            }
        }
    }

    fn evaluate(
        &self,
        values: &ClosureInputValues<'_>,
        adjoint: bool,
        cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
        value: &mut Spectrum,
    ) -> Float {
        match (self, values) {
            (Self::Lambertian(b), ClosureInputValues::Lambertian(v)) => b.evaluate(
                v,
                adjoint,
                cosine_mult,
                geometric_normal,
                shading_basis,
                outgoing,
                incoming,
                modes,
                value,
            ),
            (Self::AlSurfaceLayer(b), ClosureInputValues::AlSurfaceLayer(v)) => b.evaluate(
                v,
                adjoint,
                cosine_mult,
                geometric_normal,
                shading_basis,
                outgoing,
                incoming,
                modes,
                value,
            ),
            (model, values) => {
                mismatch(model, values);
                *value = Spectrum::ZERO;
                0.0
            }
        }
    }

    fn evaluate_pdf(
        &self,
        values: &ClosureInputValues<'_>,
        geometric_normal: &Vector3f,
        shading_basis: &Basis3f,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringMode,
    ) -> Float {
        match (self, values) {
            (Self::Lambertian(b), ClosureInputValues::Lambertian(v)) => {
                b.evaluate_pdf(v, geometric_normal, shading_basis, outgoing, incoming, modes)
            }
            (Self::AlSurfaceLayer(b), ClosureInputValues::AlSurfaceLayer(v)) => {
                b.evaluate_pdf(v, geometric_normal, shading_basis, outgoing, incoming, modes)
            }
            (model, values) => {
                mismatch(model, values);
                0.0
            }
        }
    }

    fn sample_ior(&self, sampling_context: &mut SamplingContext, values: &ClosureInputValues<'_>) -> Float {
        match (self, values) {
            (Self::Lambertian(b), ClosureInputValues::Lambertian(v)) => b.sample_ior(sampling_context, v),
            (Self::AlSurfaceLayer(b), ClosureInputValues::AlSurfaceLayer(v)) => {
                b.sample_ior(sampling_context, v)
            }
            (model, values) => {
                mismatch(model, values);
                1.0
            }
        }
    }

    fn compute_absorption(&self, values: &ClosureInputValues<'_>, distance: Float, absorption: &mut Spectrum) {
        match (self, values) {
            (Self::Lambertian(b), ClosureInputValues::Lambertian(v)) => {
                b.compute_absorption(v, distance, absorption)
            }
            (Self::AlSurfaceLayer(b), ClosureInputValues::AlSurfaceLayer(v)) => {
                b.compute_absorption(v, distance, absorption)
            }
            (model, values) => {
                mismatch(model, values);
                absorption.set(1.0);
            }
        }
    }
}

/// Reports closure values handed to a model of another kind.
///
/// * `model`  - The model.
/// * `values` - The closure values.
fn mismatch(model: &BSDFModel, values: &ClosureInputValues<'_>) {
    error!(
        "BSDF '{}' ({}) cannot evaluate {:?} closure values.",
        model.get_name(),
        model.get_model(),
        values.get_id()
    );
}
