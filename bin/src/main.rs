//! White furnace for the layered coating BRDF.
//!
//! Estimates the directional albedo and the integral of the sampling density
//! of a coating over a Lambertian substrate for a few outgoing angles.

#[macro_use]
extern crate log;

mod options;

use bumpalo::Bump;
use clap::Parser;
use layered_bsdfs::*;
use layered_core::geometry::*;
use layered_core::interaction::*;
use layered_core::pbrt::*;
use layered_core::reflection::*;
use layered_core::sampling::*;
use layered_core::spectrum::*;
use options::Options;

/// Outgoing polar angles in degrees.
const ANGLES: [Float; 6] = [0.0, 30.0, 45.0, 60.0, 75.0, 85.0];

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = run(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    options.validate()?;

    let factory = lookup(AL_SURFACE_LAYER_BRDF_MODEL)
        .ok_or(format!("BSDF model '{AL_SURFACE_LAYER_BRDF_MODEL}' is not registered."))?;
    let model = factory.create("furnace_layer", &options.layer_params());

    // Coating over a white Lambertian substrate.
    let arena = Bump::new();
    let substrate = ClosureColor::alloc_component(
        &arena,
        ClosureInputValues::Lambertian(LambertianBRDFInputValues::new(Spectrum::new(options.substrate_albedo))),
        Spectrum::ONE,
    );
    let layer = AlSurfaceLayerBRDFInputValues::from_params(&options.layer_params(), Some(substrate));
    info!(
        "Layer: roughness {}, anisotropy {}, {} distribution, {} fresnel.",
        layer.roughness, layer.anisotropy, layer.distribution, layer.fresnel_mode
    );

    let shading_point = ShadingPoint::default();
    let mut values = ClosureInputValues::AlSurfaceLayer(layer);
    model.prepare_inputs(&arena, &shading_point, &mut values);
    debug!("Prepared input data of {} bytes.", model.compute_input_data_size());

    println!("{:>8} {:>12} {:>12}   {}", "theta", "pdf", "albedo", "sampled albedo");
    for (i, theta) in ANGLES.iter().enumerate() {
        let radians = theta.to_radians();
        let outgoing = spherical_direction(sin(radians), cos(radians), 0.0);
        let mut sampling_context = SamplingContext::new(options.seed + i as u64);

        let (pdf, albedo) = integrate(&model, &values, &outgoing, options.samples, &mut sampling_context);
        let sampled = sampled_albedo(
            &model,
            &values,
            &shading_point,
            &outgoing,
            options.samples,
            &mut sampling_context,
        );

        println!("{:>8.1} {:>12.4} {:>12.4}   {}", theta, pdf, albedo.y(), sampled);
        if pdf > 1.05 || albedo.max_component_value() > 1.05 {
            warn!("Energy gain at {} degrees: pdf {}, albedo {}.", theta, pdf, albedo);
        }
    }

    Ok(())
}

/// Estimates the integrals of the density and the cosine weighted value over
/// the upper hemisphere by uniform sampling.
///
/// * `model`            - The scattering function.
/// * `values`           - Its prepared inputs.
/// * `outgoing`         - Outgoing direction.
/// * `samples`          - Number of samples.
/// * `sampling_context` - Source of random numbers.
fn integrate(
    model: &BSDFModel,
    values: &ClosureInputValues<'_>,
    outgoing: &Vector3f,
    samples: usize,
    sampling_context: &mut SamplingContext,
) -> (Float, Spectrum) {
    let basis = Basis3f::default();
    let mut pdf = 0.0;
    let mut albedo = Spectrum::ZERO;

    for _ in 0..samples {
        let incoming = uniform_sample_hemisphere(&sampling_context.next_2d());
        let mut value = Spectrum::ZERO;
        model.evaluate(
            values,
            false,
            true,
            &Vector3f::Y_AXIS,
            &basis,
            outgoing,
            &incoming,
            ScatteringMode::ALL,
            &mut value,
        );
        madd(&mut albedo, &value, 1.0 / uniform_hemisphere_pdf());
        pdf += model.evaluate_pdf(values, &Vector3f::Y_AXIS, &basis, outgoing, &incoming, ScatteringMode::ALL)
            / uniform_hemisphere_pdf();
    }

    let n = samples as Float;
    (pdf / n, albedo / n)
}

/// Estimates the directional albedo by sampling the scattering function.
///
/// * `model`            - The scattering function.
/// * `values`           - Its prepared inputs.
/// * `shading_point`    - The shading point.
/// * `outgoing`         - Outgoing direction.
/// * `samples`          - Number of samples.
/// * `sampling_context` - Source of random numbers.
fn sampled_albedo(
    model: &BSDFModel,
    values: &ClosureInputValues<'_>,
    shading_point: &ShadingPoint,
    outgoing: &Vector3f,
    samples: usize,
    sampling_context: &mut SamplingContext,
) -> Spectrum {
    let mut albedo = Spectrum::ZERO;
    let mut absorbed = 0_usize;

    for _ in 0..samples {
        let mut sample = BSDFSample::new(shading_point, Dual3f::new(*outgoing));
        model.sample(sampling_context, values, false, true, &mut sample);
        if sample.is_absorption() || sample.probability <= 0.0 {
            absorbed += 1;
            continue;
        }
        madd(&mut albedo, &sample.value, 1.0 / sample.probability);
    }

    debug!("{} of {} samples absorbed.", absorbed, samples);
    albedo / samples as Float
}
