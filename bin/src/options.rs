//! Furnace options

use clap::Parser;
use layered_bsdfs::*;
use layered_core::microfacet::*;
use layered_core::paramset::*;
use layered_core::pbrt::*;

/// Command line options of the white furnace.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Coating roughness.
    #[clap(long, short = 'r', value_name = "FLOAT", default_value_t = 0.3, help = "Coating roughness in (0, 1].")]
    pub roughness: Float,

    /// Coating anisotropy.
    #[clap(
        long,
        short = 'a',
        value_name = "FLOAT",
        default_value_t = 0.5,
        help = "Coating anisotropy in [0, 1]; 0.5 is isotropic."
    )]
    pub anisotropy: Float,

    /// Microfacet distribution.
    #[clap(
        long,
        short = 'd',
        value_name = "NAME",
        default_value_t = MicrofacetKind::GGX,
        help = "Microfacet distribution (ggx or beckmann)."
    )]
    pub distribution: MicrofacetKind,

    /// Fresnel mode.
    #[clap(
        long = "fresnel",
        short = 'f',
        value_name = "MODE",
        default_value_t = FresnelMode::Dielectric,
        help = "Coating fresnel mode (dielectric or metallic)."
    )]
    pub fresnel_mode: FresnelMode,

    /// Coating index of refraction.
    #[clap(long, value_name = "FLOAT", default_value_t = 1.5, help = "Index of refraction of a dielectric coating.")]
    pub ior: Float,

    /// Coating reflectance tint.
    #[clap(long, value_name = "FLOAT", default_value_t = 1.0, help = "Reflectance tint of the coating.")]
    pub reflectance: Float,

    /// Metallic normal reflectance.
    #[clap(
        long = "normal-reflectance",
        value_name = "FLOAT",
        default_value_t = 0.8,
        help = "Normal incidence reflectance of a metallic coating."
    )]
    pub normal_reflectance: Float,

    /// Metallic edge tint.
    #[clap(
        long = "edge-tint",
        value_name = "FLOAT",
        default_value_t = 1.0,
        help = "Grazing angle tint of a metallic coating."
    )]
    pub edge_tint: Float,

    /// Lambertian substrate albedo.
    #[clap(
        long = "albedo",
        value_name = "FLOAT",
        default_value_t = 1.0,
        help = "Albedo of the Lambertian substrate."
    )]
    pub substrate_albedo: Float,

    /// Number of samples per estimate.
    #[clap(
        long,
        short = 'n',
        value_name = "NUM",
        default_value_t = 65536,
        help = "Number of samples per estimate."
    )]
    pub samples: usize,

    /// Random seed.
    #[clap(long, short = 's', value_name = "NUM", default_value_t = 0, help = "Seed of the random sequence.")]
    pub seed: u64,
}

impl Options {
    /// Returns an error if the options cannot produce an estimate.
    pub fn validate(&self) -> Result<(), String> {
        if self.samples == 0 {
            return Err(String::from("Sample count must be positive."));
        }
        if !(0.0..=1.0).contains(&self.substrate_albedo) {
            warn!("Substrate albedo {} is outside [0, 1].", self.substrate_albedo);
        }
        Ok(())
    }

    /// Returns the coating parameters.
    pub fn layer_params(&self) -> ParamArray {
        ParamArray::new()
            .insert("roughness", self.roughness)
            .insert("anisotropy", self.anisotropy)
            .insert("distribution", self.distribution)
            .insert("fresnel_mode", self.fresnel_mode)
            .insert("ior", self.ior)
            .insert("reflectance", self.reflectance)
            .insert("normal_reflectance", self.normal_reflectance)
            .insert("edge_tint", self.edge_tint)
    }
}
