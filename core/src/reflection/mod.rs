//! Reflection and surface scattering models

mod bsdf;
mod bsdf_sample;
mod common;
mod fresnel;
mod scattering_mode;

// Re-export
pub use bsdf::*;
pub use bsdf_sample::*;
pub use common::*;
pub use fresnel::*;
pub use scattering_mode::*;
