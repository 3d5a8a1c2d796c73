//! BSDFs

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod al_surface_layer;
mod closure;
mod closure_bsdf;
mod factory;
mod lambertian;
mod model;

// Re-export.
pub use al_surface_layer::*;
pub use closure::*;
pub use closure_bsdf::*;
pub use factory::*;
pub use lambertian::*;
pub use model::*;
