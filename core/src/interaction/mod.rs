//! Interactions

mod shading_point;

pub use shading_point::*;
