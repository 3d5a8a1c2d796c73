//! Sampling

mod common;
mod context;

// Re-export
pub use common::*;
pub use context::*;
