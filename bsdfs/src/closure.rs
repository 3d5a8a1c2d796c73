//! Closures
//!
//! A shader describes the scattering at a point as a tree of weighted
//! closures. `CompositeSurfaceClosure` flattens such a tree into a short list
//! of weighted entries the closure dispatcher can sample and evaluate.

use crate::al_surface_layer::*;
use crate::closure_bsdf::*;
use crate::lambertian::*;
use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use layered_core::geometry::*;
use layered_core::pbrt::*;
use layered_core::spectrum::*;

/// Maximum number of closures in a `CompositeSurfaceClosure`.
pub const MAX_CLOSURE_ENTRIES: usize = 8;

/// Identifies the kind of a closure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClosureId {
    Lambertian,
    AlSurfaceLayer,
}

/// Parameters of a closure.
#[derive(Copy, Clone, Debug)]
pub enum ClosureInputValues<'arena> {
    Lambertian(LambertianBRDFInputValues),
    AlSurfaceLayer(AlSurfaceLayerBRDFInputValues<'arena>),
}

impl<'arena> ClosureInputValues<'arena> {
    /// Returns the kind of closure.
    pub fn get_id(&self) -> ClosureId {
        match self {
            Self::Lambertian(_) => ClosureId::Lambertian,
            Self::AlSurfaceLayer(_) => ClosureId::AlSurfaceLayer,
        }
    }
}

/// Raw closure tree as produced by a shader.
#[derive(Copy, Clone, Debug)]
pub enum ClosureColor<'arena> {
    /// A single closure.
    Component {
        params: ClosureInputValues<'arena>,
        weight: Spectrum,
    },

    /// A closure tree scaled by a weight.
    Mul {
        weight: Spectrum,
        closure: &'arena ClosureColor<'arena>,
    },

    /// Sum of two closure trees.
    Add {
        a: &'arena ClosureColor<'arena>,
        b: &'arena ClosureColor<'arena>,
    },
}

impl<'arena> ClosureColor<'arena> {
    /// Allocate a single closure.
    ///
    /// * `arena`  - The arena for memory allocations.
    /// * `params` - Parameters of the closure.
    /// * `weight` - Weight of the closure.
    pub fn alloc_component(
        arena: &'arena Bump,
        params: ClosureInputValues<'arena>,
        weight: Spectrum,
    ) -> &'arena ClosureColor<'arena> {
        arena.alloc(Self::Component { params, weight })
    }

    /// Allocate a scaled closure tree.
    ///
    /// * `arena`   - The arena for memory allocations.
    /// * `weight`  - The scale.
    /// * `closure` - The closure tree.
    pub fn alloc_mul(
        arena: &'arena Bump,
        weight: Spectrum,
        closure: &'arena ClosureColor<'arena>,
    ) -> &'arena ClosureColor<'arena> {
        arena.alloc(Self::Mul { weight, closure })
    }

    /// Allocate the sum of two closure trees.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `a`     - First closure tree.
    /// * `b`     - Second closure tree.
    pub fn alloc_add(
        arena: &'arena Bump,
        a: &'arena ClosureColor<'arena>,
        b: &'arena ClosureColor<'arena>,
    ) -> &'arena ClosureColor<'arena> {
        arena.alloc(Self::Add { a, b })
    }
}

/// A flattened closure with its weights.
#[derive(Copy, Clone, Debug)]
pub struct ClosureEntry<'arena> {
    /// Parameters of the closure.
    pub values: ClosureInputValues<'arena>,

    /// Spectral weight of the closure.
    pub weight: Spectrum,

    /// Probability of choosing the closure when sampling.
    pub pdf_weight: Float,
}

/// Flattened list of weighted surface closures.
#[derive(Debug)]
pub struct CompositeSurfaceClosure<'arena> {
    /// Shading frame shared by all closures.
    shading_basis: Basis3f,

    /// The closures.
    entries: BumpVec<'arena, ClosureEntry<'arena>>,
}

impl<'arena> CompositeSurfaceClosure<'arena> {
    /// Flattens a closure tree. Closures with black weights are dropped and so
    /// are closures beyond `MAX_CLOSURE_ENTRIES`.
    ///
    /// * `arena`         - The arena for memory allocations.
    /// * `shading_basis` - Shading frame.
    /// * `closure`       - The closure tree, if any.
    pub fn new_in(
        arena: &'arena Bump,
        shading_basis: Basis3f,
        closure: Option<&'arena ClosureColor<'arena>>,
    ) -> Self {
        let mut composite = Self {
            shading_basis,
            entries: BumpVec::with_capacity_in(MAX_CLOSURE_ENTRIES, arena),
        };

        if let Some(closure) = closure {
            composite.process_closure_tree(closure, Spectrum::ONE);
        }

        // Normalize the sampling probabilities.
        let total: Float = composite.entries.iter().map(|e| e.pdf_weight).sum();
        if total > 0.0 {
            for entry in composite.entries.iter_mut() {
                entry.pdf_weight /= total;
            }
        }

        composite
    }

    /// Adds the closures of a tree to the list.
    ///
    /// * `closure` - The closure tree.
    /// * `weight`  - Accumulated weight of the enclosing tree.
    fn process_closure_tree(&mut self, closure: &ClosureColor<'arena>, weight: Spectrum) {
        match closure {
            ClosureColor::Component { params, weight: w } => {
                self.add_closure(*params, weight * *w);
            }
            ClosureColor::Mul { weight: w, closure } => {
                self.process_closure_tree(closure, weight * *w);
            }
            ClosureColor::Add { a, b } => {
                self.process_closure_tree(a, weight);
                self.process_closure_tree(b, weight);
            }
        }
    }

    /// Appends a single closure.
    ///
    /// * `values` - Parameters of the closure.
    /// * `weight` - Spectral weight of the closure.
    fn add_closure(&mut self, values: ClosureInputValues<'arena>, weight: Spectrum) {
        let pdf_weight = weight.max_component_value();
        if pdf_weight <= 0.0 {
            return;
        }

        if self.entries.len() >= MAX_CLOSURE_ENTRIES {
            warn!(
                "Maximum number of closures ({}) reached; dropping {:?} closure.",
                MAX_CLOSURE_ENTRIES,
                values.get_id()
            );
            return;
        }

        self.entries.push(ClosureEntry {
            values,
            weight,
            pdf_weight,
        });
    }

    /// Returns the shading frame.
    pub fn get_shading_basis(&self) -> &Basis3f {
        &self.shading_basis
    }

    /// Returns the number of closures.
    pub fn get_closure_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the kind of a closure.
    ///
    /// * `index` - Index of the closure.
    pub fn get_closure_type(&self, index: usize) -> ClosureId {
        self.entries[index].values.get_id()
    }

    /// Returns a closure.
    ///
    /// * `index` - Index of the closure.
    pub fn get_closure(&self, index: usize) -> &ClosureEntry<'arena> {
        &self.entries[index]
    }

    /// Returns the parameters of a closure.
    ///
    /// * `index` - Index of the closure.
    pub fn get_closure_input_values(&self, index: usize) -> &ClosureInputValues<'arena> {
        &self.entries[index].values
    }

    /// Returns the mutable parameters of a closure.
    ///
    /// * `index` - Index of the closure.
    pub fn get_closure_input_values_mut(&mut self, index: usize) -> &mut ClosureInputValues<'arena> {
        &mut self.entries[index].values
    }

    /// Returns the spectral weight of a closure.
    ///
    /// * `index` - Index of the closure.
    pub fn get_closure_weight(&self, index: usize) -> Spectrum {
        self.entries[index].weight
    }

    /// Returns the probability of choosing a closure.
    ///
    /// * `index` - Index of the closure.
    pub fn get_closure_pdf_weight(&self, index: usize) -> Float {
        self.entries[index].pdf_weight
    }

    /// Returns an iterator over the closures.
    pub fn iter(&self) -> impl Iterator<Item = &ClosureEntry<'arena>> {
        self.entries.iter()
    }

    /// Returns a mutable iterator over the closures.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClosureEntry<'arena>> {
        self.entries.iter_mut()
    }

    /// Chooses a closure proportionally to the pdf weights. The list must not
    /// be empty.
    ///
    /// * `s` - Uniform random value in [0, 1).
    pub fn choose_closure(&self, s: Float) -> usize {
        debug_assert!(!self.entries.is_empty());

        let mut cdf = 0.0;
        for (i, entry) in self.entries.iter().enumerate() {
            cdf += entry.pdf_weight;
            if s < cdf {
                return i;
            }
        }
        self.entries.len() - 1
    }

    /// Hands the closure dispatcher to every nested layer closure. Nested
    /// layers keep their own parameters and substrates.
    ///
    /// * `osl_bsdf` - The dispatcher that evaluates nested substrates.
    pub fn inject_layer_values(&mut self, osl_bsdf: &'arena ClosureBSDF) {
        for i in 0..self.get_closure_count() {
            if let ClosureInputValues::AlSurfaceLayer(nested) = self.get_closure_input_values_mut(i) {
                nested.osl_bsdf = Some(osl_bsdf);
            }
        }
    }
}
