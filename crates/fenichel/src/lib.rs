//! # fenichel
//!
//! Exact Tikhonov-Fenichel reductions of polynomial slow-fast ODE systems.
//!
//! Given a polynomial system dx/dt = f(x, π) and a slow dimension s, the
//! engine finds parameter subsets whose vanishing produces a singular
//! perturbation with an s-dimensional slow manifold, and derives the
//! reduced slow flow on it:
//!
//! - [`Model`] holds the system and the split of parameters into those
//!   allowed to become small and those held fixed
//! - [`enumerate_candidates`] filters every subset of the separable
//!   parameters through the Jacobian rank conditions
//! - [`compute_variety`] decomposes the fast variety V(f⁰) of a candidate
//!   into components with their dimensions
//! - [`extract_manifold`] parametrizes a component rationally by s free
//!   states, verifying the parametrization by back-substitution
//! - [`build_reduction`] restricts the slow part f¹ of the splitting to
//!   the manifold, yielding the reduced equations
//! - [`general_tfpv_ideal`] runs the elimination-ideal search over all of
//!   parameter space rather than coordinate subsets
//!
//! [`Session`] bundles a model with caching engines for the variety and
//! reduction steps, so interactive exploration recomputes nothing.
//!
//! All arithmetic is exact over Q and the field of rational functions in
//! the parameters; results are deterministic across runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
mod convert;
pub mod error;
mod linalg;
pub mod manifold;
pub mod model;
pub mod reduction;
pub mod search;
pub mod variety;

use std::sync::Arc;

pub use candidate::{enumerate_candidates, passes_rank_filter, Candidate};
pub use error::{Error, ModelError};
pub use manifold::{extract_manifold, Manifold};
pub use model::{Model, SymbolTable};
pub use reduction::{build_reduction, Reduction, ReductionBuilder};
pub use search::{general_tfpv_ideal, TfpvIdeal};
pub use variety::{compute_variety, Variety, VarietyComponent, VarietyEngine};

/// A model paired with caching engines for every pipeline stage.
#[derive(Debug)]
pub struct Session {
    model: Arc<Model>,
    target: usize,
    varieties: VarietyEngine,
    reductions: ReductionBuilder,
}

impl Session {
    /// Opens a session for a model and slow dimension.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TargetDimension` for a dimension outside 1..n.
    pub fn new(model: Model, target_dimension: usize) -> Result<Self, Error> {
        let model = Arc::new(model);
        let varieties = VarietyEngine::new(Arc::clone(&model), target_dimension)?;
        let reductions = ReductionBuilder::new(Arc::clone(&model));
        Ok(Self {
            model,
            target: target_dimension,
            varieties,
            reductions,
        })
    }

    /// The model under study.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The slow dimension.
    #[must_use]
    pub fn target_dimension(&self) -> usize {
        self.target
    }

    /// Enumerates the candidates surviving the rank filter.
    ///
    /// # Errors
    ///
    /// See [`enumerate_candidates`].
    pub fn enumerate_candidates(&self) -> Result<Vec<Candidate>, Error> {
        candidate::enumerate_candidates(&self.model, self.target)
    }

    /// The candidate's decomposed fast variety, cached per candidate.
    #[must_use]
    pub fn variety(&self, candidate: &Candidate) -> Arc<Variety> {
        self.varieties.compute(candidate)
    }

    /// Attempts to parametrize one component of a variety.
    #[must_use]
    pub fn manifold(&self, variety: &Variety, component: usize) -> (Manifold, bool) {
        manifold::extract_manifold(&self.model, variety, component)
    }

    /// Builds the reduced system on a parametrized component, recording
    /// the outcome.
    #[must_use]
    pub fn reduction(&self, candidate: &Candidate, manifold: &Manifold) -> Reduction {
        self.reductions.build(candidate, manifold)
    }

    /// The recorded outcome for a (candidate, component) pair, if built.
    #[must_use]
    pub fn reduction_outcome(&self, candidate: &Candidate, component: usize) -> Option<bool> {
        self.reductions.outcome(candidate, component)
    }

    /// Runs the general search over all of parameter space.
    ///
    /// # Errors
    ///
    /// See [`general_tfpv_ideal`].
    pub fn general_tfpv_ideal(&self) -> Result<TfpvIdeal, Error> {
        search::general_tfpv_ideal(&self.model, self.target)
    }
}
