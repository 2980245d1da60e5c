//! The fast variety V(f^(0)) of a candidate and its decomposition.
//!
//! The variety is computed over the parameter field, decomposed into
//! components, and each component is carried in both pictures: a reduced
//! Gröbner basis with parameter-field coefficients, and the same
//! generators with denominators cleared into the combined ring, which is
//! the form the manifold solver consumes. Results are cached per
//! candidate behind a read-write lock, write-once, so a candidate's
//! decomposition is computed exactly once per engine.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use fenichel_ideal::decompose;
use fenichel_poly::ratio::RatioExpr;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::rationals::Q;

use crate::candidate::{validate_target, Candidate};
use crate::convert::{clear_denominators, to_param_field};
use crate::error::Error;
use crate::model::Model;

/// One component of a fast variety.
#[derive(Debug, Clone)]
pub struct VarietyComponent {
    generators: Vec<SparsePoly<RatioExpr>>,
    combined_generators: Vec<SparsePoly<Q>>,
    dimension: usize,
    is_target: bool,
}

impl VarietyComponent {
    /// Reduced Gröbner basis over the parameter field.
    #[must_use]
    pub fn generators(&self) -> &[SparsePoly<RatioExpr>] {
        &self.generators
    }

    /// The same generators with denominators cleared, in the combined
    /// ring.
    #[must_use]
    pub fn combined_generators(&self) -> &[SparsePoly<Q>] {
        &self.combined_generators
    }

    /// Dimension of the component over the parameter field.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns true if the component has the slow dimension.
    #[must_use]
    pub fn is_target_dim(&self) -> bool {
        self.is_target
    }
}

/// The decomposed fast variety of one candidate.
#[derive(Debug, Clone)]
pub struct Variety {
    bits: u64,
    target_dimension: usize,
    components: Vec<VarietyComponent>,
}

impl Variety {
    /// Bitmask of the candidate this variety belongs to.
    #[must_use]
    pub fn candidate_bits(&self) -> u64 {
        self.bits
    }

    /// The slow dimension the reduction is aiming for.
    #[must_use]
    pub fn target_dimension(&self) -> usize {
        self.target_dimension
    }

    /// All components, sorted by descending dimension.
    #[must_use]
    pub fn components(&self) -> &[VarietyComponent] {
        &self.components
    }

    /// The components of the slow dimension, with their indices.
    pub fn target_components(&self) -> impl Iterator<Item = (usize, &VarietyComponent)> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_target)
    }
}

/// Computes a candidate's fast variety without caching.
#[must_use]
pub fn compute_variety(model: &Model, candidate: &Candidate, s: usize) -> Variety {
    let n = model.num_states();
    let m = model.num_params();

    let fast: Vec<SparsePoly<RatioExpr>> = model
        .rhs_small_zero(candidate.small_params())
        .iter()
        .map(|p| to_param_field(p, n, m))
        .filter(|p| !p.is_zero())
        .collect();

    let components = decompose(&fast, n)
        .into_iter()
        .map(|c| {
            let combined = c
                .generators
                .iter()
                .map(|g| clear_denominators(g, n, m))
                .collect();
            VarietyComponent {
                combined_generators: combined,
                is_target: c.dimension == s,
                dimension: c.dimension,
                generators: c.generators,
            }
        })
        .collect();

    Variety {
        bits: candidate.bits(),
        target_dimension: s,
        components,
    }
}

/// Caching variety engine for one model and slow dimension.
#[derive(Debug)]
pub struct VarietyEngine {
    model: Arc<Model>,
    s: usize,
    cache: RwLock<FxHashMap<u64, Arc<Variety>>>,
}

impl VarietyEngine {
    /// Creates an engine for the given model and slow dimension.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TargetDimension` for an s outside 1..n.
    pub fn new(model: Arc<Model>, s: usize) -> Result<Self, Error> {
        validate_target(&model, s)?;
        Ok(Self {
            model,
            s,
            cache: RwLock::new(FxHashMap::default()),
        })
    }

    /// The slow dimension.
    #[must_use]
    pub fn target_dimension(&self) -> usize {
        self.s
    }

    /// Returns the candidate's decomposed variety, computing it on first
    /// use.
    #[must_use]
    pub fn compute(&self, candidate: &Candidate) -> Arc<Variety> {
        if let Some(v) = self.cache.read().get(&candidate.bits()) {
            return Arc::clone(v);
        }

        let computed = Arc::new(compute_variety(&self.model, candidate, self.s));

        // A racing thread may have inserted meanwhile; both computed the
        // same value, keep whichever arrived first
        let mut cache = self.cache.write();
        Arc::clone(cache.entry(candidate.bits()).or_insert(computed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ORDER;

    fn cascade() -> Model {
        Model::build(&["x", "y"], &["p", "q"], &[true, true], |x, p| {
            vec![p[0].mul(&x[0]).neg(), p[0].mul(&x[0]).sub(&p[1].mul(&x[1]))]
        })
        .unwrap()
    }

    #[test]
    fn slow_decay_leaves_the_x_axis() {
        // With p small the fast system is (0, -qy): V = {y = 0}
        let model = cascade();
        let cand = Candidate::from_params(&model, &["p"]).unwrap();
        let variety = compute_variety(&model, &cand, 1);

        assert_eq!(variety.components().len(), 1);
        let comp = &variety.components()[0];
        assert_eq!(comp.dimension(), 1);
        assert!(comp.is_target_dim());

        // The parameter coefficient q is a unit: the reduced basis is {y}
        assert_eq!(
            comp.generators(),
            &[SparsePoly::var(1, 2, ORDER)]
        );
        assert_eq!(
            comp.combined_generators(),
            &[SparsePoly::var(1, 4, ORDER)]
        );
    }

    #[test]
    fn all_small_candidate_has_full_dimensional_variety() {
        let model = cascade();
        let cand = Candidate::from_params(&model, &["p", "q"]).unwrap();
        let variety = compute_variety(&model, &cand, 1);

        assert_eq!(variety.components().len(), 1);
        assert_eq!(variety.components()[0].dimension(), 2);
        assert!(!variety.components()[0].is_target_dim());
        assert_eq!(variety.target_components().count(), 0);
    }

    #[test]
    fn engine_caches_per_candidate() {
        let model = Arc::new(cascade());
        let engine = VarietyEngine::new(Arc::clone(&model), 1).unwrap();
        let cand = Candidate::from_params(&model, &["p"]).unwrap();

        let a = engine.compute(&cand);
        let b = engine.compute(&cand);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.candidate_bits(), cand.bits());
    }
}
