//! Reduced slow-time systems.
//!
//! For a candidate the right-hand side splits as f = f^(0) + f^(1), where
//! f^(0) sends the small parameters to zero and f^(1) keeps exactly the
//! terms that vanish with them. On a parametrized component of V(f^(0))
//! the slow flow in the free coordinates is f^(1) restricted to the
//! manifold. A reduction is successful when the fast part is consistent
//! with the chart: f^(0) vanishes identically in the free coordinates and
//! vanishes on the manifold in the dependent ones. Outcomes are recorded
//! per (candidate, component) pair; rebuilding the pair, for instance with
//! a corrected asserted chart, overwrites the record.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use fenichel_poly::ratio::RatioExpr;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::rationals::Q;
use fenichel_rings::traits::Ring;

use crate::candidate::Candidate;
use crate::manifold::Manifold;
use crate::model::Model;

/// The reduced system on one parametrized component.
#[derive(Debug, Clone)]
pub struct Reduction {
    bits: u64,
    component: usize,
    free: Vec<usize>,
    equations: Vec<RatioExpr>,
    successful: bool,
}

impl Reduction {
    /// Bitmask of the candidate this reduction belongs to.
    #[must_use]
    pub fn candidate_bits(&self) -> u64 {
        self.bits
    }

    /// Index of the variety component the manifold parametrized.
    #[must_use]
    pub fn component(&self) -> usize {
        self.component
    }

    /// The free state coordinates carrying the slow flow.
    #[must_use]
    pub fn free_coordinates(&self) -> &[usize] {
        &self.free
    }

    /// One slow equation per free coordinate, in the combined ring.
    #[must_use]
    pub fn equations(&self) -> &[RatioExpr] {
        &self.equations
    }

    /// Returns true when the fast part was consistent with the chart.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.successful
    }

    /// Renders the slow system with the model's names.
    #[must_use]
    pub fn describe(&self, model: &Model) -> String {
        let names = model.symbol_names();
        self.free
            .iter()
            .zip(self.equations.iter())
            .map(|(&i, eq)| format!("{}' = {}", names[i], eq.to_string_with(&names)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builds the reduction of one candidate on one parametrized component.
#[must_use]
pub fn build_reduction(model: &Model, candidate: &Candidate, manifold: &Manifold) -> Reduction {
    let n = model.num_states();
    let m = model.num_params();
    let args = manifold.substitution_args(n, m);

    let fast = model.rhs_small_zero(candidate.small_params());
    let slow: Vec<SparsePoly<Q>> = model
        .rhs()
        .iter()
        .zip(fast.iter())
        .map(|(f, f0)| f.sub(f0))
        .collect();

    let restrict =
        |p: &SparsePoly<Q>| p.evaluate_with(|c| RatioExpr::constant(c.clone()), &args);

    // The chart is consistent when the fast part vanishes on the manifold
    // and contributes nothing to the free coordinates
    let fast_vanishes = fast.iter().all(|p| Ring::is_zero(&restrict(p)));
    let free_slow = manifold
        .free_coordinates()
        .iter()
        .all(|&i| fast[i].is_zero());

    let equations: Vec<RatioExpr> = manifold
        .free_coordinates()
        .iter()
        .map(|&i| restrict(&slow[i]))
        .collect();

    Reduction {
        bits: candidate.bits(),
        component: manifold.component(),
        free: manifold.free_coordinates().to_vec(),
        equations,
        successful: fast_vanishes && free_slow,
    }
}

/// Caching reduction builder for one model.
#[derive(Debug)]
pub struct ReductionBuilder {
    model: Arc<Model>,
    outcomes: RwLock<FxHashMap<(u64, usize), bool>>,
}

impl ReductionBuilder {
    /// Creates a builder for the given model.
    #[must_use]
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            outcomes: RwLock::new(FxHashMap::default()),
        }
    }

    /// Builds the reduction and records its outcome, replacing any earlier
    /// record for the same (candidate, component) pair.
    #[must_use]
    pub fn build(&self, candidate: &Candidate, manifold: &Manifold) -> Reduction {
        let reduction = build_reduction(&self.model, candidate, manifold);
        self.outcomes
            .write()
            .insert((reduction.bits, reduction.component), reduction.successful);
        reduction
    }

    /// The recorded outcome for a (candidate, component) pair, if that
    /// reduction was built.
    #[must_use]
    pub fn outcome(&self, candidate: &Candidate, component: usize) -> Option<bool> {
        self.outcomes
            .read()
            .get(&(candidate.bits(), component))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifold::extract_manifold;
    use crate::variety::compute_variety;

    fn cascade() -> Model {
        Model::build(&["x", "y"], &["p", "q"], &[true, true], |x, p| {
            vec![p[0].mul(&x[0]).neg(), p[0].mul(&x[0]).sub(&p[1].mul(&x[1]))]
        })
        .unwrap()
    }

    fn q(n: i64) -> Q {
        Q::from_integer(n)
    }

    #[test]
    fn slow_decay_reduces_to_one_equation() {
        let model = cascade();
        let cand = Candidate::from_params(&model, &["p"]).unwrap();
        let variety = compute_variety(&model, &cand, 1);
        let (manifold, ok) = extract_manifold(&model, &variety, 0);
        assert!(ok);

        let reduction = build_reduction(&model, &cand, &manifold);
        assert!(reduction.is_successful());
        assert_eq!(reduction.free_coordinates(), &[0]);
        assert_eq!(reduction.equations().len(), 1);

        // x' = -p*x on the axis y = 0; at x = 1, p = 2 that is -2
        let point = [q(1), q(0), q(2), q(5)];
        assert_eq!(reduction.equations()[0].evaluate(&point), Some(q(-2)));
    }

    #[test]
    fn outcomes_are_cached_per_candidate_and_component() {
        let model = Arc::new(cascade());
        let builder = ReductionBuilder::new(Arc::clone(&model));
        let cand = Candidate::from_params(&model, &["p"]).unwrap();
        let variety = compute_variety(&model, &cand, 1);
        let (manifold, _) = extract_manifold(&model, &variety, 0);

        assert_eq!(builder.outcome(&cand, 0), None);
        let reduction = builder.build(&cand, &manifold);
        assert_eq!(builder.outcome(&cand, 0), Some(reduction.is_successful()));
        assert_eq!(builder.outcome(&cand, 1), None);
    }

    #[test]
    fn corrected_chart_overwrites_a_failed_outcome() {
        let model = Arc::new(cascade());
        let builder = ReductionBuilder::new(Arc::clone(&model));
        let cand = Candidate::from_params(&model, &["p"]).unwrap();

        // y = 1 is not inside V(f0), so the reduction fails
        let wrong = Manifold::asserted(
            0,
            vec![0],
            vec![RatioExpr::var(0, 4), RatioExpr::constant(q(1))],
        );
        let failed = builder.build(&cand, &wrong);
        assert!(!failed.is_successful());
        assert_eq!(builder.outcome(&cand, 0), Some(false));

        // The corrected chart y = 0 succeeds and replaces the record
        let fixed = Manifold::asserted(
            0,
            vec![0],
            vec![RatioExpr::var(0, 4), RatioExpr::constant(q(0))],
        );
        let ok = builder.build(&cand, &fixed);
        assert!(ok.is_successful());
        assert_eq!(builder.outcome(&cand, 0), Some(true));
    }
}
