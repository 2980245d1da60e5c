//! Enumeration of Tikhonov-Fenichel parameter value candidates.
//!
//! A candidate is a subset of the separable parameters sent to zero. For a
//! slow dimension s it survives the filter when the fast system f^(0) can
//! have an (n-s)-dimensional center direction somewhere on its zero set:
//! some (n-s)-minor of the state Jacobian must be a non-zero polynomial,
//! and the (n-s+1)-minors together with f^(0) must not generate the unit
//! ideal over the parameter field. Subsets are checked in parallel and the
//! survivors are reported in ascending bitmask order.

use rayon::prelude::*;
use smallvec::SmallVec;

use fenichel_ideal::Ideal;

use crate::error::{Error, ModelError};
use crate::linalg::{jacobian, minors};
use crate::model::Model;

/// Subsets are encoded as bitmasks over the separable parameters.
const MAX_SEPARABLE: usize = 63;

/// One candidate: a choice of separable parameters to send to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    bits: u64,
    small: SmallVec<[usize; 8]>,
}

impl Candidate {
    fn from_bits(bits: u64, separable: &[usize]) -> Self {
        let small = separable
            .iter()
            .enumerate()
            .filter(|(pos, _)| bits & (1 << pos) != 0)
            .map(|(_, &j)| j)
            .collect();
        Self { bits, small }
    }

    /// Builds the candidate that sends exactly the named parameters to
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownParameter` for a name not in the model
    /// and `ModelError::NotSeparable` for a parameter held fixed.
    pub fn from_params(model: &Model, names: &[&str]) -> Result<Self, ModelError> {
        let separable = model.separable_params();
        let mut bits = 0u64;
        for name in names {
            let j = model.param_index(name)?;
            let pos = separable
                .iter()
                .position(|&k| k == j)
                .ok_or_else(|| ModelError::NotSeparable((*name).to_string()))?;
            bits |= 1 << pos;
        }
        Ok(Self::from_bits(bits, &separable))
    }

    /// The bitmask over the model's separable parameters.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Indices of the small parameters, ascending.
    #[must_use]
    pub fn small_params(&self) -> &[usize] {
        &self.small
    }

    /// Returns true if parameter `j` is sent to zero by this candidate.
    #[must_use]
    pub fn is_small(&self, j: usize) -> bool {
        self.small.contains(&j)
    }

    /// Renders the small set with the model's parameter names.
    #[must_use]
    pub fn describe(&self, model: &Model) -> String {
        let names: Vec<&str> = self
            .small
            .iter()
            .map(|&j| model.param_names()[j].as_str())
            .collect();
        format!("{{{}}}", names.join(", "))
    }
}

pub(crate) fn validate_target(model: &Model, s: usize) -> Result<(), ModelError> {
    let n = model.num_states();
    if s == 0 || s >= n {
        return Err(ModelError::TargetDimension { s, n });
    }
    Ok(())
}

/// Enumerates every subset of the separable parameters and keeps the
/// candidates passing the rank filter for slow dimension `s`.
///
/// # Errors
///
/// Returns `ModelError::TargetDimension` for an s outside 1..n and
/// `ModelError::TooManySeparable` when the subsets do not fit a bitmask.
pub fn enumerate_candidates(model: &Model, s: usize) -> Result<Vec<Candidate>, Error> {
    validate_target(model, s)?;

    let separable = model.separable_params();
    if separable.len() > MAX_SEPARABLE {
        return Err(ModelError::TooManySeparable {
            count: separable.len(),
            max: MAX_SEPARABLE,
        }
        .into());
    }

    let total = 1u64 << separable.len();
    let mut kept: Vec<Candidate> = (0..total)
        .into_par_iter()
        .filter_map(|bits| {
            let cand = Candidate::from_bits(bits, &separable);
            match keeps_candidate(model, s, &cand) {
                Ok(true) => Some(Ok(cand)),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            }
        })
        .collect::<Result<Vec<_>, Error>>()?;

    kept.sort_by_key(Candidate::bits);
    Ok(kept)
}

/// Applies the rank filter to a single, possibly hand-built candidate.
///
/// # Errors
///
/// Returns `ModelError::TargetDimension` for an s outside 1..n.
pub fn passes_rank_filter(model: &Model, s: usize, candidate: &Candidate) -> Result<bool, Error> {
    validate_target(model, s)?;
    keeps_candidate(model, s, candidate)
}

/// The rank filter for one candidate.
fn keeps_candidate(model: &Model, s: usize, cand: &Candidate) -> Result<bool, Error> {
    let n = model.num_states();
    let m = model.num_params();
    let r = n - s;

    let fast: Vec<_> = model
        .rhs_small_zero(cand.small_params())
        .iter()
        .map(|p| crate::convert::to_param_field(p, n, m))
        .collect();

    let jac = jacobian(&fast, n);

    // The Jacobian must be able to reach rank n - s
    let low = minors(&jac, r);
    if low.iter().all(|p| p.is_zero()) {
        return Ok(false);
    }

    // ... and must drop to that rank somewhere on the fast zero set: the
    // (r+1)-minors together with f^(0) cannot generate the unit ideal
    let mut gens: Vec<_> = fast.into_iter().filter(|p| !p.is_zero()).collect();
    gens.extend(minors(&jac, r + 1).into_iter().filter(|p| !p.is_zero()));

    let ideal = Ideal::new(gens, n)?;
    Ok(!ideal.is_trivial())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade() -> Model {
        Model::build(&["x", "y"], &["p", "q"], &[true, true], |x, p| {
            vec![p[0].mul(&x[0]).neg(), p[0].mul(&x[0]).sub(&p[1].mul(&x[1]))]
        })
        .unwrap()
    }

    #[test]
    fn cascade_keeps_exactly_the_single_rates() {
        // With slow dimension 1 the empty subset fails (the full system
        // has no rank drop on its zero set) and the all-small subset has
        // an identically zero Jacobian
        let model = cascade();
        let cands = enumerate_candidates(&model, 1).unwrap();

        assert_eq!(cands.len(), 2);
        assert_eq!(cands[0].small_params(), &[0]);
        assert_eq!(cands[1].small_params(), &[1]);
    }

    #[test]
    fn candidates_come_back_sorted_and_deterministic() {
        let model = cascade();
        let a = enumerate_candidates(&model, 1).unwrap();
        let b = enumerate_candidates(&model, 1).unwrap();
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0].bits() < w[1].bits()));
    }

    #[test]
    fn from_params_checks_names_and_mask() {
        let model = Model::build(&["x"], &["p", "q"], &[true, false], |x, p| {
            vec![p[0].mul(&x[0]).neg().add(&p[1].clone())]
        })
        .unwrap();

        let c = Candidate::from_params(&model, &["p"]).unwrap();
        assert_eq!(c.small_params(), &[0]);
        assert!(c.is_small(0));
        assert!(!c.is_small(1));
        assert_eq!(c.describe(&model), "{p}");

        assert_eq!(
            Candidate::from_params(&model, &["w"]),
            Err(ModelError::UnknownParameter("w".into()))
        );
        assert_eq!(
            Candidate::from_params(&model, &["q"]),
            Err(ModelError::NotSeparable("q".into()))
        );
    }

    #[test]
    fn invalid_target_dimension_is_rejected() {
        let model = cascade();
        assert!(matches!(
            enumerate_candidates(&model, 0),
            Err(Error::Model(ModelError::TargetDimension { s: 0, n: 2 }))
        ));
        assert!(matches!(
            enumerate_candidates(&model, 2),
            Err(Error::Model(ModelError::TargetDimension { s: 2, n: 2 }))
        ));
    }
}
