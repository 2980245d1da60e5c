//! The general Tikhonov-Fenichel parameter value search.
//!
//! Subset enumeration only finds parameter values on coordinate faces of
//! parameter space. The general search instead eliminates the states from
//! the ideal generated by the right-hand side and the (n-s+1)-minors of
//! its state Jacobian, in the combined ring. The resulting elimination
//! ideal cuts out the closure of all parameter points admitting a
//! dimension-s reduction; membership of a concrete parameter point is a
//! necessary condition for it to be a Tikhonov-Fenichel parameter value.

use fenichel_ideal::Ideal;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::rationals::Q;
use fenichel_rings::traits::Ring;

use crate::candidate::validate_target;
use crate::error::{Error, ModelError};
use crate::linalg::{jacobian, minors};
use crate::model::{Model, ORDER};

/// The elimination ideal of the general search: generators live in the
/// combined ring but involve only the parameters.
#[derive(Debug, Clone)]
pub struct TfpvIdeal {
    ideal: Ideal<Q>,
    num_states: usize,
    num_params: usize,
}

impl TfpvIdeal {
    /// The state-free generators, in the combined ring.
    #[must_use]
    pub fn generators(&self) -> &[SparsePoly<Q>] {
        self.ideal.generators()
    }

    /// Returns true if `p` lies in the elimination ideal.
    #[must_use]
    pub fn contains(&self, p: &SparsePoly<Q>) -> bool {
        self.ideal.contains(p)
    }

    /// Returns true if every generator vanishes at the parameter point.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::PointLength` for a point of the wrong arity.
    pub fn contains_point(&self, params: &[Q]) -> Result<bool, Error> {
        if params.len() != self.num_params {
            return Err(ModelError::PointLength {
                expected: self.num_params,
                got: params.len(),
            }
            .into());
        }

        // Generators are state-free, so the state block can be anything
        let mut point = vec![Q::from_integer(0); self.num_states];
        point.extend(params.iter().cloned());
        Ok(self
            .generators()
            .iter()
            .all(|g| Ring::is_zero(&g.evaluate(&point))))
    }

    /// Returns true when the variety of the ideal lies inside the union
    /// of the parameter coordinate hyperplanes: every parameter point it
    /// contains has some vanishing coordinate.
    ///
    /// # Errors
    ///
    /// Returns `Error::Algebra` when the saturation ring exceeds the
    /// monomial capacity.
    pub fn is_saturation_trivial(&self) -> Result<bool, Error> {
        let width = self.num_states + self.num_params;
        let mut product = SparsePoly::one(width, ORDER);
        for j in 0..self.num_params {
            product = product.mul(&SparsePoly::var(self.num_states + j, width, ORDER));
        }
        Ok(self.ideal.saturation_trivial(&product)?)
    }
}

/// Computes the general search ideal for slow dimension `s`.
///
/// # Errors
///
/// Returns `ModelError::TargetDimension` for an s outside 1..n and
/// `Error::Algebra` when the kernel rejects the ring.
pub fn general_tfpv_ideal(model: &Model, s: usize) -> Result<TfpvIdeal, Error> {
    validate_target(model, s)?;
    let n = model.num_states();
    let m = model.num_params();

    let jac = jacobian(model.rhs(), n);
    let mut gens = model.rhs().to_vec();
    gens.extend(minors(&jac, n - s + 1));

    let ideal = Ideal::new(gens, n + m)?;
    let eliminated = ideal.eliminate(n)?;

    Ok(TfpvIdeal {
        ideal: eliminated,
        num_states: n,
        num_params: m,
    })
}
