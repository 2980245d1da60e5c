//! Polynomial ideals with cached Gröbner bases.
//!
//! An `Ideal` owns its generators and lazily computes the reduced Gröbner
//! basis behind a `parking_lot::RwLock`, write-once per ideal, so repeated
//! membership and triviality queries cost one computation. Elimination and
//! saturation are built on top: elimination recomputes the basis under the
//! block order and keeps the state-free elements; the saturation triviality
//! test is the Rabinowitsch trick in a ring with one extra variable.

use std::sync::Arc;

use parking_lot::RwLock;

use fenichel_poly::monomial::MAX_VARS;
use fenichel_poly::ordering::MonomialOrder;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::traits::Field;

use crate::buchberger::{basis_is_trivial, groebner_basis, normal_form};
use crate::KernelError;

/// An ideal in a multivariate polynomial ring over a field.
#[derive(Debug)]
pub struct Ideal<R: Field> {
    gens: Vec<SparsePoly<R>>,
    num_vars: usize,
    order: MonomialOrder,
    gb: RwLock<Option<Arc<Vec<SparsePoly<R>>>>>,
}

impl<R: Field> Clone for Ideal<R> {
    fn clone(&self) -> Self {
        Self {
            gens: self.gens.clone(),
            num_vars: self.num_vars,
            order: self.order,
            gb: RwLock::new(self.gb.read().clone()),
        }
    }
}

impl<R: Field + Send + Sync> Ideal<R> {
    /// Creates an ideal from generators under the grevlex ordering.
    ///
    /// Zero generators are dropped.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::TooManyVariables` if the ring does not fit
    /// the packed monomial representation.
    pub fn new(gens: Vec<SparsePoly<R>>, num_vars: usize) -> Result<Self, KernelError> {
        Self::with_order(gens, num_vars, MonomialOrder::Grevlex)
    }

    /// Creates an ideal from generators under a specific ordering.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::TooManyVariables` if the ring does not fit
    /// the packed monomial representation.
    pub fn with_order(
        gens: Vec<SparsePoly<R>>,
        num_vars: usize,
        order: MonomialOrder,
    ) -> Result<Self, KernelError> {
        if num_vars > MAX_VARS {
            return Err(KernelError::TooManyVariables {
                needed: num_vars,
                max: MAX_VARS,
            });
        }

        let gens: Vec<SparsePoly<R>> = gens
            .into_iter()
            .filter(|p| !p.is_zero())
            .map(|p| p.with_order(order).widened(num_vars))
            .collect();

        Ok(Self {
            gens,
            num_vars,
            order,
            gb: RwLock::new(None),
        })
    }

    /// Returns the generators.
    #[must_use]
    pub fn generators(&self) -> &[SparsePoly<R>] {
        &self.gens
    }

    /// Returns the number of ring variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the monomial ordering.
    #[must_use]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Returns the reduced Gröbner basis, computing it on first use.
    #[must_use]
    pub fn groebner(&self) -> Arc<Vec<SparsePoly<R>>> {
        if let Some(gb) = self.gb.read().as_ref() {
            return Arc::clone(gb);
        }

        let computed = Arc::new(groebner_basis(&self.gens));

        let mut slot = self.gb.write();
        // Another thread may have raced us; the result is identical either
        // way since the reduced basis is unique
        if slot.is_none() {
            *slot = Some(Arc::clone(&computed));
        }
        slot.as_ref().map(Arc::clone).expect("slot was just filled")
    }

    /// Returns true if the ideal is the full ring.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        basis_is_trivial(&self.groebner())
    }

    /// Returns true if `p` lies in the ideal.
    #[must_use]
    pub fn contains(&self, p: &SparsePoly<R>) -> bool {
        normal_form(&p.with_order(self.order), &self.groebner()).is_zero()
    }

    /// Computes the elimination ideal obtained by eliminating the leading
    /// block of `split` variables.
    ///
    /// The result lives in the same ring but its generators involve only
    /// the variables `split..num_vars`.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidSplit` if `split` exceeds the ring.
    pub fn eliminate(&self, split: usize) -> Result<Self, KernelError> {
        if split > self.num_vars {
            return Err(KernelError::InvalidSplit {
                split,
                num_vars: self.num_vars,
            });
        }

        let block = MonomialOrder::Block { split: split as u8 };
        let reordered: Vec<SparsePoly<R>> =
            self.gens.iter().map(|p| p.with_order(block)).collect();
        let gb = groebner_basis(&reordered);

        let kept: Vec<SparsePoly<R>> = gb
            .into_iter()
            .filter(|p| {
                p.terms()
                    .iter()
                    .all(|(m, _)| (0..split).all(|i| m.exponent(i) == 0))
            })
            .collect();

        Self::new(kept, self.num_vars)
    }

    /// Returns true if saturating the ideal by `g` yields the full ring,
    /// i.e. the variety of the ideal lies entirely inside V(g).
    ///
    /// Uses the Rabinowitsch trick: the saturation is trivial exactly when
    /// 1 ∈ ⟨I, t·g − 1⟩ in the ring extended by one variable t.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::TooManyVariables` if the extended ring does
    /// not fit the packed monomial representation.
    pub fn saturation_trivial(&self, g: &SparsePoly<R>) -> Result<bool, KernelError> {
        let ext = self.num_vars + 1;
        if ext > MAX_VARS {
            return Err(KernelError::TooManyVariables {
                needed: ext,
                max: MAX_VARS,
            });
        }

        let order = MonomialOrder::Grevlex;
        let t = SparsePoly::var(self.num_vars, ext, order);
        let tg1 = t.mul(&g.with_order(order).widened(ext)).sub(&SparsePoly::one(ext, order));

        let mut gens: Vec<SparsePoly<R>> = self
            .gens
            .iter()
            .map(|p| p.with_order(order).widened(ext))
            .collect();
        gens.push(tg1);

        Ok(basis_is_trivial(&groebner_basis(&gens)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenichel_rings::rationals::Q;

    const ORDER: MonomialOrder = MonomialOrder::Grevlex;

    fn var(i: usize, n: usize) -> SparsePoly<Q> {
        SparsePoly::var(i, n, ORDER)
    }

    #[test]
    fn membership() {
        // I = <x^2, y>; x^2 + y is a member, x is not
        let i = Ideal::new(vec![var(0, 2).pow(2), var(1, 2)], 2).unwrap();

        assert!(i.contains(&var(0, 2).pow(2).add(&var(1, 2))));
        assert!(!i.contains(&var(0, 2)));
        assert!(!i.is_trivial());
    }

    #[test]
    fn groebner_is_cached_and_idempotent() {
        let i = Ideal::new(vec![var(0, 2).pow(2).sub(&var(1, 2))], 2).unwrap();

        let a = i.groebner();
        let b = i.groebner();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn elimination_projects_a_curve() {
        // I = <y - x^2, z - x^3>: eliminating x gives relations in y, z
        // containing z^2 - y^3
        let x = var(0, 3);
        let y = var(1, 3);
        let z = var(2, 3);

        let i = Ideal::new(vec![y.sub(&x.pow(2)), z.sub(&x.pow(3))], 3).unwrap();
        let elim = i.eliminate(1).unwrap();

        assert!(!elim.generators().is_empty());
        for g in elim.generators() {
            assert_eq!(g.degree_in(0), 0);
        }
        assert!(elim.contains(&z.pow(2).sub(&y.pow(3))));
    }

    #[test]
    fn saturation_trivial_iff_variety_inside_divisor() {
        // I = <x*y>: saturating by x leaves the y-axis; not trivial
        let i = Ideal::new(vec![var(0, 2).mul(&var(1, 2))], 2).unwrap();
        assert!(!i.saturation_trivial(&var(0, 2)).unwrap());

        // I = <x>: saturating by x is trivial (V(I) ⊆ V(x))
        let j = Ideal::new(vec![var(0, 2)], 2).unwrap();
        assert!(j.saturation_trivial(&var(0, 2)).unwrap());
    }
}
