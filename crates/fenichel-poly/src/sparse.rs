//! Sparse multivariate polynomials.
//!
//! Terms are stored as (monomial, coefficient) pairs sorted descending by
//! the monomial ordering, so the leading term is always first. Binary
//! operations require matching orderings; the variable count widens to the
//! larger operand, which lets polynomials from narrower rings (e.g. a
//! parameter block) combine with combined-ring polynomials.

use fenichel_rings::traits::{Field, Ring};

use crate::monomial::PackedMonomial;
use crate::ordering::MonomialOrder;

/// A sparse multivariate polynomial over a ring R.
#[derive(Clone, Debug)]
pub struct SparsePoly<R: Ring> {
    /// Terms in descending monomial order.
    terms: Vec<(PackedMonomial, R)>,
    /// Number of variables.
    num_vars: usize,
    /// Monomial ordering used for sorting.
    order: MonomialOrder,
}

// Equality ignores the declared variable count: a polynomial in a narrower
// ring equals its widened copy. Orderings must match for terms to align.
impl<R: Ring> PartialEq for SparsePoly<R> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.terms == other.terms
    }
}

impl<R: Ring> Eq for SparsePoly<R> {}

impl<R: Ring> SparsePoly<R> {
    /// Creates a new polynomial from terms.
    ///
    /// Terms are automatically sorted and combined; zero coefficients are
    /// dropped.
    #[must_use]
    pub fn new(terms: Vec<(PackedMonomial, R)>, num_vars: usize, order: MonomialOrder) -> Self {
        let mut poly = Self {
            terms,
            num_vars,
            order,
        };
        poly.normalize();
        poly
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero(num_vars: usize, order: MonomialOrder) -> Self {
        Self {
            terms: Vec::new(),
            num_vars,
            order,
        }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one(num_vars: usize, order: MonomialOrder) -> Self {
        Self {
            terms: vec![(PackedMonomial::one(num_vars), R::one())],
            num_vars,
            order,
        }
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: R, num_vars: usize, order: MonomialOrder) -> Self {
        if c.is_zero() {
            Self::zero(num_vars, order)
        } else {
            Self {
                terms: vec![(PackedMonomial::one(num_vars), c)],
                num_vars,
                order,
            }
        }
    }

    /// Creates a single variable x_i.
    #[must_use]
    pub fn var(i: usize, num_vars: usize, order: MonomialOrder) -> Self {
        Self {
            terms: vec![(PackedMonomial::var(i, num_vars), R::one())],
            num_vars,
            order,
        }
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if this polynomial is a non-zero constant or zero.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.len() <= 1 && self.terms.first().map_or(true, |(m, _)| m.is_one())
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the monomial ordering.
    #[must_use]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Returns the terms in descending monomial order.
    #[must_use]
    pub fn terms(&self) -> &[(PackedMonomial, R)] {
        &self.terms
    }

    /// Returns the leading monomial.
    #[must_use]
    pub fn leading_monomial(&self) -> Option<&PackedMonomial> {
        self.terms.first().map(|(m, _)| m)
    }

    /// Returns the leading coefficient.
    #[must_use]
    pub fn leading_coeff(&self) -> Option<&R> {
        self.terms.first().map(|(_, c)| c)
    }

    /// Returns the leading term (monomial, coefficient).
    #[must_use]
    pub fn leading_term(&self) -> Option<&(PackedMonomial, R)> {
        self.terms.first()
    }

    /// Sorts terms and combines like terms.
    fn normalize(&mut self) {
        let order = self.order;
        let num_vars = self.num_vars;
        self.terms
            .sort_by(|a, b| order.compare(&b.0, &a.0, num_vars));

        let mut i = 0;
        while i < self.terms.len() {
            let j = i + 1;
            while j < self.terms.len() && self.terms[i].0 == self.terms[j].0 {
                let c = self.terms.remove(j).1;
                self.terms[i].1 = self.terms[i].1.clone() + c;
            }
            if self.terms[i].1.is_zero() {
                self.terms.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Re-sorts the polynomial under a different monomial ordering.
    #[must_use]
    pub fn with_order(&self, order: MonomialOrder) -> Self {
        Self::new(self.terms.clone(), self.num_vars, order)
    }

    /// Widens the polynomial to a ring with more variables.
    #[must_use]
    pub fn widened(&self, num_vars: usize) -> Self {
        assert!(num_vars >= self.num_vars);
        Self {
            terms: self.terms.clone(),
            num_vars,
            order: self.order,
        }
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        assert!(self.order == other.order, "monomial order mismatch");

        let mut terms = self.terms.clone();
        terms.extend(other.terms.clone());

        Self::new(terms, self.num_vars.max(other.num_vars), self.order)
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, c)| (*m, -c.clone())).collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two polynomials (schoolbook algorithm).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert!(self.order == other.order, "monomial order mismatch");

        let num_vars = self.num_vars.max(other.num_vars);
        if self.is_zero() || other.is_zero() {
            return Self::zero(num_vars, self.order);
        }

        let mut terms = Vec::with_capacity(self.len() * other.len());

        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                terms.push((m1.mul(m2), c1.clone() * c2.clone()));
            }
        }

        Self::new(terms, num_vars, self.order)
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero(self.num_vars, self.order);
        }

        Self::new(
            self.terms
                .iter()
                .map(|(m, x)| (*m, x.clone() * c.clone()))
                .collect(),
            self.num_vars,
            self.order,
        )
    }

    /// Multiplies by a single term c * m.
    #[must_use]
    pub fn mul_term(&self, m: &PackedMonomial, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero(self.num_vars, self.order);
        }

        Self::new(
            self.terms
                .iter()
                .map(|(m2, c2)| (m.mul(m2), c2.clone() * c.clone()))
                .collect(),
            self.num_vars.max(m.num_vars()),
            self.order,
        )
    }

    /// Computes self^n.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one(self.num_vars, self.order);
        for _ in 0..n {
            result = result.mul(self);
        }
        result
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Computes the degree in a single variable.
    #[must_use]
    pub fn degree_in(&self, var: usize) -> u16 {
        self.terms
            .iter()
            .map(|(m, _)| m.exponent(var))
            .max()
            .unwrap_or(0)
    }

    /// Extracts the coefficient of `var^power` as a polynomial in the
    /// remaining variables.
    #[must_use]
    pub fn coeff_in(&self, var: usize, power: u16) -> Self {
        let terms = self
            .terms
            .iter()
            .filter(|(m, _)| m.exponent(var) == power)
            .map(|(m, c)| {
                let mut exps: Vec<u16> = (0..self.num_vars).map(|i| m.exponent(i)).collect();
                exps[var] = 0;
                (PackedMonomial::new(&exps), c.clone())
            })
            .collect();

        Self::new(terms, self.num_vars, self.order)
    }

    /// Computes the formal partial derivative with respect to variable `var`.
    #[must_use]
    pub fn derivative(&self, var: usize) -> Self {
        let terms = self
            .terms
            .iter()
            .filter(|(m, _)| m.exponent(var) > 0)
            .map(|(m, c)| {
                let e = m.exponent(var);
                let reduced = m
                    .div(&PackedMonomial::var(var, self.num_vars))
                    .expect("exponent is positive");
                (reduced, c.mul_by_scalar(i64::from(e)))
            })
            .collect();

        Self::new(terms, self.num_vars, self.order)
    }

    /// Sets a variable to zero, dropping every term that contains it.
    #[must_use]
    pub fn set_var_zero(&self, var: usize) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|(m, _)| m.exponent(var) == 0)
                .cloned()
                .collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Substitutes a polynomial for variable `var`.
    #[must_use]
    pub fn substitute(&self, var: usize, replacement: &Self) -> Self {
        assert!(self.order == replacement.order, "monomial order mismatch");
        let num_vars = self.num_vars.max(replacement.num_vars);
        let mut result = Self::zero(num_vars, self.order);

        for (m, c) in &self.terms {
            let e = m.exponent(var);
            let mut exps: Vec<u16> = (0..self.num_vars).map(|i| m.exponent(i)).collect();
            exps[var] = 0;
            let rest = PackedMonomial::new(&exps);

            let term = Self::new(vec![(rest, c.clone())], num_vars, self.order)
                .mul(&replacement.pow(u32::from(e)));
            result = result.add(&term);
        }

        result
    }

    /// Returns the greatest monomial dividing every term (the monomial
    /// content). Returns `None` for the zero polynomial.
    #[must_use]
    pub fn monomial_content(&self) -> Option<PackedMonomial> {
        let mut exps = vec![u16::MAX; self.num_vars];
        for (m, _) in &self.terms {
            for (i, e) in exps.iter_mut().enumerate() {
                *e = (*e).min(m.exponent(i));
            }
        }
        if self.is_zero() {
            None
        } else {
            Some(PackedMonomial::new(&exps))
        }
    }

    /// Divides every term by a monomial.
    ///
    /// # Panics
    ///
    /// Panics if some term is not divisible by `m`.
    #[must_use]
    pub fn div_monomial(&self, m: &PackedMonomial) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m2, c)| (m2.div(m).expect("term not divisible by content"), c.clone()))
                .collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Maps the coefficients into another ring.
    #[must_use]
    pub fn map_coeffs<S: Ring>(&self, f: impl Fn(&R) -> S) -> SparsePoly<S> {
        SparsePoly::new(
            self.terms.iter().map(|(m, c)| (*m, f(c))).collect(),
            self.num_vars,
            self.order,
        )
    }

    /// Evaluates the polynomial in another ring, mapping each coefficient
    /// through `embed` and each variable x_i to `args[i]`.
    #[must_use]
    pub fn evaluate_with<S: Ring>(&self, embed: impl Fn(&R) -> S, args: &[S]) -> S {
        let mut result = S::zero();
        for (m, c) in &self.terms {
            let mut term = embed(c);
            for (i, arg) in args.iter().enumerate() {
                let e = m.exponent(i);
                if e > 0 {
                    term = term * arg.pow(u32::from(e));
                }
            }
            result = result + term;
        }
        result
    }

    /// Evaluates the polynomial at a point in the coefficient ring.
    #[must_use]
    pub fn evaluate(&self, point: &[R]) -> R {
        self.evaluate_with(Clone::clone, point)
    }

    /// Renders the polynomial with the given variable names.
    #[must_use]
    pub fn to_string_with(&self, names: &[&str]) -> String
    where
        R: std::fmt::Display,
    {
        if self.is_zero() {
            return "0".to_string();
        }

        let parts: Vec<_> = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mon = m.to_string_with(names);
                if mon == "1" {
                    format!("{c}")
                } else if c.is_one() {
                    mon
                } else {
                    format!("{c}*{mon}")
                }
            })
            .collect();

        parts.join(" + ")
    }
}

impl<R: Field> SparsePoly<R> {
    /// Divides by the leading coefficient, making the polynomial monic.
    #[must_use]
    pub fn monic(&self) -> Self {
        match self.leading_coeff() {
            Some(lc) => {
                let inv = lc.inv().expect("leading coefficient is non-zero");
                self.scale(&inv)
            }
            None => self.clone(),
        }
    }

    /// Attempts exact division by another polynomial.
    ///
    /// Returns `Some(quotient)` when `self = quotient * divisor` exactly.
    #[must_use]
    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        assert!(!divisor.is_zero(), "division by the zero polynomial");
        let num_vars = self.num_vars.max(divisor.num_vars);
        let mut rem = self.widened(num_vars);
        let mut quot = Self::zero(num_vars, self.order);
        let (lm_d, lc_d) = divisor.leading_term().expect("divisor is non-zero");
        let lc_inv = lc_d.inv().expect("leading coefficient is non-zero");

        while !rem.is_zero() {
            let (lm_r, lc_r) = rem.leading_term().cloned().expect("non-zero remainder");
            let m = lm_r.div(lm_d)?;
            let c = lc_r * lc_inv.clone();
            let t = Self::new(vec![(m, c)], num_vars, self.order);
            rem = rem.sub(&t.mul(divisor));
            quot = quot.add(&t);
        }

        Some(quot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenichel_rings::rationals::Q;

    fn q(n: i64) -> Q {
        Q::from_integer(n)
    }

    #[test]
    fn binomial_square() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let one = SparsePoly::one(2, order);

        // (x + 1)^2 = x^2 + 2x + 1
        let sq = x.add(&one).pow(2);
        assert_eq!(sq.len(), 3);
        assert_eq!(sq.total_degree(), 2);
    }

    #[test]
    fn derivative_of_product() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        // d/dx (x^2 y + x) = 2xy + 1
        let p = x.pow(2).mul(&y).add(&x);
        let d = p.derivative(0);

        let expected = x
            .mul(&y)
            .scale(&q(2))
            .add(&SparsePoly::one(2, order));
        assert_eq!(d, expected);
    }

    #[test]
    fn substitution_replaces_variable() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        // (x^2 + y) with x := y + 1 gives y^2 + 3y + 1
        let p = x.pow(2).add(&y);
        let sub = p.substitute(0, &y.add(&SparsePoly::one(2, order)));

        let expected = y
            .pow(2)
            .add(&y.scale(&q(3)))
            .add(&SparsePoly::one(2, order));
        assert_eq!(sub, expected);
    }

    #[test]
    fn set_var_zero_drops_terms() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        let p = x.mul(&y).add(&y).add(&SparsePoly::one(2, order));
        let q0 = p.set_var_zero(0);
        assert_eq!(q0, y.add(&SparsePoly::one(2, order)));
    }

    #[test]
    fn coefficient_extraction() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        // x^2 y + 3x + y^2: coefficient of x^1 is 3, of x^2 is y
        let p = x.pow(2).mul(&y).add(&x.scale(&q(3))).add(&y.pow(2));
        assert_eq!(p.coeff_in(0, 1), SparsePoly::constant(q(3), 2, order));
        assert_eq!(p.coeff_in(0, 2), y);
        assert_eq!(p.coeff_in(0, 0), y.pow(2));
    }

    #[test]
    fn monomial_content_and_division() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        // x^2 y + x y^2 has content xy
        let p = x.pow(2).mul(&y).add(&x.mul(&y.pow(2)));
        let content = p.monomial_content().unwrap();
        assert_eq!(content, PackedMonomial::new(&[1, 1]));
        assert_eq!(p.div_monomial(&content), x.add(&y));
    }

    #[test]
    fn exact_division() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        // (x^2 - y^2) / (x - y) = x + y
        let p = x.pow(2).sub(&y.pow(2));
        let d = x.sub(&y);
        assert_eq!(p.div_exact(&d), Some(x.add(&y)));

        // x^2 + y is not divisible by x - y
        assert_eq!(x.pow(2).add(&y).div_exact(&d), None);
    }

    #[test]
    fn evaluation() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        // x^2 + 3y at (2, 1/3) = 5
        let p = x.pow(2).add(&y.scale(&q(3)));
        assert_eq!(p.evaluate(&[q(2), Q::new(1, 3)]), q(5));
    }
}
