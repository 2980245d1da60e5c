//! Multivariate rational expressions.
//!
//! A `RatioExpr` is a quotient of two sparse polynomials over Q, kept in
//! lowest terms: normalization first cancels the common monomial content,
//! then divides out the full polynomial gcd, and keeps the denominator
//! monic. Reducing eagerly is what keeps coefficient growth in check when
//! these expressions serve as the field Q(parameters) inside long Gröbner
//! basis runs. Equality is still decided by cross-multiplication.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use fenichel_rings::rationals::Q;
use fenichel_rings::traits::{CommutativeRing, EuclideanDomain, Field, IntegralDomain, Ring};

use crate::gcd::{poly_gcd, poly_sqrt};
use crate::monomial::PackedMonomial;
use crate::ordering::MonomialOrder;
use crate::sparse::SparsePoly;

const ORDER: MonomialOrder = MonomialOrder::Grevlex;

/// A rational expression num/den over Q in several variables.
///
/// # Invariants
///
/// - `den` is never the zero polynomial
/// - zero is represented as 0/1
/// - `num` and `den` have no common polynomial factor
/// - `den` is monic
#[derive(Clone, Debug)]
pub struct RatioExpr {
    num: SparsePoly<Q>,
    den: SparsePoly<Q>,
}

impl RatioExpr {
    /// Creates a rational expression from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(num: SparsePoly<Q>, den: SparsePoly<Q>) -> Self {
        assert!(!den.is_zero(), "denominator cannot be zero");
        let mut r = Self { num, den };
        r.normalize();
        r
    }

    /// Creates a rational expression from a polynomial (denominator 1).
    #[must_use]
    pub fn from_poly(p: SparsePoly<Q>) -> Self {
        let n = p.num_vars();
        Self {
            num: p,
            den: SparsePoly::one(n, ORDER),
        }
    }

    /// Creates a constant rational expression.
    #[must_use]
    pub fn constant(c: Q) -> Self {
        Self::from_poly(SparsePoly::constant(c, 0, ORDER))
    }

    /// Creates the variable x_i as a rational expression.
    #[must_use]
    pub fn var(i: usize, num_vars: usize) -> Self {
        Self::from_poly(SparsePoly::var(i, num_vars, ORDER))
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> &SparsePoly<Q> {
        &self.num
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> &SparsePoly<Q> {
        &self.den
    }

    /// Returns true if the denominator is 1.
    #[must_use]
    pub fn is_polynomial(&self) -> bool {
        self.den.is_constant()
    }

    /// Evaluates at a rational point.
    ///
    /// Returns `None` if the denominator vanishes at the point.
    #[must_use]
    pub fn evaluate(&self, point: &[Q]) -> Option<Q> {
        let d = self.den.evaluate(point);
        let n = self.num.evaluate(point);
        d.inv().map(|di| n * di)
    }

    /// Renders the expression with the given variable names.
    #[must_use]
    pub fn to_string_with(&self, names: &[&str]) -> String {
        if self.is_polynomial() {
            self.num.to_string_with(names)
        } else {
            format!(
                "({}) / ({})",
                self.num.to_string_with(names),
                self.den.to_string_with(names)
            )
        }
    }

    fn normalize(&mut self) {
        if self.num.is_zero() {
            self.den = SparsePoly::one(self.den.num_vars(), ORDER);
            return;
        }

        // Cancel the common monomial content
        if let (Some(cn), Some(cd)) = (self.num.monomial_content(), self.den.monomial_content()) {
            let n = self.num.num_vars().max(self.den.num_vars());
            let common: Vec<u16> = (0..n).map(|i| cn.exponent(i).min(cd.exponent(i))).collect();
            let common = PackedMonomial::new(&common);
            if !common.is_one() {
                self.num = self.num.div_monomial(&common);
                self.den = self.den.div_monomial(&common);
            }
        }

        // Divide out the full polynomial gcd
        let g = poly_gcd(&self.num, &self.den);
        if !g.is_constant() {
            self.num = self.num.div_exact(&g).expect("gcd divides the numerator");
            self.den = self.den.div_exact(&g).expect("gcd divides the denominator");
        }

        // Keep the denominator monic
        if let Some(lc) = self.den.leading_coeff() {
            if !lc.is_one() {
                let inv = lc.inv().expect("denominator is non-zero");
                self.num = self.num.scale(&inv);
                self.den = self.den.scale(&inv);
            }
        }
    }
}

impl PartialEq for RatioExpr {
    fn eq(&self, other: &Self) -> bool {
        // a/b == c/d  iff  a*d == c*b, exactly
        self.num.mul(&other.den) == other.num.mul(&self.den)
    }
}

impl Eq for RatioExpr {}

impl Ring for RatioExpr {
    fn zero() -> Self {
        Self {
            num: SparsePoly::zero(0, ORDER),
            den: SparsePoly::one(0, ORDER),
        }
    }

    fn one() -> Self {
        Self {
            num: SparsePoly::one(0, ORDER),
            den: SparsePoly::one(0, ORDER),
        }
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    fn is_one(&self) -> bool {
        self.num == self.den
    }
}

impl CommutativeRing for RatioExpr {}
impl IntegralDomain for RatioExpr {}

impl EuclideanDomain for RatioExpr {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        // Division in a field is exact
        let inv = other.inv().expect("division by zero rational expression");
        (self.clone() * inv, Ring::zero())
    }

    fn gcd(&self, other: &Self) -> Self {
        if Ring::is_zero(self) && Ring::is_zero(other) {
            Ring::zero()
        } else {
            Ring::one()
        }
    }
}

impl Field for RatioExpr {
    fn inv(&self) -> Option<Self> {
        if Ring::is_zero(self) {
            None
        } else {
            Some(Self::new(self.den.clone(), self.num.clone()))
        }
    }

    fn sqrt(&self) -> Option<Self> {
        // In lowest terms, a quotient is a square iff both parts are
        let num = poly_sqrt(&self.num)?;
        let den = poly_sqrt(&self.den)?;
        Some(Self::new(num, den))
    }
}

impl Add for RatioExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let num = self.num.mul(&rhs.den).add(&rhs.num.mul(&self.den));
        let den = self.den.mul(&rhs.den);
        Self::new(num, den)
    }
}

impl Sub for RatioExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for RatioExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.num.mul(&rhs.num), self.den.mul(&rhs.den))
    }
}

impl Neg for RatioExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            num: self.num.neg(),
            den: self.den,
        }
    }
}

impl fmt::Display for RatioExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.num.num_vars().max(self.den.num_vars());
        let names: Vec<String> = (0..n).map(|i| format!("x{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        write!(f, "{}", self.to_string_with(&refs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64) -> Q {
        Q::from_integer(n)
    }

    fn x() -> RatioExpr {
        RatioExpr::var(0, 2)
    }

    fn y() -> RatioExpr {
        RatioExpr::var(1, 2)
    }

    #[test]
    fn add_over_common_denominator() {
        // 1/x + 1/y = (x + y)/(xy)
        let a = x().inv().unwrap();
        let b = y().inv().unwrap();
        let sum = a + b;

        let expected = RatioExpr::new(
            SparsePoly::var(0, 2, ORDER).add(&SparsePoly::var(1, 2, ORDER)),
            SparsePoly::var(0, 2, ORDER).mul(&SparsePoly::var(1, 2, ORDER)),
        );
        assert_eq!(sum, expected);
    }

    #[test]
    fn equality_by_cross_multiplication() {
        // x/(x^2) == 1/x
        let xp = SparsePoly::<Q>::var(0, 1, ORDER);
        let a = RatioExpr::new(xp.clone(), xp.mul(&xp));
        let b = RatioExpr::new(SparsePoly::one(1, ORDER), xp);
        assert_eq!(a, b);
    }

    #[test]
    fn common_factor_cancels() {
        // (x+y)x / ((x+y)y) is stored as x/y, not just equal to it
        let xp = SparsePoly::<Q>::var(0, 2, ORDER);
        let yp = SparsePoly::<Q>::var(1, 2, ORDER);
        let common = xp.add(&yp);
        let r = RatioExpr::new(common.mul(&xp), common.mul(&yp));
        assert_eq!(r.numerator(), &xp);
        assert_eq!(r.denominator(), &yp);
    }

    #[test]
    fn arithmetic_stays_in_lowest_terms() {
        // x/(x+y) + y/(x+y) = 1 with the squared denominator cancelled
        let xp = SparsePoly::<Q>::var(0, 2, ORDER);
        let yp = SparsePoly::<Q>::var(1, 2, ORDER);
        let den = xp.add(&yp);
        let sum = RatioExpr::new(xp, den.clone()) + RatioExpr::new(yp, den);
        assert!(Ring::is_one(&sum));
        assert!(sum.denominator().is_constant());
    }

    #[test]
    fn square_roots_of_quotients() {
        // ((x+y)/x)^2 has a square root that squares back
        let r = RatioExpr::new(
            SparsePoly::var(0, 2, ORDER).add(&SparsePoly::var(1, 2, ORDER)),
            SparsePoly::var(0, 2, ORDER),
        );
        let sq = r.clone() * r.clone();
        let root = Field::sqrt(&sq).unwrap();
        assert_eq!(root.clone() * root, sq);

        assert!(Field::sqrt(&x()).is_none());
        assert_eq!(Field::sqrt(&RatioExpr::zero()), Some(RatioExpr::zero()));
    }

    #[test]
    fn exact_division_collapses() {
        // (x^2 - y^2)/(x - y) normalizes to the polynomial x + y
        let xp = SparsePoly::<Q>::var(0, 2, ORDER);
        let yp = SparsePoly::<Q>::var(1, 2, ORDER);
        let r = RatioExpr::new(xp.pow(2).sub(&yp.pow(2)), xp.sub(&yp));
        assert!(r.is_polynomial());
        assert_eq!(r, RatioExpr::from_poly(xp.add(&yp)));
    }

    #[test]
    fn field_inverse() {
        let r = x() * y().inv().unwrap();
        let prod = r.clone() * r.inv().unwrap();
        assert!(Ring::is_one(&prod));
    }

    #[test]
    fn evaluation_detects_poles() {
        // 1/(x - 1) at x = 1 is a pole
        let xp = SparsePoly::<Q>::var(0, 1, ORDER);
        let r = RatioExpr::new(
            SparsePoly::one(1, ORDER),
            xp.sub(&SparsePoly::one(1, ORDER)),
        );
        assert_eq!(r.evaluate(&[q(1)]), None);
        assert_eq!(r.evaluate(&[q(3)]), Some(Q::new(1, 2)));
    }
}
