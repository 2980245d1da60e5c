//! The field of rational numbers Q.
//!
//! Exact arbitrary-precision rationals over `dashu::rational::RBig`,
//! always stored in lowest terms with a positive denominator.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use dashu::base::{Abs, Inverse, Signed as DashuSigned, SquareRoot};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use num_traits::{One, Zero};

use crate::traits::{CommutativeRing, EuclideanDomain, Field, IntegralDomain, Ring};

/// An exact rational number.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Q(RBig);

impl Q {
    /// Creates a new rational from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "denominator cannot be zero");
        let num = IBig::from(numerator) * IBig::from(denominator.signum());
        let den = UBig::from(denominator.unsigned_abs());
        Self(RBig::from_parts(num, den))
    }

    /// Creates a rational from an integer.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self(RBig::from(n))
    }

    /// Returns the numerator as an `IBig`.
    #[must_use]
    pub fn numerator(&self) -> IBig {
        self.0.numerator().clone()
    }

    /// Returns the denominator as a `UBig`.
    #[must_use]
    pub fn denominator(&self) -> UBig {
        self.0.denominator().clone()
    }

    /// Returns the reciprocal (1/x).
    ///
    /// # Panics
    ///
    /// Panics if the rational is zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        assert!(!Ring::is_zero(self), "cannot take reciprocal of zero");
        Self(self.0.clone().inv())
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this rational is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Returns the inner `dashu::RBig`.
    #[must_use]
    pub fn into_inner(self) -> RBig {
        self.0
    }
}

impl Ring for Q {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl CommutativeRing for Q {}
impl IntegralDomain for Q {}

impl EuclideanDomain for Q {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        // In a field, division is exact, so the remainder is always zero
        (Self(self.0.clone() / other.0.clone()), Ring::zero())
    }

    fn gcd(&self, other: &Self) -> Self {
        // In a field, the gcd of any two non-zero elements is 1
        if Ring::is_zero(self) && Ring::is_zero(other) {
            Ring::zero()
        } else {
            Ring::one()
        }
    }
}

impl Field for Q {
    fn inv(&self) -> Option<Self> {
        if Ring::is_zero(self) {
            None
        } else {
            Some(self.recip())
        }
    }

    fn sqrt(&self) -> Option<Self> {
        if self.signum() < 0 {
            return None;
        }
        // Lowest terms: a square iff numerator and denominator are squares
        let num = self.0.numerator().sqrt();
        let den = self.0.denominator().sqrt();
        let root = Self(RBig::from_parts(IBig::from(num), den));
        if root.clone() * root.clone() == *self {
            Some(root)
        } else {
            None
        }
    }
}

impl Add for Q {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Q {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Q {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Neg for Q {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<i64> for Q {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Debug for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q({})", self.0)
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_laws() {
        let a = Q::new(2, 3);
        let b = Q::new(3, 4);

        // 2/3 + 3/4 = 17/12
        assert_eq!(a.clone() + b.clone(), Q::new(17, 12));

        // 2/3 * 3/4 = 1/2
        assert_eq!(a.clone() * b, Q::new(1, 2));

        // 2/3 * 3/2 = 1
        assert!(Ring::is_one(&(a.clone() * a.recip())));
    }

    #[test]
    fn negative_denominator_normalizes() {
        assert_eq!(Q::new(1, -2), Q::new(-1, 2));
        assert_eq!(Q::new(-3, -6), Q::new(1, 2));
    }

    #[test]
    fn inverse_of_zero_is_none() {
        assert!(Field::inv(&<Q as Ring>::zero()).is_none());
        assert_eq!(Field::inv(&Q::new(3, 5)), Some(Q::new(5, 3)));
    }

    #[test]
    fn square_roots() {
        assert_eq!(Field::sqrt(&Q::new(4, 9)), Some(Q::new(2, 3)));
        assert_eq!(Field::sqrt(&Q::from_integer(0)), Some(Q::from_integer(0)));
        assert_eq!(Field::sqrt(&Q::from_integer(2)), None);
        assert_eq!(Field::sqrt(&Q::from_integer(-4)), None);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Q::new(3, 1).to_string(), "3");
        assert_eq!(Q::new(2, 3).to_string(), "2/3");
        assert_eq!(Q::new(-2, 3).to_string(), "-2/3");
    }
}
