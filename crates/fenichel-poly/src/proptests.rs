//! Property-based tests for polynomial and rational-expression arithmetic.

use proptest::prelude::*;

use fenichel_rings::rationals::Q;
use fenichel_rings::traits::{Field, Ring};

use crate::gcd::poly_gcd;
use crate::monomial::PackedMonomial;
use crate::ordering::MonomialOrder;
use crate::ratio::RatioExpr;
use crate::sparse::SparsePoly;

const NUM_VARS: usize = 3;

// Strategy for small rational coefficients
fn small_coeff() -> impl Strategy<Value = Q> {
    (-20i64..20i64).prop_map(Q::from_integer)
}

// Strategy for small monomials in 3 variables
fn small_monomial() -> impl Strategy<Value = PackedMonomial> {
    proptest::collection::vec(0u16..3, NUM_VARS).prop_map(|exps| PackedMonomial::new(&exps))
}

// Strategy for small sparse polynomials
fn small_poly() -> impl Strategy<Value = SparsePoly<Q>> {
    proptest::collection::vec((small_monomial(), small_coeff()), 0..5)
        .prop_map(|terms| SparsePoly::new(terms, NUM_VARS, MonomialOrder::Grevlex))
}

fn nonzero_poly() -> impl Strategy<Value = SparsePoly<Q>> {
    small_poly().prop_filter("polynomial must be non-zero", |p| !p.is_zero())
}

proptest! {
    // Polynomial ring axioms

    #[test]
    fn poly_add_commutative(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn poly_add_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
        prop_assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
    }

    #[test]
    fn poly_mul_commutative(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(a.mul(&b), b.mul(&a));
    }

    #[test]
    fn poly_mul_distributes(a in small_poly(), b in small_poly(), c in small_poly()) {
        prop_assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
    }

    #[test]
    fn poly_sub_self_is_zero(a in small_poly()) {
        prop_assert!(a.sub(&a).is_zero());
    }

    // Derivatives

    #[test]
    fn derivative_is_linear(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(
            a.add(&b).derivative(0),
            a.derivative(0).add(&b.derivative(0))
        );
    }

    #[test]
    fn derivative_product_rule(a in small_poly(), b in small_poly()) {
        // (ab)' = a'b + ab'
        prop_assert_eq!(
            a.mul(&b).derivative(1),
            a.derivative(1).mul(&b).add(&a.mul(&b.derivative(1)))
        );
    }

    // Exact division round trip

    #[test]
    fn div_exact_round_trip(a in small_poly(), b in nonzero_poly()) {
        let prod = a.mul(&b);
        if let Some(q) = prod.div_exact(&b) {
            prop_assert_eq!(q.mul(&b), prod);
        } else {
            // Products are always exactly divisible by a factor
            prop_assert!(false, "product not divisible by its factor");
        }
    }

    // Gcd

    #[test]
    fn gcd_divides_both(a in small_poly(), b in small_poly()) {
        let g = poly_gcd(&a, &b);
        if !g.is_zero() {
            prop_assert!(a.div_exact(&g).is_some());
            prop_assert!(b.div_exact(&g).is_some());
        }
    }

    #[test]
    fn gcd_finds_common_factor(a in nonzero_poly(), b in nonzero_poly(), c in nonzero_poly()) {
        let g = poly_gcd(&a.mul(&c), &b.mul(&c));
        prop_assert!(g.div_exact(&c).is_some());
    }

    // Rational expression field laws

    #[test]
    fn ratio_is_stored_in_lowest_terms(a in small_poly(), b in nonzero_poly()) {
        let r = RatioExpr::new(a, b);
        let g = poly_gcd(r.numerator(), r.denominator());
        prop_assert!(g.is_constant());
    }

    #[test]
    fn ratio_add_commutative(a in small_poly(), b in nonzero_poly(), c in small_poly(), d in nonzero_poly()) {
        let x = RatioExpr::new(a, b);
        let y = RatioExpr::new(c, d);
        prop_assert_eq!(x.clone() + y.clone(), y + x);
    }

    #[test]
    fn ratio_mul_inverse(a in nonzero_poly(), b in nonzero_poly()) {
        let x = RatioExpr::new(a, b);
        let inv = Field::inv(&x).unwrap();
        prop_assert!(Ring::is_one(&(x * inv)));
    }

    #[test]
    fn ratio_add_neg_is_zero(a in small_poly(), b in nonzero_poly()) {
        let x = RatioExpr::new(a, b);
        prop_assert!(Ring::is_zero(&(x.clone() + (-x))));
    }
}
