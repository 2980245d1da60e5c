//! Multivariate polynomial gcd and perfect-square roots.
//!
//! The gcd uses a primitive pseudo-remainder sequence: pick the highest
//! variable appearing in both operands, split each into content and
//! primitive part with respect to it, run pseudo-division on the primitive
//! parts, and recurse on the contents. Taking primitive parts between
//! division steps keeps intermediate coefficients small, which matters when
//! the coefficient field is itself a rational-function field.
//!
//! Results are monic, so the gcd is a canonical representative of its
//! associate class.

use fenichel_rings::traits::{Field, Ring};

use crate::sparse::SparsePoly;

/// Computes the monic greatest common divisor of two polynomials.
///
/// The gcd of anything with zero is the other argument made monic; two
/// polynomials with no variable in common (in particular non-zero
/// constants) have gcd 1, since constants are units over a field.
#[must_use]
pub fn poly_gcd<R: Field>(a: &SparsePoly<R>, b: &SparsePoly<R>) -> SparsePoly<R> {
    assert!(a.order() == b.order(), "monomial order mismatch");
    let num_vars = a.num_vars().max(b.num_vars());

    if a.is_zero() {
        return b.widened(num_vars).monic();
    }
    if b.is_zero() {
        return a.widened(num_vars).monic();
    }
    if a.is_constant() || b.is_constant() {
        return SparsePoly::one(num_vars, a.order());
    }

    let Some(v) = shared_variable(a, b, num_vars) else {
        return SparsePoly::one(num_vars, a.order());
    };

    let (cont_a, prim_a) = content_and_primitive(&a.widened(num_vars), v);
    let (cont_b, prim_b) = content_and_primitive(&b.widened(num_vars), v);
    let cont = poly_gcd(&cont_a, &cont_b);

    let (mut f, mut g) = if prim_a.degree_in(v) >= prim_b.degree_in(v) {
        (prim_a, prim_b)
    } else {
        (prim_b, prim_a)
    };

    loop {
        let r = pseudo_rem(&f, &g, v);
        if r.is_zero() {
            break;
        }
        let (_, prim_r) = content_and_primitive(&r, v);
        f = g;
        g = prim_r;
    }

    cont.mul(&g).monic()
}

/// Computes an exact square root of a polynomial, if it has one.
///
/// Returns `None` when the polynomial is not a perfect square over the
/// coefficient field (which in turn relies on `Field::sqrt` for the
/// constant part).
#[must_use]
pub fn poly_sqrt<R: Field>(p: &SparsePoly<R>) -> Option<SparsePoly<R>> {
    if p.is_zero() {
        return Some(p.clone());
    }
    if p.is_constant() {
        let c = p.leading_coeff().expect("non-zero constant").sqrt()?;
        return Some(SparsePoly::constant(c, p.num_vars(), p.order()));
    }

    let v = (0..p.num_vars()).rev().find(|&v| p.degree_in(v) > 0)?;
    if p.degree_in(v) % 2 != 0 {
        return None;
    }

    // For p = s^2, gcd(p, dp/dv) = s * gcd(s, ds/dv) up to a constant, so
    // p / gcd is the part of s without repeated factors. Squaring it out
    // leaves a smaller perfect square to recurse on.
    let t = poly_gcd(p, &p.derivative(v));
    let rad = p.div_exact(&t)?;
    let rest = p.div_exact(&rad.mul(&rad))?;
    let candidate = rad.mul(&poly_sqrt(&rest)?);

    // The descent is only a heuristic for non-squares, so verify exactly.
    let scale = p.div_exact(&candidate.mul(&candidate))?;
    if !scale.is_constant() {
        return None;
    }
    let c = scale.leading_coeff().expect("non-zero quotient").sqrt()?;
    Some(candidate.scale(&c))
}

fn shared_variable<R: Ring>(
    a: &SparsePoly<R>,
    b: &SparsePoly<R>,
    num_vars: usize,
) -> Option<usize> {
    (0..num_vars)
        .rev()
        .find(|&v| a.degree_in(v) > 0 && b.degree_in(v) > 0)
}

/// Splits `p` into its content and primitive part with respect to `v`: the
/// content is the gcd of the coefficients of the powers of `v`.
fn content_and_primitive<R: Field>(
    p: &SparsePoly<R>,
    v: usize,
) -> (SparsePoly<R>, SparsePoly<R>) {
    let mut cont = SparsePoly::zero(p.num_vars(), p.order());
    for power in 0..=p.degree_in(v) {
        let coeff = p.coeff_in(v, power);
        if !coeff.is_zero() {
            cont = poly_gcd(&cont, &coeff);
        }
        if cont.is_constant() && !cont.is_zero() {
            break;
        }
    }
    let prim = p.div_exact(&cont).expect("content divides every term");
    (cont, prim)
}

/// One full pseudo-remainder: eliminates the leading power of `v` from `f`
/// by cross-multiplying with the leading `v`-coefficient of `g`.
fn pseudo_rem<R: Field>(f: &SparsePoly<R>, g: &SparsePoly<R>, v: usize) -> SparsePoly<R> {
    let n = g.degree_in(v);
    let lc_g = g.coeff_in(v, n);
    let mut r = f.clone();

    while !r.is_zero() && r.degree_in(v) >= n {
        let d = r.degree_in(v);
        let lr = r.coeff_in(v, d);
        let shift = SparsePoly::var(v, r.num_vars(), r.order()).pow(u32::from(d - n));
        r = r.mul(&lc_g).sub(&g.mul(&lr).mul(&shift));
    }

    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::MonomialOrder;
    use fenichel_rings::rationals::Q;

    fn q(n: i64) -> Q {
        Q::from_integer(n)
    }

    fn x() -> SparsePoly<Q> {
        SparsePoly::var(0, 2, MonomialOrder::Grevlex)
    }

    fn y() -> SparsePoly<Q> {
        SparsePoly::var(1, 2, MonomialOrder::Grevlex)
    }

    #[test]
    fn univariate_common_root() {
        // gcd(x^2 - 1, x^2 - 2x + 1) = x - 1
        let one = SparsePoly::one(2, MonomialOrder::Grevlex);
        let a = x().pow(2).sub(&one);
        let b = x().pow(2).sub(&x().scale(&q(2))).add(&one);
        assert_eq!(poly_gcd(&a, &b), x().sub(&one));
    }

    #[test]
    fn multivariate_common_factor() {
        // gcd((x+y)x, (x+y)y) = x + y
        let common = x().add(&y());
        let a = common.mul(&x());
        let b = common.mul(&y());
        assert_eq!(poly_gcd(&a, &b), common);
    }

    #[test]
    fn coprime_polynomials() {
        let one = SparsePoly::one(2, MonomialOrder::Grevlex);
        assert_eq!(poly_gcd(&x().add(&one), &y()), one);
        assert_eq!(
            poly_gcd(&SparsePoly::constant(q(6), 2, MonomialOrder::Grevlex), &x()),
            one
        );
    }

    #[test]
    fn gcd_with_zero() {
        let zero = SparsePoly::zero(2, MonomialOrder::Grevlex);
        let p = x().scale(&q(3)).add(&y());
        assert_eq!(poly_gcd(&p, &zero), p.monic());
        assert_eq!(poly_gcd(&zero, &zero), zero);
    }

    #[test]
    fn sqrt_of_binomial_square() {
        let p = x().add(&y());
        let root = poly_sqrt(&p.mul(&p)).unwrap();
        assert_eq!(root.mul(&root), p.mul(&p));
    }

    #[test]
    fn sqrt_of_fourth_power() {
        let p = x().pow(4);
        let root = poly_sqrt(&p).unwrap();
        assert_eq!(root.mul(&root), p);
    }

    #[test]
    fn sqrt_of_scaled_square() {
        // 9(x - y)^2 has root 3(x - y) up to sign
        let p = x().sub(&y()).pow(2).scale(&q(9));
        let root = poly_sqrt(&p).unwrap();
        assert_eq!(root.mul(&root), p);
    }

    #[test]
    fn sqrt_rejects_non_squares() {
        let one = SparsePoly::one(2, MonomialOrder::Grevlex);
        assert!(poly_sqrt(&x().pow(2).add(&one)).is_none());
        assert!(poly_sqrt(&x()).is_none());
        assert!(poly_sqrt(&x().pow(2).scale(&q(2))).is_none());
    }
}
