//! Conversions between the combined ring and the state ring over the
//! parameter field.
//!
//! Most of the engine works in two pictures of the same object. The
//! combined ring Q[x, π] keeps parameters as ring variables, which the
//! general search and cleared-denominator generators need. The state ring
//! K[x] over the parameter field K = Q(π) treats parameters as
//! coefficients, which is where rank conditions and variety decomposition
//! happen. Parameter indices shift by the number of states between the two
//! pictures.

use fenichel_poly::monomial::PackedMonomial;
use fenichel_poly::ratio::RatioExpr;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::rationals::Q;

use crate::model::ORDER;

/// Reinterprets a combined-ring polynomial as a state-ring polynomial over
/// the parameter field. State exponents become the monomials; parameter
/// exponents move into the coefficients, reindexed to 0..m.
pub(crate) fn to_param_field(p: &SparsePoly<Q>, n: usize, m: usize) -> SparsePoly<RatioExpr> {
    let terms = p
        .terms()
        .iter()
        .map(|(mono, c)| {
            let state: Vec<u16> = (0..n).map(|i| mono.exponent(i)).collect();
            let params: Vec<u16> = (0..m).map(|j| mono.exponent(n + j)).collect();
            let coeff = SparsePoly::new(
                vec![(PackedMonomial::new(&params), c.clone())],
                m,
                ORDER,
            );
            (PackedMonomial::new(&state), RatioExpr::from_poly(coeff))
        })
        .collect();
    SparsePoly::new(terms, n, ORDER)
}

/// Embeds a parameter-block polynomial (variables 0..m) into the combined
/// ring, shifting its variables to n..n+m.
pub(crate) fn embed_params(p: &SparsePoly<Q>, n: usize, m: usize) -> SparsePoly<Q> {
    let terms = p
        .terms()
        .iter()
        .map(|(mono, c)| {
            let mut exps = vec![0u16; n + m];
            for j in 0..m {
                exps[n + j] = mono.exponent(j);
            }
            (PackedMonomial::new(&exps), c.clone())
        })
        .collect();
    SparsePoly::new(terms, n + m, ORDER)
}

/// Clears the parameter-field denominators of a state-ring polynomial,
/// producing a combined-ring polynomial with the same variety away from
/// the vanishing locus of the denominators.
///
/// The common multiple is the product of the distinct denominators, so a
/// basis whose coefficients share one denominator picks up a single factor.
pub(crate) fn clear_denominators(
    p: &SparsePoly<RatioExpr>,
    n: usize,
    m: usize,
) -> SparsePoly<Q> {
    let mut dens: Vec<SparsePoly<Q>> = Vec::new();
    for (_, c) in p.terms() {
        if c.denominator().is_constant() {
            continue;
        }
        if !dens.iter().any(|d| d == c.denominator()) {
            dens.push(c.denominator().clone());
        }
    }
    let mut common = SparsePoly::one(m, ORDER);
    for d in &dens {
        common = common.mul(d);
    }

    let mut out = SparsePoly::zero(n + m, ORDER);
    for (mono, c) in p.terms() {
        let cofactor = common
            .div_exact(c.denominator())
            .expect("common multiple is divisible by each denominator");
        let coeff = c.numerator().mul(&cofactor);

        let mut exps = vec![0u16; n + m];
        for i in 0..n {
            exps[i] = mono.exponent(i);
        }
        let state = PackedMonomial::new(&exps);

        let mut embedded = embed_params(&coeff, n, m);
        embedded = embedded.mul_term(&state, &Q::from_integer(1));
        out = out.add(&embedded);
    }
    out
}
