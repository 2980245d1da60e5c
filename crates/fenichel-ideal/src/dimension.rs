//! Krull dimension of an ideal from its Gröbner basis.
//!
//! The dimension of V(I) equals the size of the largest subset S of the
//! ring variables such that no leading monomial of the reduced basis is
//! supported entirely inside S (a maximal independent set modulo the
//! leading-term ideal). With at most `MAX_VARS` variables the subsets are
//! walked exhaustively as bitmasks.

use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::traits::Field;

use crate::buchberger::basis_is_trivial;

/// Computes the dimension of the variety of the ideal with the given
/// reduced Gröbner basis.
///
/// Returns `None` for the trivial ideal (empty variety). The zero ideal
/// (empty basis) has dimension `num_vars`.
#[must_use]
pub fn dimension<R: Field>(gb: &[SparsePoly<R>], num_vars: usize) -> Option<usize> {
    if basis_is_trivial(gb) {
        return None;
    }

    if gb.is_empty() {
        return Some(num_vars);
    }

    // Support bitmask of each leading monomial
    let supports: Vec<u32> = gb
        .iter()
        .map(|p| {
            let lm = p.leading_monomial().expect("non-zero basis element");
            lm.support().iter().fold(0u32, |acc, &i| acc | (1 << i))
        })
        .collect();

    let mut best = 0usize;
    for mask in 0u32..(1 << num_vars) {
        let size = mask.count_ones() as usize;
        if size <= best {
            continue;
        }
        // S is independent when no leading-term support fits inside it
        let independent = supports.iter().all(|&s| s & !mask != 0);
        if independent {
            best = size;
        }
    }

    Some(best)
}
