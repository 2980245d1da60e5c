//! Decomposition of a variety into components.
//!
//! The splitting engine walks a worklist of generator systems. A reduced
//! Gröbner basis element can split a branch three ways: a non-trivial
//! monomial content m * q splits V(m*q) into the coordinate hyperplanes of
//! m's variables and V(q); a non-trivial gcd with a partial derivative
//! splits off a repeated or variable-disjoint factor; and a generator
//! quadratic in some variable with a constant leading coefficient splits
//! into its two linear factors when the discriminant is a perfect square.
//! Trivial branches (unit ideals) are pruned, and redundant branches are
//! merged by mutual ideal containment, so the surviving components are
//! reduced and pairwise incomparable. Each component carries its dimension.
//!
//! This detects exactly the splits visible in the generators' factor
//! structure; it does not attempt a full primary decomposition.

use fenichel_poly::gcd::{poly_gcd, poly_sqrt};
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::traits::{Field, Ring};

use crate::buchberger::{basis_is_trivial, groebner_basis, normal_form};
use crate::dimension::dimension;

/// A component of a variety: a reduced Gröbner basis and the component's
/// dimension.
#[derive(Clone, Debug)]
pub struct Component<R: Field> {
    /// Reduced Gröbner basis of the component's ideal.
    pub generators: Vec<SparsePoly<R>>,
    /// Dimension of the component.
    pub dimension: usize,
}

/// Upper bound on branch expansions; beyond it, branches are emitted
/// unsplit rather than risking unbounded recursion on adversarial input.
const MAX_SPLITS: usize = 4096;

/// Decomposes the variety of the given generators into components.
///
/// The empty variety yields no components. The result is deterministic:
/// components are sorted by descending dimension, then by their generator
/// lists.
#[must_use]
pub fn decompose<R>(gens: &[SparsePoly<R>], num_vars: usize) -> Vec<Component<R>>
where
    R: Field + Send + Sync,
{
    let mut worklist: Vec<Vec<SparsePoly<R>>> = vec![gens.to_vec()];
    let mut finished: Vec<Vec<SparsePoly<R>>> = Vec::new();
    let mut splits = 0usize;

    while let Some(system) = worklist.pop() {
        let gb = groebner_basis(&system);

        if basis_is_trivial(&gb) {
            continue;
        }
        if gb.is_empty() {
            finished.push(gb);
            continue;
        }

        match find_split(&gb, num_vars) {
            Some(branches) if splits < MAX_SPLITS => {
                splits += branches.len();
                worklist.extend(branches);
            }
            _ => finished.push(gb),
        }
    }

    let merged = merge_components(finished);

    let mut components: Vec<Component<R>> = merged
        .into_iter()
        .map(|gb| {
            let dim = dimension(&gb, num_vars).expect("trivial branches were pruned");
            Component {
                generators: gb,
                dimension: dim,
            }
        })
        .collect();

    components.sort_by(|a, b| {
        b.dimension
            .cmp(&a.dimension)
            .then_with(|| component_key(a).cmp(&component_key(b)))
    });
    components
}

/// Finds the first basis element whose factor structure induces a split
/// and returns the branch systems.
fn find_split<R: Field>(
    gb: &[SparsePoly<R>],
    num_vars: usize,
) -> Option<Vec<Vec<SparsePoly<R>>>> {
    for (idx, p) in gb.iter().enumerate() {
        if let Some(branches) = content_branches(p, idx, gb, num_vars) {
            return Some(branches);
        }
        if let Some((f1, f2)) = product_factors(p, num_vars) {
            let mut b1 = gb.to_vec();
            b1[idx] = f1;
            let mut b2 = gb.to_vec();
            b2[idx] = f2;
            return Some(vec![b1, b2]);
        }
    }
    None
}

/// Splits on a non-trivial monomial content m * q: one branch per variable
/// of m plus the cofactor branch V(q).
fn content_branches<R: Field>(
    p: &SparsePoly<R>,
    idx: usize,
    gb: &[SparsePoly<R>],
    num_vars: usize,
) -> Option<Vec<Vec<SparsePoly<R>>>> {
    let content = p.monomial_content()?;
    if content.is_one() {
        return None;
    }

    let mut branches = Vec::new();

    for v in content.support() {
        let mut branch = gb.to_vec();
        branch[idx] = SparsePoly::var(v, num_vars, p.order());
        branches.push(branch);
    }

    // The content-free cofactor branch, unless p was a single term
    let cofactor = p.div_monomial(&content);
    if !cofactor.is_constant() {
        let mut branch = gb.to_vec();
        branch[idx] = cofactor;
        branches.push(branch);
    }

    // A bare variable generator reproduces itself; that is not a split
    if branches.iter().any(|b| b == gb) {
        return None;
    }

    Some(branches)
}

/// Writes `p` as a product of two non-constant factors, when one is
/// visible.
///
/// Two rules apply. A non-trivial gcd with a partial derivative pulls out
/// repeated factors and factors not involving that variable. Failing that,
/// a generator quadratic in some variable with a constant leading
/// coefficient factors through the quadratic formula whenever its
/// discriminant is a perfect square over the coefficient field; requiring
/// an exact square keeps irreducible conjugate pairs together.
fn product_factors<R: Field>(
    p: &SparsePoly<R>,
    num_vars: usize,
) -> Option<(SparsePoly<R>, SparsePoly<R>)> {
    for v in 0..num_vars {
        if p.degree_in(v) == 0 {
            continue;
        }
        let t = poly_gcd(p, &p.derivative(v));
        if t.is_constant() {
            continue;
        }
        if let Some(cofactor) = p.div_exact(&t) {
            if !cofactor.is_constant() {
                return Some((t, cofactor.monic()));
            }
        }
    }

    for v in 0..num_vars {
        if p.degree_in(v) != 2 {
            continue;
        }
        let lead = p.coeff_in(v, 2);
        if !lead.is_constant() {
            continue;
        }
        let a = lead.leading_coeff().expect("degree-two coefficient").clone();
        let b = p.coeff_in(v, 1);
        let c = p.coeff_in(v, 0);

        // 4a * p = (2a*v + b)^2 - (b^2 - 4ac)
        let disc = b.mul(&b).sub(&c.scale(&a.mul_by_scalar(4)));
        let Some(d) = poly_sqrt(&disc) else {
            continue;
        };

        let lin = SparsePoly::var(v, p.num_vars(), p.order())
            .scale(&a.mul_by_scalar(2))
            .add(&b);
        return Some((lin.sub(&d).monic(), lin.add(&d).monic()));
    }

    None
}

/// Removes branches whose variety is contained in another branch's variety
/// and collapses duplicates.
fn merge_components<R: Field + Send + Sync>(
    branches: Vec<Vec<SparsePoly<R>>>,
) -> Vec<Vec<SparsePoly<R>>> {
    let mut keep = vec![true; branches.len()];

    for i in 0..branches.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..branches.len() {
            if i == j || !keep[j] || !keep[i] {
                continue;
            }
            // V(i) ⊆ V(j) iff every generator of j reduces to zero mod i
            let j_inside_i = branches[j]
                .iter()
                .all(|g| normal_form(g, &branches[i]).is_zero());
            if !j_inside_i {
                continue;
            }
            let i_inside_j = branches[i]
                .iter()
                .all(|g| normal_form(g, &branches[j]).is_zero());
            if i_inside_j {
                // Equal varieties: keep the smaller index
                if i < j {
                    keep[j] = false;
                } else {
                    keep[i] = false;
                }
            } else {
                // V(i) strictly inside V(j): i is redundant
                keep[i] = false;
            }
        }
    }

    branches
        .into_iter()
        .zip(keep)
        .filter_map(|(b, k)| if k { Some(b) } else { None })
        .collect()
}

/// Deterministic sort key for a component.
fn component_key<R: Field>(c: &Component<R>) -> Vec<Vec<u16>> {
    c.generators
        .iter()
        .filter_map(|p| p.leading_monomial())
        .map(|m| m.exponents().to_vec())
        .collect()
}
