//! Slow manifold parametrizations.
//!
//! A manifold names s free state coordinates and expresses every state as
//! a rational function of the free ones and the parameters. The extractor
//! is a heuristic for components whose cleared-denominator generators are
//! jointly affine in some choice of n-s dependent states: such a system is
//! linear in the dependent block and Cramer's rule solves it exactly.
//! Dependent sets are tried by how often their variables occur linearly,
//! preferring the set the generators constrain most, and every solution is
//! verified by back-substitution before it is accepted. When no choice
//! verifies, the extractor reports failure and callers may assert a
//! parametrization of their own.

use fenichel_poly::monomial::PackedMonomial;
use fenichel_poly::ratio::RatioExpr;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::rationals::Q;
use fenichel_rings::traits::Ring;

use crate::linalg::{combinations, det};
use crate::model::{Model, ORDER};
use crate::variety::Variety;

/// A parametrization of one variety component by s free states.
#[derive(Debug, Clone)]
pub struct Manifold {
    component: usize,
    free: Vec<usize>,
    map: Vec<RatioExpr>,
    asserted: bool,
}

impl Manifold {
    /// Wraps a caller-supplied parametrization without verifying it.
    ///
    /// `map` must have one entry per state, in the combined ring, and the
    /// entries at the `free` indices must be the matching state variables.
    #[must_use]
    pub fn asserted(component: usize, free: Vec<usize>, map: Vec<RatioExpr>) -> Self {
        Self {
            component,
            free,
            map,
            asserted: true,
        }
    }

    /// Index of the variety component this manifold parametrizes.
    #[must_use]
    pub fn component(&self) -> usize {
        self.component
    }

    /// The free state coordinates, ascending.
    #[must_use]
    pub fn free_coordinates(&self) -> &[usize] {
        &self.free
    }

    /// One expression per state in the combined ring; free states map to
    /// themselves.
    #[must_use]
    pub fn parametrization(&self) -> &[RatioExpr] {
        &self.map
    }

    /// Returns true for caller-supplied, unverified parametrizations.
    #[must_use]
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Substitution arguments for the combined ring: states map through
    /// the parametrization, parameters map to themselves.
    pub(crate) fn substitution_args(&self, n: usize, m: usize) -> Vec<RatioExpr> {
        let mut args = self.map.clone();
        args.extend((0..m).map(|j| RatioExpr::var(n + j, n + m)));
        debug_assert_eq!(args.len(), n + m);
        args
    }

    /// Renders the dependent states with the model's names.
    #[must_use]
    pub fn describe(&self, model: &Model) -> String {
        let names = model.symbol_names();
        let lines: Vec<String> = (0..model.num_states())
            .filter(|i| !self.free.contains(i))
            .map(|i| format!("{} = {}", names[i], self.map[i].to_string_with(&names)))
            .collect();
        lines.join("\n")
    }
}

/// Attempts to parametrize a component of the variety by s of the states.
///
/// Returns the manifold and whether it was verified. On failure the
/// returned manifold is a trivial unverified placeholder keeping the
/// lexicographically first states free.
///
/// # Panics
///
/// Panics if `component` is out of bounds.
#[must_use]
pub fn extract_manifold(
    model: &Model,
    variety: &Variety,
    component: usize,
) -> (Manifold, bool) {
    let comp = &variety.components()[component];
    let n = model.num_states();
    let m = model.num_params();
    let dim = comp.dimension();

    if dim >= n {
        // The whole state space: the identity parametrization
        let map = (0..n).map(|i| RatioExpr::var(i, n + m)).collect();
        return (
            Manifold {
                component,
                free: (0..n).collect(),
                map,
                asserted: false,
            },
            true,
        );
    }

    let gens = comp.combined_generators();
    let k = n - dim;

    // Candidate dependent sets, most-constrained first; ties resolve
    // lexicographically because combinations() is lexicographic and the
    // sort is stable
    let mut choices: Vec<(usize, Vec<usize>)> = combinations(n, k)
        .into_iter()
        .filter(|dep| jointly_affine(gens, dep))
        .map(|dep| (linear_occurrences(gens, &dep), dep))
        .collect();
    choices.sort_by(|a, b| b.0.cmp(&a.0));

    let mut fallback: Option<Manifold> = None;

    for (_, dep) in choices {
        let Some(map) = solve_affine(gens, &dep, n, m) else {
            continue;
        };
        let free: Vec<usize> = (0..n).filter(|i| !dep.contains(i)).collect();
        let manifold = Manifold {
            component,
            free,
            map,
            asserted: false,
        };
        if verifies(gens, &manifold, n, m) {
            return (manifold, true);
        }
        if fallback.is_none() {
            fallback = Some(manifold);
        }
    }

    let manifold = fallback.unwrap_or_else(|| {
        let free: Vec<usize> = (0..dim).collect();
        let map = (0..n)
            .map(|i| {
                if i < dim {
                    RatioExpr::var(i, n + m)
                } else {
                    RatioExpr::from_poly(SparsePoly::zero(n + m, ORDER))
                }
            })
            .collect();
        Manifold {
            component,
            free,
            map,
            asserted: false,
        }
    });
    (manifold, false)
}

/// Returns true when every generator is affine in the dependent block as a
/// whole: no term carries total degree above 1 in the dependent variables.
fn jointly_affine(gens: &[SparsePoly<Q>], dep: &[usize]) -> bool {
    gens.iter().all(|g| {
        g.terms().iter().all(|(mono, _)| {
            dep.iter().map(|&d| u32::from(mono.exponent(d))).sum::<u32>() <= 1
        })
    })
}

/// Counts the terms across all generators that are linear in some
/// dependent variable.
fn linear_occurrences(gens: &[SparsePoly<Q>], dep: &[usize]) -> usize {
    gens.iter()
        .map(|g| {
            g.terms()
                .iter()
                .filter(|(mono, _)| dep.iter().any(|&d| mono.exponent(d) == 1))
                .count()
        })
        .sum()
}

/// Solves the affine system A * x_dep = -b by Cramer's rule, where row g
/// of (A | b) collects generator g's coefficients in the dependent block.
///
/// Returns the full state map or `None` when no row subset has an
/// invertible matrix.
fn solve_affine(
    gens: &[SparsePoly<Q>],
    dep: &[usize],
    n: usize,
    m: usize,
) -> Option<Vec<RatioExpr>> {
    let k = dep.len();
    if gens.len() < k {
        return None;
    }
    let width = n + m;

    let mut a_rows: Vec<Vec<SparsePoly<Q>>> = Vec::with_capacity(gens.len());
    let mut b_col: Vec<SparsePoly<Q>> = Vec::with_capacity(gens.len());
    for g in gens {
        let row: Vec<SparsePoly<Q>> = dep
            .iter()
            .map(|&d| {
                let terms = g
                    .terms()
                    .iter()
                    .filter(|(mono, _)| mono.exponent(d) == 1)
                    .map(|(mono, c)| {
                        let reduced = mono
                            .div(&PackedMonomial::var(d, width))
                            .expect("exponent is one");
                        (reduced, c.clone())
                    })
                    .collect();
                SparsePoly::new(terms, width, ORDER)
            })
            .collect();
        let constant = SparsePoly::new(
            g.terms()
                .iter()
                .filter(|(mono, _)| dep.iter().all(|&d| mono.exponent(d) == 0))
                .cloned()
                .collect(),
            width,
            ORDER,
        );
        a_rows.push(row);
        b_col.push(constant);
    }

    for rows in combinations(gens.len(), k) {
        let a: Vec<Vec<SparsePoly<Q>>> = rows.iter().map(|&r| a_rows[r].clone()).collect();
        let d = det(&a);
        if d.is_zero() {
            continue;
        }

        let mut map: Vec<RatioExpr> = (0..n).map(|i| RatioExpr::var(i, width)).collect();
        for (col, &dvar) in dep.iter().enumerate() {
            let mut replaced = a.clone();
            for (ri, &r) in rows.iter().enumerate() {
                replaced[ri][col] = b_col[r].neg();
            }
            map[dvar] = RatioExpr::new(det(&replaced), d.clone());
        }
        return Some(map);
    }
    None
}

/// Back-substitutes the parametrization into every generator.
fn verifies(gens: &[SparsePoly<Q>], manifold: &Manifold, n: usize, m: usize) -> bool {
    let args = manifold.substitution_args(n, m);
    gens.iter().all(|g| {
        Ring::is_zero(&g.evaluate_with(|c| RatioExpr::constant(c.clone()), &args))
    })
}
