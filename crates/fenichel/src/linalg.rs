//! Polynomial matrices: Jacobians, determinants, minors.
//!
//! Everything here is generic over the coefficient ring, since the rank
//! conditions work over the parameter field while the general search keeps
//! parameters as ring variables. Determinants use Laplace expansion along
//! the first row; the matrices involved are Jacobian minors of small
//! systems, where fraction-free elimination would not pay for itself.

use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::traits::Ring;

/// All k-element subsets of 0..n, ascending within each subset and in
/// lexicographic order overall.
pub(crate) fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn walk(start: usize, n: usize, k: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..n {
            cur.push(i);
            walk(i + 1, n, k, cur, out);
            cur.pop();
        }
    }

    let mut out = Vec::new();
    if k <= n {
        walk(0, n, k, &mut Vec::with_capacity(k), &mut out);
    }
    out
}

/// The Jacobian of a polynomial system with respect to the first
/// `num_states` ring variables: one row per component, one column per
/// state.
pub(crate) fn jacobian<R: Ring>(
    system: &[SparsePoly<R>],
    num_states: usize,
) -> Vec<Vec<SparsePoly<R>>> {
    system
        .iter()
        .map(|p| (0..num_states).map(|v| p.derivative(v)).collect())
        .collect()
}

/// The determinant of a square polynomial matrix.
///
/// # Panics
///
/// Panics on an empty or non-square matrix.
pub(crate) fn det<R: Ring>(mat: &[Vec<SparsePoly<R>>]) -> SparsePoly<R> {
    let k = mat.len();
    assert!(k > 0 && mat.iter().all(|row| row.len() == k));

    if k == 1 {
        return mat[0][0].clone();
    }

    let num_vars = mat[0][0].num_vars();
    let order = mat[0][0].order();
    let mut acc = SparsePoly::zero(num_vars, order);

    for j in 0..k {
        if mat[0][j].is_zero() {
            continue;
        }
        let sub: Vec<Vec<SparsePoly<R>>> = mat[1..]
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter_map(|(c, p)| if c == j { None } else { Some(p.clone()) })
                    .collect()
            })
            .collect();
        let term = mat[0][j].mul(&det(&sub));
        acc = if j % 2 == 0 { acc.add(&term) } else { acc.sub(&term) };
    }
    acc
}

/// All `size`-by-`size` minors of a matrix, in row-subset-major order.
/// Empty when `size` exceeds a dimension.
pub(crate) fn minors<R: Ring>(mat: &[Vec<SparsePoly<R>>], size: usize) -> Vec<SparsePoly<R>> {
    if size == 0 || mat.is_empty() || size > mat.len() || size > mat[0].len() {
        return Vec::new();
    }

    let rows = combinations(mat.len(), size);
    let cols = combinations(mat[0].len(), size);
    let mut out = Vec::with_capacity(rows.len() * cols.len());

    for rs in &rows {
        for cs in &cols {
            let sub: Vec<Vec<SparsePoly<R>>> = rs
                .iter()
                .map(|&r| cs.iter().map(|&c| mat[r][c].clone()).collect())
                .collect();
            out.push(det(&sub));
        }
    }
    out
}
