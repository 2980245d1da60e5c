//! Buchberger's algorithm for Gröbner bases.
//!
//! The classic algorithm with the product and chain criteria, processing
//! S-polynomial batches of minimal lcm degree and reducing each batch in
//! parallel with rayon. The output is the unique reduced Gröbner basis for
//! the ideal under the generators' monomial ordering, so repeated
//! computations on the same input are bitwise identical.

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use fenichel_poly::monomial::PackedMonomial;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::traits::Field;

/// Computes the full normal form of `p` modulo `basis`.
///
/// Every term of the result is irreducible by every leading monomial of
/// the basis. The zero polynomial is returned exactly when `p` lies in the
/// ideal generated by a Gröbner basis.
#[must_use]
pub fn normal_form<R: Field>(p: &SparsePoly<R>, basis: &[SparsePoly<R>]) -> SparsePoly<R> {
    let num_vars = p.num_vars();
    let order = p.order();
    let mut work = p.clone();
    let mut rem = SparsePoly::zero(num_vars, order);

    'outer: while !work.is_zero() {
        let (lm, lc) = work.leading_term().cloned().expect("non-zero polynomial");

        for g in basis {
            let (lm_g, lc_g) = match g.leading_term() {
                Some(t) => t,
                None => continue,
            };
            if let Some(m) = lm.div(lm_g) {
                let ratio = lc.clone() * lc_g.inv().expect("leading coefficient is non-zero");
                work = work.sub(&g.mul_term(&m, &ratio));
                continue 'outer;
            }
        }

        // Leading term is irreducible: move it to the remainder
        let t = SparsePoly::new(vec![(lm, lc)], num_vars, order);
        rem = rem.add(&t);
        work = work.sub(&t);
    }

    rem
}

/// Computes the S-polynomial of f and g.
fn s_polynomial<R: Field>(f: &SparsePoly<R>, g: &SparsePoly<R>) -> SparsePoly<R> {
    let (lm_f, lc_f) = f.leading_term().expect("non-zero basis element");
    let (lm_g, lc_g) = g.leading_term().expect("non-zero basis element");

    let lcm = lm_f.lcm(lm_g);
    let mf = lcm.div(lm_f).expect("lcm is divisible");
    let mg = lcm.div(lm_g).expect("lcm is divisible");

    let a = f.mul_term(&mf, &lc_f.inv().expect("non-zero leading coefficient"));
    let b = g.mul_term(&mg, &lc_g.inv().expect("non-zero leading coefficient"));
    a.sub(&b)
}

/// A critical pair, kept with its lcm for selection and the criteria.
#[derive(Clone, Copy)]
struct Pair {
    i: usize,
    j: usize,
    lcm: PackedMonomial,
}

impl Pair {
    fn new<R: Field>(i: usize, j: usize, basis: &[SparsePoly<R>]) -> Self {
        let lcm = basis[i]
            .leading_monomial()
            .expect("non-zero basis element")
            .lcm(basis[j].leading_monomial().expect("non-zero basis element"));
        Self { i, j, lcm }
    }

    fn key(&self) -> (usize, usize) {
        if self.i < self.j {
            (self.i, self.j)
        } else {
            (self.j, self.i)
        }
    }
}

/// Chain criterion: the pair (i, j) is superfluous when some k with
/// lm_k | lcm(i, j) has both (i, k) and (j, k) already processed.
fn chain_criterion<R: Field>(
    pair: &Pair,
    basis: &[SparsePoly<R>],
    processed: &FxHashSet<(usize, usize)>,
) -> bool {
    for (k, g) in basis.iter().enumerate() {
        if k == pair.i || k == pair.j {
            continue;
        }
        let lm_k = match g.leading_monomial() {
            Some(m) => m,
            None => continue,
        };
        if pair.lcm.is_divisible_by(lm_k)
            && processed.contains(&Pair::new(pair.i, k, basis).key())
            && processed.contains(&Pair::new(pair.j, k, basis).key())
        {
            return true;
        }
    }
    false
}

/// Computes the reduced Gröbner basis of the given generators.
///
/// The generators must all share one monomial ordering. The result is
/// monic, inter-reduced, and sorted descending by leading monomial.
#[must_use]
pub fn groebner_basis<R>(gens: &[SparsePoly<R>]) -> Vec<SparsePoly<R>>
where
    R: Field + Send + Sync,
{
    let mut basis: Vec<SparsePoly<R>> = gens
        .iter()
        .filter(|p| !p.is_zero())
        .map(SparsePoly::monic)
        .collect();

    if basis.is_empty() {
        return basis;
    }

    let order = basis[0].order();
    let num_vars = basis.iter().map(SparsePoly::num_vars).max().unwrap_or(0);

    // A constant generator settles everything immediately
    if basis.iter().any(SparsePoly::is_constant) {
        return vec![SparsePoly::one(num_vars, order)];
    }

    let mut pairs: Vec<Pair> = Vec::new();
    for i in 0..basis.len() {
        for j in (i + 1)..basis.len() {
            pairs.push(Pair::new(i, j, &basis));
        }
    }

    let mut processed: FxHashSet<(usize, usize)> = FxHashSet::default();

    while !pairs.is_empty() {
        // Select the batch of pairs with minimal lcm total degree
        let min_deg = pairs
            .iter()
            .map(|p| p.lcm.total_degree())
            .min()
            .expect("pairs is non-empty");
        let (selected, rest): (Vec<Pair>, Vec<Pair>) = pairs
            .into_iter()
            .partition(|p| p.lcm.total_degree() == min_deg);
        pairs = rest;

        // Apply the criteria, then reduce the surviving S-polynomials in
        // parallel against the current basis
        let surviving: Vec<Pair> = selected
            .iter()
            .filter(|pair| {
                let lm_i = basis[pair.i].leading_monomial().expect("non-zero");
                let lm_j = basis[pair.j].leading_monomial().expect("non-zero");
                !lm_i.is_coprime_with(lm_j) && !chain_criterion(pair, &basis, &processed)
            })
            .copied()
            .collect();

        for pair in &selected {
            processed.insert(pair.key());
        }

        let reduced: Vec<SparsePoly<R>> = surviving
            .par_iter()
            .map(|pair| normal_form(&s_polynomial(&basis[pair.i], &basis[pair.j]), &basis))
            .filter(|p| !p.is_zero())
            .map(|p| p.monic())
            .collect();

        for p in reduced {
            // A batch can produce overlapping reducta; re-reduce against the
            // basis as it grows within the batch
            let nf = normal_form(&p, &basis);
            if nf.is_zero() {
                continue;
            }
            // A constant normal form means 1 is in the ideal
            if nf.is_constant() {
                return vec![SparsePoly::one(num_vars, order)];
            }
            let new_idx = basis.len();
            basis.push(nf.monic());
            for i in 0..new_idx {
                pairs.push(Pair::new(i, new_idx, &basis));
            }
        }
    }

    interreduce(basis, num_vars, order)
}

/// Inter-reduces a Gröbner basis into the unique reduced basis.
fn interreduce<R: Field>(
    mut basis: Vec<SparsePoly<R>>,
    num_vars: usize,
    order: fenichel_poly::ordering::MonomialOrder,
) -> Vec<SparsePoly<R>> {
    // Drop elements whose leading monomial is divisible by another's
    let mut keep = vec![true; basis.len()];
    for i in 0..basis.len() {
        for j in 0..basis.len() {
            if i == j || !keep[j] {
                continue;
            }
            let lm_i = basis[i].leading_monomial().expect("non-zero");
            let lm_j = basis[j].leading_monomial().expect("non-zero");
            if lm_i.is_divisible_by(lm_j) && (lm_i != lm_j || i > j) {
                keep[i] = false;
                break;
            }
        }
    }

    let minimal: Vec<SparsePoly<R>> = basis
        .drain(..)
        .zip(keep)
        .filter_map(|(p, k)| if k { Some(p) } else { None })
        .collect();

    // Fully reduce each element against the others
    let mut reduced: Vec<SparsePoly<R>> = Vec::with_capacity(minimal.len());
    for i in 0..minimal.len() {
        let others: Vec<SparsePoly<R>> = minimal
            .iter()
            .enumerate()
            .filter_map(|(j, p)| if j == i { None } else { Some(p.clone()) })
            .collect();
        let nf = normal_form(&minimal[i], &others);
        if !nf.is_zero() {
            reduced.push(nf.monic());
        }
    }

    reduced.sort_by(|a, b| {
        let lm_a = a.leading_monomial().expect("non-zero");
        let lm_b = b.leading_monomial().expect("non-zero");
        order.compare(lm_b, lm_a, num_vars)
    });

    reduced
}

/// Returns true if the basis generates the full ring (contains a unit).
#[must_use]
pub fn basis_is_trivial<R: Field>(basis: &[SparsePoly<R>]) -> bool {
    basis.iter().any(|p| !p.is_zero() && p.is_constant())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenichel_poly::ordering::MonomialOrder;
    use fenichel_rings::rationals::Q;

    const ORDER: MonomialOrder = MonomialOrder::Grevlex;

    fn var(i: usize) -> SparsePoly<Q> {
        SparsePoly::var(i, 2, ORDER)
    }

    fn one() -> SparsePoly<Q> {
        SparsePoly::one(2, ORDER)
    }

    #[test]
    fn quadratic_with_linear() {
        // x^2 - 1 and y - x: the reduced basis also contains y^2 - 1
        let f = var(0).pow(2).sub(&one());
        let g = var(1).sub(&var(0));

        let basis = groebner_basis(&[f.clone(), g.clone()]);

        assert!(!basis.is_empty());
        assert!(normal_form(&f, &basis).is_zero());
        assert!(normal_form(&g, &basis).is_zero());

        let y2m1 = var(1).pow(2).sub(&one());
        assert!(normal_form(&y2m1, &basis).is_zero());
    }

    #[test]
    fn linear_system_triangularizes() {
        // x + y - 1, x - y - 1 has basis {x - 1, y}
        let f = var(0).add(&var(1)).sub(&one());
        let g = var(0).sub(&var(1)).sub(&one());

        let basis = groebner_basis(&[f, g]);

        assert_eq!(basis.len(), 2);
        assert!(normal_form(&var(1), &basis).is_zero());
        assert!(normal_form(&var(0).sub(&one()), &basis).is_zero());
    }

    #[test]
    fn inconsistent_system_is_trivial() {
        // x and x - 1 generate the whole ring
        let basis = groebner_basis(&[var(0), var(0).sub(&one())]);
        assert!(basis_is_trivial(&basis));
    }

    #[test]
    fn already_groebner() {
        let basis = groebner_basis(&[var(0), var(1)]);
        assert_eq!(basis.len(), 2);
    }

    #[test]
    fn reduced_basis_is_deterministic() {
        let f = var(0).pow(2).sub(&var(1));
        let g = var(0).mul(&var(1)).sub(&one());

        let a = groebner_basis(&[f.clone(), g.clone()]);
        let b = groebner_basis(&[f, g]);
        assert_eq!(a, b);
    }

    #[test]
    fn normal_form_is_zero_only_for_members() {
        let basis = groebner_basis(&[var(0).pow(2), var(1)]);

        // x^2 y + x y is in the ideal, x + 1 is not
        let member = var(0).pow(2).mul(&var(1)).add(&var(0).mul(&var(1)));
        assert!(normal_form(&member, &basis).is_zero());
        assert!(!normal_form(&var(0).add(&one()), &basis).is_zero());
    }
}
