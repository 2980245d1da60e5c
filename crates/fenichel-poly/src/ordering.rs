//! Monomial orderings.
//!
//! The block order is a product order: monomials are compared by their
//! leading block (variables `0..split`) first, grevlex within each block.
//! It is an elimination order for the leading block, which is what the
//! elimination-ideal and saturation machinery relies on.

use std::cmp::Ordering;

use crate::monomial::PackedMonomial;

/// A monomial ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MonomialOrder {
    /// Graded reverse lexicographic order.
    ///
    /// First compares total degree, then reverse lex (last variable first)
    /// with the comparison reversed.
    #[default]
    Grevlex,

    /// Block elimination order.
    ///
    /// Compares the block of variables `0..split` by grevlex first, then
    /// the remaining variables by grevlex. Any monomial involving a
    /// leading-block variable is greater than any monomial that does not.
    Block {
        /// Number of leading (eliminated) variables.
        split: u8,
    },
}

impl MonomialOrder {
    /// Compares two monomials according to this ordering.
    #[must_use]
    pub fn compare(&self, a: &PackedMonomial, b: &PackedMonomial, num_vars: usize) -> Ordering {
        match *self {
            MonomialOrder::Grevlex => cmp_grevlex_range(a, b, 0, num_vars),
            MonomialOrder::Block { split } => {
                let split = (split as usize).min(num_vars);
                match cmp_grevlex_range(a, b, 0, split) {
                    Ordering::Equal => cmp_grevlex_range(a, b, split, num_vars),
                    ord => ord,
                }
            }
        }
    }

    /// Returns a short name for the ordering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            MonomialOrder::Grevlex => "grevlex",
            MonomialOrder::Block { .. } => "block",
        }
    }
}

impl std::fmt::Display for MonomialOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compares two monomials by grevlex restricted to variables `lo..hi`.
fn cmp_grevlex_range(a: &PackedMonomial, b: &PackedMonomial, lo: usize, hi: usize) -> Ordering {
    let deg = |m: &PackedMonomial| -> u32 { (lo..hi).map(|i| u32::from(m.exponent(i))).sum() };

    match deg(a).cmp(&deg(b)) {
        Ordering::Equal => {}
        ord => return ord,
    }

    for i in (lo..hi).rev() {
        match b.exponent(i).cmp(&a.exponent(i)) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}
