//! # fenichel-ideal
//!
//! The commutative-algebra kernel of the fenichel reduction engine.
//!
//! This crate provides:
//! - Reduced Gröbner bases via Buchberger's algorithm with the product and
//!   chain criteria and rayon-parallel batch reduction
//! - The `Ideal` type with a lazily cached basis, membership and
//!   triviality queries, elimination ideals, and saturation tests
//! - Krull dimension from leading-term independent sets
//! - Decomposition of a variety into reduced, pairwise-incomparable
//!   components by splitting on generator factor structure
//!
//! Everything is exact; computations may be expensive but never
//! approximate, and repeated runs on the same input produce identical
//! output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buchberger;
pub mod decompose;
pub mod dimension;
pub mod ideal;

use thiserror::Error;

pub use buchberger::{basis_is_trivial, groebner_basis, normal_form};
pub use decompose::{decompose, Component};
pub use dimension::dimension;
pub use ideal::Ideal;

/// Errors surfaced by the algebra kernel.
///
/// These indicate a structurally unusable request, never a transient
/// condition; retrying with the same input reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// The requested ring exceeds the packed monomial capacity.
    #[error("ring needs {needed} variables but the kernel supports at most {max}")]
    TooManyVariables {
        /// Number of variables requested.
        needed: usize,
        /// Maximum supported.
        max: usize,
    },

    /// An elimination block larger than the ring was requested.
    #[error("cannot eliminate {split} variables from a ring with {num_vars}")]
    InvalidSplit {
        /// Requested elimination block size.
        split: usize,
        /// Ring variable count.
        num_vars: usize,
    },
}
