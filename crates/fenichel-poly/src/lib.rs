//! # fenichel-poly
//!
//! Sparse multivariate polynomial arithmetic for the fenichel reduction
//! engine.
//!
//! This crate provides:
//! - Packed monomials with cached total degree
//! - Grevlex and block elimination orderings
//! - Sparse polynomials over any coefficient ring, with derivatives and
//!   substitution
//! - Multivariate gcd and perfect-square roots over a coefficient field
//! - Exact multivariate rational expressions (`RatioExpr`), which also
//!   serve as the coefficient field Q(parameters) for Gröbner basis
//!   computations over a parameter field

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gcd;
pub mod monomial;
pub mod ordering;
pub mod ratio;
pub mod sparse;

#[cfg(test)]
mod proptests;

pub use gcd::{poly_gcd, poly_sqrt};
pub use monomial::{PackedMonomial, MAX_VARS};
pub use ordering::MonomialOrder;
pub use ratio::RatioExpr;
pub use sparse::SparsePoly;
