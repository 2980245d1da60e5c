//! # fenichel-rings
//!
//! Algebraic structures for the fenichel reduction engine.
//!
//! This crate provides:
//! - Abstract traits: `Ring`, `EuclideanDomain`, `Field`
//! - The exact rational field Q over arbitrary-precision integers
//!
//! All arithmetic is exact; there are no floating-point code paths.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod rationals;
pub mod traits;

pub use rationals::Q;
pub use traits::{CommutativeRing, EuclideanDomain, Field, IntegralDomain, Ring};
