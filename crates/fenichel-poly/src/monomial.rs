//! Packed monomial representation.
//!
//! Monomials are stored as fixed-capacity arrays of `u16` exponents with a
//! cached total degree, so ordering comparisons and divisibility checks are
//! cheap. The capacity bounds the number of ring variables: state variables,
//! parameters, and one auxiliary saturation variable must all fit.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum number of variables supported by the packed representation.
pub const MAX_VARS: usize = 16;

/// A packed monomial with up to `MAX_VARS` variables.
///
/// Each exponent is stored as a `u16`, allowing exponents up to 65535.
/// The total degree is cached for efficient graded comparisons.
#[derive(Clone, Copy)]
pub struct PackedMonomial {
    /// Exponents for each variable (x_0, x_1, ..., x_{n-1}).
    exponents: [u16; MAX_VARS],
    /// Number of active variables.
    num_vars: u8,
    /// Cached total degree.
    total_degree: u32,
}

impl PackedMonomial {
    /// Creates a new monomial with the given exponents.
    ///
    /// # Panics
    ///
    /// Panics if more than `MAX_VARS` exponents are given.
    #[must_use]
    pub fn new(exps: &[u16]) -> Self {
        assert!(exps.len() <= MAX_VARS, "too many variables for packed monomial");
        let mut exponents = [0u16; MAX_VARS];
        exponents[..exps.len()].copy_from_slice(exps);

        let total_degree: u32 = exps.iter().map(|&e| u32::from(e)).sum();

        Self {
            exponents,
            num_vars: exps.len() as u8,
            total_degree,
        }
    }

    /// Creates the identity monomial (1).
    #[must_use]
    pub fn one(num_vars: usize) -> Self {
        Self {
            exponents: [0u16; MAX_VARS],
            num_vars: num_vars.min(MAX_VARS) as u8,
            total_degree: 0,
        }
    }

    /// Creates the monomial x_i.
    #[must_use]
    pub fn var(i: usize, num_vars: usize) -> Self {
        assert!(i < MAX_VARS, "variable index out of range");
        let mut exponents = [0u16; MAX_VARS];
        exponents[i] = 1;
        Self {
            exponents,
            num_vars: num_vars.min(MAX_VARS).max(i + 1) as u8,
            total_degree: 1,
        }
    }

    /// Returns the exponent of variable i.
    #[must_use]
    pub fn exponent(&self, i: usize) -> u16 {
        if i < MAX_VARS {
            self.exponents[i]
        } else {
            0
        }
    }

    /// Returns the exponents of the active variables as a slice.
    #[must_use]
    pub fn exponents(&self) -> &[u16] {
        &self.exponents[..self.num_vars as usize]
    }

    /// Returns the number of active variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars as usize
    }

    /// Returns the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.total_degree
    }

    /// Returns true if this is the identity monomial (1).
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.total_degree == 0
    }

    /// Returns the indices of variables with non-zero exponent.
    #[must_use]
    pub fn support(&self) -> Vec<usize> {
        (0..self.num_vars as usize)
            .filter(|&i| self.exponents[i] > 0)
            .collect()
    }

    /// Multiplies two monomials (adds exponents).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let n = self.num_vars.max(other.num_vars) as usize;
        let mut exponents = [0u16; MAX_VARS];

        for i in 0..n {
            exponents[i] = self.exponents[i].saturating_add(other.exponents[i]);
        }

        Self {
            exponents,
            num_vars: n as u8,
            total_degree: self.total_degree + other.total_degree,
        }
    }

    /// Divides this monomial by another, if divisible.
    ///
    /// Returns `Some(quotient)` when every exponent of `other` is bounded
    /// by the corresponding exponent of `self`.
    #[must_use]
    pub fn div(&self, other: &Self) -> Option<Self> {
        let n = self.num_vars.max(other.num_vars) as usize;
        let mut exponents = [0u16; MAX_VARS];

        for i in 0..n {
            if self.exponents[i] < other.exponents[i] {
                return None;
            }
            exponents[i] = self.exponents[i] - other.exponents[i];
        }

        Some(Self {
            exponents,
            num_vars: n as u8,
            total_degree: self.total_degree - other.total_degree,
        })
    }

    /// Returns true if `other` divides `self`.
    #[must_use]
    pub fn is_divisible_by(&self, other: &Self) -> bool {
        let n = self.num_vars.max(other.num_vars) as usize;
        (0..n).all(|i| self.exponents[i] >= other.exponents[i])
    }

    /// Computes the least common multiple of two monomials.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        let n = self.num_vars.max(other.num_vars) as usize;
        let mut exponents = [0u16; MAX_VARS];
        let mut total_degree = 0u32;

        for i in 0..n {
            let e = self.exponents[i].max(other.exponents[i]);
            exponents[i] = e;
            total_degree += u32::from(e);
        }

        Self {
            exponents,
            num_vars: n as u8,
            total_degree,
        }
    }

    /// Returns true if the two monomials have no common variable.
    #[must_use]
    pub fn is_coprime_with(&self, other: &Self) -> bool {
        let n = self.num_vars.max(other.num_vars) as usize;
        (0..n).all(|i| self.exponents[i] == 0 || other.exponents[i] == 0)
    }

    /// Converts to a human-readable string using the given variable names.
    #[must_use]
    pub fn to_string_with(&self, names: &[&str]) -> String {
        let mut parts = Vec::new();

        for i in 0..self.num_vars as usize {
            let e = self.exponents[i];
            if e > 0 {
                let name = names.get(i).copied().unwrap_or("?");
                if e == 1 {
                    parts.push(name.to_string());
                } else {
                    parts.push(format!("{name}^{e}"));
                }
            }
        }

        if parts.is_empty() {
            "1".to_string()
        } else {
            parts.join("*")
        }
    }
}

// Equality and hashing ignore `num_vars`: trailing exponents are zero, so
// monomials in rings of different widths compare by their exponent vectors.
impl PartialEq for PackedMonomial {
    fn eq(&self, other: &Self) -> bool {
        self.exponents == other.exponents
    }
}

impl Eq for PackedMonomial {}

impl Hash for PackedMonomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exponents.hash(state);
    }
}

impl fmt::Debug for PackedMonomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedMonomial({:?})", self.exponents())
    }
}
