//! Polynomial ODE models with a slow-fast parameter split.
//!
//! A model is a system dx/dt = f(x, π) whose right-hand side is polynomial
//! in both the states and the parameters, together with a mask marking
//! which parameters are allowed to become small. Everything lives in the
//! combined ring Q[x, π]: the n states occupy variable indices 0..n and
//! the m parameters occupy n..n+m. One further index is reserved so that
//! saturation tests can adjoin their auxiliary variable.

use fenichel_poly::monomial::MAX_VARS;
use fenichel_poly::ordering::MonomialOrder;
use fenichel_poly::sparse::SparsePoly;
use fenichel_rings::rationals::Q;

use crate::error::ModelError;

pub(crate) const ORDER: MonomialOrder = MonomialOrder::Grevlex;

/// A polynomial ODE system together with its slow-fast parameter split.
#[derive(Debug, Clone)]
pub struct Model {
    state_names: Vec<String>,
    param_names: Vec<String>,
    separable: Vec<bool>,
    rhs: Vec<SparsePoly<Q>>,
}

impl Model {
    /// Builds a model from symbol names, a separability mask, and a
    /// closure producing the right-hand side from the state and parameter
    /// generator polynomials.
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` when the states are empty, a name is empty
    /// or duplicated, the mask or the produced right-hand side has the
    /// wrong length, or the combined ring exceeds the monomial capacity.
    pub fn build<F>(
        states: &[&str],
        params: &[&str],
        separable: &[bool],
        f: F,
    ) -> Result<Self, ModelError>
    where
        F: FnOnce(&[SparsePoly<Q>], &[SparsePoly<Q>]) -> Vec<SparsePoly<Q>>,
    {
        if states.is_empty() {
            return Err(ModelError::EmptyStates);
        }
        if separable.len() != params.len() {
            return Err(ModelError::MaskLength {
                expected: params.len(),
                got: separable.len(),
            });
        }

        let mut seen: Vec<&str> = Vec::new();
        for name in states.iter().chain(params.iter()) {
            if name.is_empty() {
                return Err(ModelError::EmptySymbolName);
            }
            if seen.contains(name) {
                return Err(ModelError::DuplicateSymbol((*name).to_string()));
            }
            seen.push(*name);
        }

        let n = states.len();
        let m = params.len();
        // One slot is reserved for the saturation variable
        if n + m + 1 > MAX_VARS {
            return Err(ModelError::Capacity {
                needed: n + m + 1,
                max: MAX_VARS,
            });
        }

        let width = n + m;
        let state_polys: Vec<SparsePoly<Q>> =
            (0..n).map(|i| SparsePoly::var(i, width, ORDER)).collect();
        let param_polys: Vec<SparsePoly<Q>> =
            (0..m).map(|j| SparsePoly::var(n + j, width, ORDER)).collect();

        let rhs = f(&state_polys, &param_polys);
        if rhs.len() != n {
            return Err(ModelError::RhsLength {
                expected: n,
                got: rhs.len(),
            });
        }
        let rhs = rhs.into_iter().map(|p| p.widened(width)).collect();

        Ok(Self {
            state_names: states.iter().map(|s| s.to_string()).collect(),
            param_names: params.iter().map(|s| s.to_string()).collect(),
            separable: separable.to_vec(),
            rhs,
        })
    }

    /// Number of state variables.
    #[must_use]
    pub fn num_states(&self) -> usize {
        self.state_names.len()
    }

    /// Number of parameters.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.param_names.len()
    }

    /// Width of the combined ring.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_states() + self.num_params()
    }

    /// State names, in ring order.
    #[must_use]
    pub fn state_names(&self) -> &[String] {
        &self.state_names
    }

    /// Parameter names, in ring order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns true if parameter `j` may become small.
    #[must_use]
    pub fn is_separable(&self, j: usize) -> bool {
        self.separable[j]
    }

    /// Indices of the separable parameters, ascending.
    #[must_use]
    pub fn separable_params(&self) -> Vec<usize> {
        (0..self.num_params())
            .filter(|&j| self.separable[j])
            .collect()
    }

    /// The right-hand side in the combined ring.
    #[must_use]
    pub fn rhs(&self) -> &[SparsePoly<Q>] {
        &self.rhs
    }

    /// The right-hand side with the given parameters set to zero: the fast
    /// part f^(0) of the slow-fast splitting for that candidate.
    #[must_use]
    pub fn rhs_small_zero(&self, small: &[usize]) -> Vec<SparsePoly<Q>> {
        let n = self.num_states();
        self.rhs
            .iter()
            .map(|p| {
                let mut q = p.clone();
                for &j in small {
                    q = q.set_var_zero(n + j);
                }
                q
            })
            .collect()
    }

    /// All symbol names in ring order: states first, then parameters.
    #[must_use]
    pub fn symbol_names(&self) -> Vec<&str> {
        self.state_names
            .iter()
            .chain(self.param_names.iter())
            .map(String::as_str)
            .collect()
    }

    /// The symbol table: each state and parameter as a generator of the
    /// combined ring, addressable by name.
    #[must_use]
    pub fn symbols(&self) -> SymbolTable {
        let width = self.num_vars();
        SymbolTable {
            names: self.symbol_names().iter().map(|s| s.to_string()).collect(),
            polys: (0..width).map(|i| SparsePoly::var(i, width, ORDER)).collect(),
        }
    }

    /// Index of a parameter by name.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownParameter` for names not in the model.
    pub fn param_index(&self, name: &str) -> Result<usize, ModelError> {
        self.param_names
            .iter()
            .position(|p| p == name)
            .ok_or_else(|| ModelError::UnknownParameter(name.to_string()))
    }

    /// Substitutes rational values for the named parameters in the
    /// right-hand side, leaving the other symbols untouched.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownParameter` for names not in the model.
    pub fn substitute_params(
        &self,
        assignment: &[(&str, Q)],
    ) -> Result<Vec<SparsePoly<Q>>, ModelError> {
        let n = self.num_states();
        let width = self.num_vars();
        let mut out = self.rhs.clone();
        for (name, value) in assignment {
            let j = self.param_index(name)?;
            let c = SparsePoly::constant(value.clone(), width, ORDER);
            out = out.iter().map(|p| p.substitute(n + j, &c)).collect();
        }
        Ok(out)
    }

    /// Renders one right-hand side component with the model's names.
    #[must_use]
    pub fn render(&self, p: &SparsePoly<Q>) -> String {
        p.to_string_with(&self.symbol_names())
    }
}

/// The ring generators of a model, addressable by symbol name.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: Vec<String>,
    polys: Vec<SparsePoly<Q>>,
}

impl SymbolTable {
    /// Looks a symbol up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SparsePoly<Q>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.polys[i])
    }

    /// Iterates over (name, generator) pairs in ring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SparsePoly<Q>)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.polys.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_decay() -> Model {
        Model::build(&["x", "y"], &["p", "q"], &[true, true], |x, p| {
            vec![p[0].mul(&x[0]).neg(), p[0].mul(&x[0]).sub(&p[1].mul(&x[1]))]
        })
        .unwrap()
    }

    #[test]
    fn build_places_params_after_states() {
        let model = linear_decay();
        assert_eq!(model.num_states(), 2);
        assert_eq!(model.num_params(), 2);

        let syms = model.symbols();
        assert_eq!(syms.get("x"), Some(&SparsePoly::var(0, 4, ORDER)));
        assert_eq!(syms.get("q"), Some(&SparsePoly::var(3, 4, ORDER)));
        assert_eq!(syms.get("z"), None);
    }

    #[test]
    fn duplicate_symbol_is_rejected() {
        let err = Model::build(&["x", "x"], &[], &[], |x, _| vec![x[0].clone(), x[1].clone()]);
        assert_eq!(err.unwrap_err(), ModelError::DuplicateSymbol("x".into()));

        let err = Model::build(&["x"], &["x"], &[true], |x, _| vec![x[0].clone()]);
        assert_eq!(err.unwrap_err(), ModelError::DuplicateSymbol("x".into()));
    }

    #[test]
    fn mask_and_rhs_lengths_are_checked() {
        let err = Model::build(&["x"], &["p"], &[], |x, _| vec![x[0].clone()]);
        assert_eq!(
            err.unwrap_err(),
            ModelError::MaskLength { expected: 1, got: 0 }
        );

        let err = Model::build(&["x"], &[], &[], |_, _| vec![]);
        assert_eq!(
            err.unwrap_err(),
            ModelError::RhsLength { expected: 1, got: 0 }
        );
    }

    #[test]
    fn capacity_reserves_the_saturation_slot() {
        let states: Vec<String> = (0..8).map(|i| format!("x{i}")).collect();
        let state_refs: Vec<&str> = states.iter().map(String::as_str).collect();
        let params: Vec<String> = (0..8).map(|i| format!("p{i}")).collect();
        let param_refs: Vec<&str> = params.iter().map(String::as_str).collect();

        // 8 + 8 states and parameters fit the monomial capacity exactly,
        // but the reserved slot pushes it over
        let err = Model::build(&state_refs, &param_refs, &[true; 8], |x, _| x.to_vec());
        assert_eq!(
            err.unwrap_err(),
            ModelError::Capacity {
                needed: 17,
                max: MAX_VARS
            }
        );
    }

    #[test]
    fn small_zero_drops_terms() {
        let model = linear_decay();
        // With p small, dy/dt = px - qy loses its px term
        let fast = model.rhs_small_zero(&[0]);
        assert!(fast[0].is_zero());
        assert_eq!(
            fast[1],
            SparsePoly::var(3, 4, ORDER).mul(&SparsePoly::var(1, 4, ORDER)).neg()
        );
    }

    #[test]
    fn parameter_substitution() {
        let model = linear_decay();
        let subbed = model
            .substitute_params(&[("p", Q::from_integer(2))])
            .unwrap();

        // dx/dt = -2x after p := 2
        let x = SparsePoly::<Q>::var(0, 4, ORDER);
        assert_eq!(subbed[0], x.scale(&Q::from_integer(2)).neg());

        assert_eq!(
            model.substitute_params(&[("w", Q::from_integer(1))]),
            Err(ModelError::UnknownParameter("w".into()))
        );
    }

    #[test]
    fn render_uses_model_names() {
        let model = linear_decay();
        let text = model.render(&model.rhs()[1]);
        assert!(text.contains('x'));
        assert!(text.contains('q'));
    }
}
