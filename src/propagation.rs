//! Propagation through formulas handled by an external expression engine.
//!
//! The crate does no symbolic algebra itself. An engine implements [`Expression`]
//! (free symbols, differentiation and numeric evaluation); [`Propagator`] combines the
//! partial derivatives as `δf = √(Σ (∂f/∂xᵢ)² · δxᵢ²)` over the symbols bound to
//! uncertain values.

use crate::broadcast::{Broadcaster, Node};
use crate::error::{Result, UncertainError};
use crate::{Operand, Uncertain};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;

/// A formula provided by a symbolic engine.
pub trait Expression: Sized {
    /// Engine failure, such as an unbound symbol or an unsupported function
    type Error: Display;

    /// Names of the variables the expression depends on
    fn free_symbols(&self) -> BTreeSet<String>;

    /// Partial derivative with respect to `symbol`
    ///
    /// # Errors
    /// Returns the engine's error when the expression cannot be differentiated.
    fn differentiate(&self, symbol: &str) -> std::result::Result<Self, Self::Error>;

    /// Numeric value with every free symbol bound
    ///
    /// # Errors
    /// Returns the engine's error when a symbol is unbound or evaluation fails.
    fn evaluate(&self, bindings: &HashMap<String, f64>) -> std::result::Result<f64, Self::Error>;
}

/// A formula together with its partial derivatives, computed once.
#[derive(Debug, Clone)]
pub struct Propagator<E> {
    expression: E,
    derivatives: BTreeMap<String, E>,
}

impl<E: Expression> Propagator<E> {
    /// Differentiates `expression` with respect to each of its free symbols.
    ///
    /// # Errors
    /// Returns [`UncertainError::Expression`] when the engine fails to differentiate.
    pub fn new(expression: E) -> Result<Self> {
        let derivatives = expression
            .free_symbols()
            .into_iter()
            .map(|symbol| {
                let derivative = expression
                    .differentiate(&symbol)
                    .map_err(UncertainError::expression)?;
                Ok((symbol, derivative))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        tracing::debug!(symbols = derivatives.len(), "prepared partial derivatives");
        Ok(Self {
            expression,
            derivatives,
        })
    }

    #[must_use]
    pub fn expression(&self) -> &E {
        &self.expression
    }

    /// The partial derivative for `symbol`, if it is a free symbol of the formula
    #[must_use]
    pub fn derivative(&self, symbol: &str) -> Option<&E> {
        self.derivatives.get(symbol)
    }

    /// Evaluates the formula and its propagated uncertainty.
    ///
    /// Symbols bound to [`Operand::Uncertain`] contribute `(∂f/∂x)² · δx²`; constants
    /// contribute nothing. Bindings for names the formula does not use are ignored.
    ///
    /// # Errors
    /// Returns [`UncertainError::Expression`] when evaluation fails, for instance
    /// because a symbol has no binding.
    pub fn evaluate(&self, values: &BTreeMap<String, Operand>) -> Result<Uncertain> {
        let bindings: HashMap<String, f64> = values
            .iter()
            .map(|(name, operand)| (name.clone(), operand.value()))
            .collect();

        let value = self
            .expression
            .evaluate(&bindings)
            .map_err(UncertainError::expression)?;

        let mut variance = 0.0;
        for (symbol, derivative) in &self.derivatives {
            let Some(Operand::Uncertain(input)) = values.get(symbol) else {
                continue;
            };
            let slope = derivative
                .evaluate(&bindings)
                .map_err(UncertainError::expression)?;
            variance += slope.powi(2) * input.uncertainty().powi(2);
        }
        Ok(Uncertain::new(value, variance.sqrt()))
    }

    /// Evaluates the formula element-wise.
    ///
    /// Leaf inputs are held constant across every evaluation; sequence inputs are
    /// broadcast together and must share one shape. Without sequence inputs the result
    /// is a single leaf.
    ///
    /// # Errors
    /// Returns a shape error when sequence inputs differ in shape, and
    /// [`UncertainError::Expression`] when an evaluation fails.
    pub fn calculate(&self, values: &BTreeMap<String, Node<Operand>>) -> Result<Node<Uncertain>> {
        let mut constants = BTreeMap::new();
        let mut names = Vec::new();
        let mut arrays = Vec::new();
        for (name, node) in values {
            match node {
                Node::Leaf(operand) => {
                    constants.insert(name.clone(), *operand);
                }
                Node::Sequence(_) => {
                    names.push(name.clone());
                    arrays.push(node);
                }
            }
        }

        if arrays.is_empty() {
            return self.evaluate(&constants).map(Node::Leaf);
        }
        tracing::debug!(arrays = ?names, "calculating over sequence inputs");
        Broadcaster::default().try_apply(
            |items| {
                let mut bound = constants.clone();
                for (name, operand) in names.iter().zip(items) {
                    bound.insert(name.clone(), **operand);
                }
                self.evaluate(&bound)
            },
            &arrays,
        )
    }
}

/// Evaluates `expression` over possibly nested inputs; see [`Propagator::calculate`].
///
/// # Errors
/// See [`Propagator::new`] and [`Propagator::calculate`].
pub fn calculate<E: Expression>(
    expression: E,
    values: &BTreeMap<String, Node<Operand>>,
) -> Result<Node<Uncertain>> {
    Propagator::new(expression)?.calculate(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `constant + Σ coefficient · symbol`
    #[derive(Debug, Clone)]
    struct Linear {
        constant: f64,
        coefficients: BTreeMap<String, f64>,
    }

    fn linear(constant: f64, terms: &[(&str, f64)]) -> Linear {
        Linear {
            constant,
            coefficients: terms
                .iter()
                .map(|(name, coefficient)| ((*name).to_string(), *coefficient))
                .collect(),
        }
    }

    impl Expression for Linear {
        type Error = String;

        fn free_symbols(&self) -> BTreeSet<String> {
            self.coefficients.keys().cloned().collect()
        }

        fn differentiate(&self, symbol: &str) -> std::result::Result<Self, String> {
            let slope = self.coefficients.get(symbol).copied().unwrap_or(0.0);
            Ok(linear(slope, &[]))
        }

        fn evaluate(&self, bindings: &HashMap<String, f64>) -> std::result::Result<f64, String> {
            self.coefficients
                .iter()
                .try_fold(self.constant, |acc, (name, coefficient)| {
                    let value = bindings
                        .get(name)
                        .ok_or_else(|| format!("unbound symbol '{name}'"))?;
                    Ok(acc + coefficient * value)
                })
        }
    }

    fn bind(pairs: &[(&str, Operand)]) -> BTreeMap<String, Operand> {
        pairs
            .iter()
            .map(|(name, operand)| ((*name).to_string(), *operand))
            .collect()
    }

    #[test]
    fn test_unused_bindings_are_ignored() {
        let propagator = Propagator::new(linear(1.0, &[("x", 2.0)])).unwrap();
        let values = bind(&[
            ("x", Operand::from(Uncertain::new(3.0, 0.5))),
            ("unused", Operand::from(Uncertain::new(100.0, 50.0))),
        ]);

        let result = propagator.evaluate(&values).unwrap();

        assert_eq!(result, Uncertain::new(7.0, 1.0));
    }

    #[test]
    fn test_constant_bindings_add_no_uncertainty() {
        let propagator = Propagator::new(linear(0.0, &[("x", 3.0), ("y", 4.0)])).unwrap();
        let values = bind(&[
            ("x", Operand::from(Uncertain::new(1.0, 0.1))),
            ("y", Operand::from(2.0)),
        ]);

        let result = propagator.evaluate(&values).unwrap();

        assert!(result.approx_eq(&Uncertain::new(11.0, 0.3), 1e-12));
    }

    #[test]
    fn test_derivatives_cover_free_symbols() {
        let propagator = Propagator::new(linear(0.0, &[("a", 1.0), ("b", -2.0)])).unwrap();
        assert_eq!(propagator.expression().free_symbols().len(), 2);
        assert!(propagator.derivative("a").is_some());
        assert!(propagator.derivative("c").is_none());
    }

    #[test]
    fn test_engine_error_is_wrapped() {
        let propagator = Propagator::new(linear(0.0, &[("x", 1.0)])).unwrap();
        assert_eq!(
            propagator.evaluate(&BTreeMap::new()),
            Err(UncertainError::expression("unbound symbol 'x'"))
        );
    }

    #[test]
    fn test_calculate_broadcasts_sequences_and_holds_leaves() {
        let mut values = BTreeMap::new();
        values.insert(
            "x".to_string(),
            Node::from_leaves([Operand::from(1.0), Operand::from(Uncertain::new(2.0, 0.5))]),
        );
        values.insert("k".to_string(), Node::leaf(Operand::from(10.0)));

        let result = calculate(linear(0.0, &[("x", 2.0), ("k", 1.0)]), &values).unwrap();

        assert_eq!(
            result,
            Node::from_leaves([Uncertain::new(12.0, 0.0), Uncertain::new(14.0, 1.0)])
        );
    }
}
