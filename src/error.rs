//! Error types for the errprop-rs library.
//!
//! Arithmetic on [`Uncertain`](crate::Uncertain) values follows IEEE floating-point
//! semantics and never fails. The errors here come from collection and formula
//! operations: aggregation, broadcasting, array conversion and propagation through
//! an external expression engine.

use thiserror::Error;

/// The main error type for the errprop-rs library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UncertainError {
    /// Error when an empty collection is provided where at least one element is required.
    #[error("Empty data: at least one input is required")]
    EmptyData,

    /// Error when an invalid parameter value is provided.
    #[error("Invalid parameter '{parameter}': value {value} {constraint}")]
    InvalidParameter {
        /// The name of the parameter
        parameter: &'static str,
        /// The invalid value
        value: f64,
        /// A description of the constraint that was violated
        constraint: &'static str,
    },

    /// Error when a parameter is not finite (NaN or infinite).
    #[error("Non-finite parameter '{parameter}': {value}")]
    NonFiniteParameter {
        /// The name of the parameter
        parameter: &'static str,
        /// The non-finite value
        value: f64,
    },

    /// Error when inverse-variance weights cannot be formed.
    #[error("Invalid weights: {reason}")]
    InvalidWeights {
        /// The reason the weights are invalid
        reason: String,
    },

    /// Error when sample count is invalid.
    #[error("Invalid sample count: {count} ({reason})")]
    InvalidSampleCount {
        /// The invalid sample count
        count: usize,
        /// The reason the count is invalid
        reason: &'static str,
    },

    /// Error when two aligned sequences have different lengths.
    #[error("Shape mismatch: expected a sequence of length {expected}, got {actual}")]
    ShapeMismatch {
        /// The length of the first sequence at this position
        expected: usize,
        /// The length of the offending sequence
        actual: usize,
    },

    /// Error when a leaf is aligned with a sequence.
    #[error("Structure mismatch at depth {depth}: a leaf is aligned with a sequence")]
    StructureMismatch {
        /// Nesting depth of the offending position, 0 for the top level
        depth: usize,
    },

    /// Error when nested input is deeper than the configured limit.
    #[error("Nesting depth exceeded: inputs are nested deeper than {limit} levels")]
    DepthExceeded {
        /// The configured depth limit
        limit: usize,
    },

    /// Error reported by an expression engine while differentiating or evaluating.
    #[error("Expression error: {reason}")]
    Expression {
        /// The engine's description of the failure
        reason: String,
    },
}

/// A specialized `Result` type for uncertain operations.
///
/// This is a convenience type alias for `Result<T, UncertainError>`.
pub type Result<T> = std::result::Result<T, UncertainError>;

impl UncertainError {
    /// Create an error for invalid parameter with constraint.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::invalid_parameter("uncertainty", -1.0, "must be non-negative");
    /// assert!(error.to_string().contains("uncertainty"));
    /// ```
    pub fn invalid_parameter(
        parameter: &'static str,
        value: f64,
        constraint: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            constraint,
        }
    }

    /// Create an error for non-finite parameter.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::non_finite("value", f64::NAN);
    /// assert!(error.to_string().contains("value"));
    /// ```
    pub fn non_finite(parameter: &'static str, value: f64) -> Self {
        Self::NonFiniteParameter { parameter, value }
    }

    /// Create an error for invalid weights.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::invalid_weights("measurement 2 has zero uncertainty");
    /// assert!(error.to_string().contains("zero uncertainty"));
    /// ```
    pub fn invalid_weights(reason: impl Into<String>) -> Self {
        Self::InvalidWeights {
            reason: reason.into(),
        }
    }

    /// Create an error for invalid sample count.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::invalid_sample_count(1, "at least two samples are required");
    /// assert!(error.to_string().contains("at least two"));
    /// ```
    pub fn invalid_sample_count(count: usize, reason: &'static str) -> Self {
        Self::InvalidSampleCount { count, reason }
    }

    /// Create an error for sequences of different lengths.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::shape_mismatch(4, 3);
    /// assert!(error.to_string().contains("length 4"));
    /// ```
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Create an error for a leaf aligned with a sequence.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::structure_mismatch(2);
    /// assert!(error.to_string().contains("depth 2"));
    /// ```
    pub fn structure_mismatch(depth: usize) -> Self {
        Self::StructureMismatch { depth }
    }

    /// Create an error for input nested deeper than `limit`.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::depth_exceeded(64);
    /// assert!(error.to_string().contains("64"));
    /// ```
    pub fn depth_exceeded(limit: usize) -> Self {
        Self::DepthExceeded { limit }
    }

    /// Wrap an expression engine failure.
    ///
    /// # Example
    /// ```
    /// use errprop_rs::error::UncertainError;
    ///
    /// let error = UncertainError::expression("unbound symbol 'x'");
    /// assert!(error.to_string().contains("unbound symbol"));
    /// ```
    pub fn expression(reason: impl std::fmt::Display) -> Self {
        Self::Expression {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_data_error() {
        let error = UncertainError::EmptyData;
        assert_eq!(
            error.to_string(),
            "Empty data: at least one input is required"
        );
    }

    #[test]
    fn test_invalid_parameter_error() {
        let error = UncertainError::invalid_parameter("uncertainty", -1.0, "must be non-negative");
        assert!(error.to_string().contains("uncertainty"));
        assert!(error.to_string().contains("-1"));
        assert!(error.to_string().contains("must be non-negative"));
    }

    #[test]
    fn test_non_finite_error() {
        let error = UncertainError::non_finite("value", f64::NAN);
        assert!(error.to_string().contains("value"));
        assert!(error.to_string().contains("NaN"));
    }

    #[test]
    fn test_invalid_weights_error() {
        let error = UncertainError::invalid_weights("measurement 0 has zero uncertainty");
        assert_eq!(
            error.to_string(),
            "Invalid weights: measurement 0 has zero uncertainty"
        );
    }

    #[test]
    fn test_invalid_sample_count_error() {
        let error = UncertainError::invalid_sample_count(0, "at least two samples are required");
        assert!(error.to_string().contains('0'));
        assert!(error.to_string().contains("at least two samples"));
    }

    #[test]
    fn test_shape_mismatch_error() {
        let error = UncertainError::shape_mismatch(4, 3);
        assert_eq!(
            error.to_string(),
            "Shape mismatch: expected a sequence of length 4, got 3"
        );
    }

    #[test]
    fn test_structure_mismatch_error() {
        let error = UncertainError::structure_mismatch(1);
        assert!(error.to_string().contains("depth 1"));
        assert!(error.to_string().contains("leaf"));
    }

    #[test]
    fn test_depth_exceeded_error() {
        let error = UncertainError::depth_exceeded(8);
        assert!(error.to_string().contains("8 levels"));
    }

    #[test]
    fn test_expression_error() {
        let error = UncertainError::expression(format_args!("cannot differentiate {}", "abs"));
        assert_eq!(error.to_string(), "Expression error: cannot differentiate abs");
    }

    #[test]
    fn test_error_partial_eq() {
        let error1 = UncertainError::shape_mismatch(3, 2);
        let error2 = UncertainError::shape_mismatch(3, 2);
        let error3 = UncertainError::shape_mismatch(4, 2);

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }
}
