use crate::error::{Result, UncertainError};

/// A measured quantity paired with its 1-σ uncertainty.
///
/// `Uncertain` is immutable: every operation returns a new value whose uncertainty
/// is propagated to first order, assuming the operands are independent:
/// `δf = √(Σ (∂f/∂xᵢ)² · δxᵢ²)`.
///
/// # Example
/// ```rust
/// use errprop_rs::Uncertain;
///
/// let length = Uncertain::new(10.0, 2.0);
/// let width = Uncertain::new(5.0, 3.0);
/// let area = length * width;
///
/// assert_eq!(area.value(), 50.0);
/// assert!((area.uncertainty() - 1000.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Uncertain {
    value: f64,
    uncertainty: f64,
}

impl Uncertain {
    /// Creates an uncertain value.
    ///
    /// The uncertainty is stored verbatim. A negative uncertainty is not rejected; every
    /// propagation formula squares it, so it behaves like its absolute value. Use
    /// [`Uncertain::try_new`] to reject such input.
    #[must_use]
    pub const fn new(value: f64, uncertainty: f64) -> Self {
        Self { value, uncertainty }
    }

    /// Creates an exact value (zero uncertainty)
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Uncertain;
    ///
    /// let exact = Uncertain::point(42.0);
    /// assert_eq!(exact.uncertainty(), 0.0);
    /// ```
    #[must_use]
    pub const fn point(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    /// Creates an uncertain value, rejecting non-finite fields and negative uncertainty.
    ///
    /// # Errors
    /// Returns [`UncertainError::NonFiniteParameter`] if either field is NaN or infinite,
    /// and [`UncertainError::InvalidParameter`] if the uncertainty is negative.
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Uncertain;
    ///
    /// assert!(Uncertain::try_new(1.0, 0.1).is_ok());
    /// assert!(Uncertain::try_new(1.0, -0.1).is_err());
    /// ```
    pub fn try_new(value: f64, uncertainty: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(UncertainError::non_finite("value", value));
        }
        if !uncertainty.is_finite() {
            return Err(UncertainError::non_finite("uncertainty", uncertainty));
        }
        if uncertainty < 0.0 {
            return Err(UncertainError::invalid_parameter(
                "uncertainty",
                uncertainty,
                "must be non-negative",
            ));
        }
        Ok(Self::new(value, uncertainty))
    }

    /// The measured or derived quantity
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// The 1-σ uncertainty
    #[must_use]
    pub const fn uncertainty(&self) -> f64 {
        self.uncertainty
    }

    /// The pair as a `(value, uncertainty)` tuple
    #[must_use]
    pub const fn into_parts(self) -> (f64, f64) {
        (self.value, self.uncertainty)
    }

    /// Uncertainty relative to the magnitude of the value.
    ///
    /// Infinite or NaN when the value is zero.
    #[must_use]
    pub fn relative_uncertainty(&self) -> f64 {
        (self.uncertainty / self.value).abs()
    }

    /// Approximate equality of both fields, relative to their magnitude.
    ///
    /// Fields closer than `tolerance` in absolute terms are always equal, so values
    /// near zero compare sensibly.
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Uncertain;
    ///
    /// let a = Uncertain::new(0.1 + 0.2, 0.01);
    /// assert!(a.approx_eq(&Uncertain::new(0.3, 0.01), 1e-12));
    /// ```
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        close(self.value, other.value, tolerance)
            && close(self.uncertainty, other.uncertainty, tolerance)
    }
}

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff <= tolerance || diff <= tolerance * a.abs().max(b.abs())
}

impl From<f64> for Uncertain {
    fn from(value: f64) -> Self {
        Self::point(value)
    }
}

impl From<(f64, f64)> for Uncertain {
    fn from((value, uncertainty): (f64, f64)) -> Self {
        Self::new(value, uncertainty)
    }
}

/// One side of an operation: either an uncertain value or an exact constant.
///
/// Binary operations resolve the operand kind once, at the call site, and pick the
/// matching formula. A constant behaves as an [`Uncertain`] with zero uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Uncertain(Uncertain),
    Constant(f64),
}

impl Operand {
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Operand::Uncertain(u) => u.value,
            Operand::Constant(c) => *c,
        }
    }

    /// Zero for constants
    #[must_use]
    pub const fn uncertainty(&self) -> f64 {
        match self {
            Operand::Uncertain(u) => u.uncertainty,
            Operand::Constant(_) => 0.0,
        }
    }

    #[must_use]
    pub const fn is_uncertain(&self) -> bool {
        matches!(self, Operand::Uncertain(_))
    }

    /// Lifts the operand to an [`Uncertain`], giving constants zero uncertainty.
    #[must_use]
    pub const fn to_uncertain(self) -> Uncertain {
        match self {
            Operand::Uncertain(u) => u,
            Operand::Constant(c) => Uncertain::point(c),
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Constant(value)
    }
}

impl From<Uncertain> for Operand {
    fn from(value: Uncertain) -> Self {
        Operand::Uncertain(value)
    }
}
