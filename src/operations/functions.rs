use crate::{Operand, Uncertain};

/// Unary operation types, applied by tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperation {
    Neg,
    Ln,
    Sin,
    Cos,
    Exp,
    Sqrt,
}

impl UnaryOperation {
    #[must_use]
    pub fn apply(&self, operand: impl Into<Operand>) -> Uncertain {
        let x = operand.into().to_uncertain();
        match self {
            UnaryOperation::Neg => -x,
            UnaryOperation::Ln => x.ln(),
            UnaryOperation::Sin => x.sin(),
            UnaryOperation::Cos => x.cos(),
            UnaryOperation::Exp => x.exp(),
            UnaryOperation::Sqrt => x.sqrt(),
        }
    }
}

// Additional mathematical operations with closed-form propagation
impl Uncertain {
    /// Raises the uncertain value to a power.
    ///
    /// A constant exponent `p` propagates `√(u² · v^(2p) · p² / v²)`. An uncertain
    /// exponent `(p, uₚ)` adds the term `uₚ² · v^(2p) · ln(v)²`, which is NaN for a
    /// non-positive base.
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Uncertain;
    ///
    /// let base = Uncertain::new(10.0, 3.0);
    /// let squared = base.pow(2.0);
    /// assert_eq!(squared.value(), 100.0);
    /// assert!((squared.uncertainty() - 60.0).abs() < 1e-9);
    ///
    /// let uncertain_power = base.pow(Uncertain::new(2.0, 1.0));
    /// assert!(uncertain_power.uncertainty() > squared.uncertainty());
    /// ```
    #[must_use]
    pub fn pow(&self, exponent: impl Into<Operand>) -> Uncertain {
        let (v, u) = self.into_parts();
        let exponent = exponent.into();
        let p = exponent.value();
        let square = v.powf(2.0 * p);
        let base_term = u.powi(2) * ((square * p.powi(2)) / v.powi(2));
        let variance = match exponent {
            Operand::Constant(_) => base_term,
            Operand::Uncertain(power) => {
                base_term + power.uncertainty().powi(2) * (square * v.ln().powi(2))
            }
        };
        Uncertain::new(v.powf(p), variance.sqrt())
    }

    /// Takes the square root, defined as `self.pow(0.5)`
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Uncertain;
    ///
    /// let x = Uncertain::new(16.0, 3.0);
    /// assert_eq!(x.sqrt(), x.pow(0.5));
    /// ```
    #[must_use]
    pub fn sqrt(&self) -> Uncertain {
        self.pow(0.5)
    }

    /// Takes the natural logarithm, propagating `√(u² / v²)`
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Uncertain;
    ///
    /// let x = Uncertain::new(10.0, 2.0);
    /// let ln_x = x.ln();
    /// assert!((ln_x.uncertainty() - 0.2).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn ln(&self) -> Uncertain {
        let (v, u) = self.into_parts();
        Uncertain::new(v.ln(), (u.powi(2) / v.powi(2)).sqrt())
    }

    /// Applies sine, propagating `√(u² · cos(v)²)`
    #[must_use]
    pub fn sin(&self) -> Uncertain {
        let (v, u) = self.into_parts();
        Uncertain::new(v.sin(), (u.powi(2) * v.cos().powi(2)).sqrt())
    }

    /// Applies cosine, propagating `√(u² · sin(v)²)`
    #[must_use]
    pub fn cos(&self) -> Uncertain {
        let (v, u) = self.into_parts();
        Uncertain::new(v.cos(), (u.powi(2) * v.sin().powi(2)).sqrt())
    }

    /// Takes the exponential, propagating `√(u² · e^(2v))`
    #[must_use]
    pub fn exp(&self) -> Uncertain {
        let (v, u) = self.into_parts();
        let value = v.exp();
        Uncertain::new(value, (u.powi(2) * value.powi(2)).sqrt())
    }
}
