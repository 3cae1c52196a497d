use crate::broadcast::{Node, broadcast};
use crate::error::Result;
use crate::{Operand, Uncertain};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Binary operation types, applied by tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperation {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperation {
    /// Applies the operation, lifting a constant left operand to an exact value.
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::{Uncertain, operations::BinaryOperation};
    ///
    /// let x = Uncertain::new(5.0, 3.21);
    /// let result = BinaryOperation::Sub.apply(10.0, x);
    /// assert_eq!(result.value(), 5.0);
    /// assert_eq!(result.uncertainty(), 3.21);
    /// ```
    #[must_use]
    pub fn apply(&self, left: impl Into<Operand>, right: impl Into<Operand>) -> Uncertain {
        let left = left.into().to_uncertain();
        let right = right.into();
        match self {
            BinaryOperation::Add => add(left, right),
            BinaryOperation::Sub => sub(left, right),
            BinaryOperation::Mul => mul(left, right),
            BinaryOperation::Div => div(left, right),
            BinaryOperation::Pow => left.pow(right),
        }
    }

    /// Applies the operation element-wise over two nested inputs of the same shape.
    ///
    /// # Errors
    /// Returns a shape error if the inputs differ in shape.
    pub fn broadcast(&self, left: &Node<Operand>, right: &Node<Operand>) -> Result<Node<Uncertain>> {
        broadcast(|items| self.apply(*items[0], *items[1]), &[left, right])
    }
}

fn add(a: Uncertain, b: Operand) -> Uncertain {
    Uncertain::new(
        a.value() + b.value(),
        quadrature(a.uncertainty(), b.uncertainty()),
    )
}

fn sub(a: Uncertain, b: Operand) -> Uncertain {
    Uncertain::new(
        a.value() - b.value(),
        quadrature(a.uncertainty(), b.uncertainty()),
    )
}

fn mul(a: Uncertain, b: Operand) -> Uncertain {
    let (v1, u1) = a.into_parts();
    let (v2, u2) = (b.value(), b.uncertainty());
    Uncertain::new(v1 * v2, quadrature(v1 * u2, v2 * u1))
}

fn div(a: Uncertain, b: Operand) -> Uncertain {
    let (v1, u1) = a.into_parts();
    let (v2, u2) = (b.value(), b.uncertainty());
    Uncertain::new(
        v1 / v2,
        (u2.powi(2) * (v1.powi(2) / v2.powi(4)) + u1.powi(2) / v2.powi(2)).sqrt(),
    )
}

/// `√(a² + b²)`
pub(crate) fn quadrature(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}

// Addition operations
impl Add for Uncertain {
    type Output = Uncertain;

    fn add(self, rhs: Self) -> Self::Output {
        add(self, Operand::Uncertain(rhs))
    }
}

impl Add<f64> for Uncertain {
    type Output = Uncertain;

    fn add(self, rhs: f64) -> Self::Output {
        add(self, Operand::Constant(rhs))
    }
}

impl Add<Uncertain> for f64 {
    type Output = Uncertain;

    fn add(self, rhs: Uncertain) -> Self::Output {
        Uncertain::point(self) + rhs
    }
}

// Subtraction operations
impl Sub for Uncertain {
    type Output = Uncertain;

    fn sub(self, rhs: Self) -> Self::Output {
        sub(self, Operand::Uncertain(rhs))
    }
}

impl Sub<f64> for Uncertain {
    type Output = Uncertain;

    fn sub(self, rhs: f64) -> Self::Output {
        sub(self, Operand::Constant(rhs))
    }
}

impl Sub<Uncertain> for f64 {
    type Output = Uncertain;

    fn sub(self, rhs: Uncertain) -> Self::Output {
        Uncertain::point(self) - rhs
    }
}

// Multiplication operations
impl Mul for Uncertain {
    type Output = Uncertain;

    fn mul(self, rhs: Self) -> Self::Output {
        mul(self, Operand::Uncertain(rhs))
    }
}

impl Mul<f64> for Uncertain {
    type Output = Uncertain;

    fn mul(self, rhs: f64) -> Self::Output {
        mul(self, Operand::Constant(rhs))
    }
}

impl Mul<Uncertain> for f64 {
    type Output = Uncertain;

    fn mul(self, rhs: Uncertain) -> Self::Output {
        Uncertain::point(self) * rhs
    }
}

// Division operations
impl Div for Uncertain {
    type Output = Uncertain;

    fn div(self, rhs: Self) -> Self::Output {
        div(self, Operand::Uncertain(rhs))
    }
}

impl Div<f64> for Uncertain {
    type Output = Uncertain;

    fn div(self, rhs: f64) -> Self::Output {
        div(self, Operand::Constant(rhs))
    }
}

impl Div<Uncertain> for f64 {
    type Output = Uncertain;

    fn div(self, rhs: Uncertain) -> Self::Output {
        Uncertain::point(self) / rhs
    }
}

// Negation
impl Neg for Uncertain {
    type Output = Uncertain;

    fn neg(self) -> Self::Output {
        Uncertain::new(-self.value(), self.uncertainty())
    }
}
