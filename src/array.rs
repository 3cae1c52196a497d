//! Conversion between raw value/uncertainty arrays and arrays of [`Uncertain`].

use crate::Uncertain;
use crate::broadcast::{Node, broadcast};
use crate::error::{Result, UncertainError};

/// Pairs every value with its uncertainty, keeping the nesting shape.
///
/// `uncertainties` is either an array of the same shape as `values`, or a single
/// [`Node::Leaf`] applied to every value.
///
/// # Errors
/// Returns [`UncertainError::ShapeMismatch`] or [`UncertainError::StructureMismatch`]
/// when the arrays have different shapes.
///
/// # Example
/// ```rust
/// use errprop_rs::{Node, Uncertain, array::split};
///
/// let values = Node::from_leaves([10.0, 100.0, 80.0]);
/// let spread = split(&values, &Node::leaf(0.5)).unwrap();
/// assert_eq!(spread.into_leaves()[1], Uncertain::new(100.0, 0.5));
/// ```
pub fn split(values: &Node<f64>, uncertainties: &Node<f64>) -> Result<Node<Uncertain>> {
    match uncertainties {
        Node::Leaf(uncertainty) => Ok(values.map(|&value| Uncertain::new(value, *uncertainty))),
        Node::Sequence(_) => broadcast(
            |items| Uncertain::new(*items[0], *items[1]),
            &[values, uncertainties],
        ),
    }
}

/// Separates an array of [`Uncertain`] into a value array and an uncertainty array
/// of the same shape.
#[must_use]
pub fn join(values: &Node<Uncertain>) -> (Node<f64>, Node<f64>) {
    (
        values.map(Uncertain::value),
        values.map(Uncertain::uncertainty),
    )
}

/// Flat form of [`split`].
///
/// # Errors
/// Returns [`UncertainError::ShapeMismatch`] when the slices differ in length.
pub fn split_slices(values: &[f64], uncertainties: &[f64]) -> Result<Vec<Uncertain>> {
    if values.len() != uncertainties.len() {
        return Err(UncertainError::shape_mismatch(
            values.len(),
            uncertainties.len(),
        ));
    }
    Ok(values
        .iter()
        .zip(uncertainties)
        .map(|(&value, &uncertainty)| Uncertain::new(value, uncertainty))
        .collect())
}

/// Flat form of [`join`]
#[must_use]
pub fn join_slice(values: &[Uncertain]) -> (Vec<f64>, Vec<f64>) {
    values.iter().map(|x| x.into_parts()).unzip()
}
