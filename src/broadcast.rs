//! Element-wise application of n-ary functions over nested sequences.
//!
//! Inputs are [`Node`]s: either a leaf or an ordered sequence of nodes. Broadcasting
//! walks all inputs in lockstep and calls the function once per aligned set of leaves,
//! producing a result with the same nesting shape.

use crate::error::{Result, UncertainError};

/// Default nesting limit of [`Broadcaster`]
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A leaf value or an ordered sequence of nested nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T> {
    Leaf(T),
    Sequence(Vec<Node<T>>),
}

impl<T> Node<T> {
    #[must_use]
    pub fn leaf(value: T) -> Self {
        Node::Leaf(value)
    }

    pub fn sequence(items: impl IntoIterator<Item = Node<T>>) -> Self {
        Node::Sequence(items.into_iter().collect())
    }

    /// A flat sequence of leaves
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Node;
    ///
    /// let flat = Node::from_leaves([1.0, 2.0, 3.0]);
    /// assert_eq!(flat.leaf_count(), 3);
    /// assert_eq!(flat.depth(), 1);
    /// ```
    pub fn from_leaves(items: impl IntoIterator<Item = T>) -> Self {
        Node::Sequence(items.into_iter().map(Node::Leaf).collect())
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Number of leaves at any depth
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Sequence(items) => items.iter().map(Node::leaf_count).sum(),
        }
    }

    /// Nesting depth; a leaf has depth 0
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Sequence(items) => 1 + items.iter().map(Node::depth).max().unwrap_or(0),
        }
    }

    /// Leaves in depth-first, left-to-right order
    #[must_use]
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Node::Leaf(value) => out.push(value),
            Node::Sequence(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
        }
    }

    /// Consumes the node, returning its leaves in depth-first order
    #[must_use]
    pub fn into_leaves(self) -> Vec<T> {
        match self {
            Node::Leaf(value) => vec![value],
            Node::Sequence(items) => items.into_iter().flat_map(Node::into_leaves).collect(),
        }
    }

    /// Transforms every leaf, keeping the shape
    #[must_use]
    pub fn map<R, F>(&self, mut transform: F) -> Node<R>
    where
        F: FnMut(&T) -> R,
    {
        self.map_inner(&mut transform)
    }

    fn map_inner<R, F>(&self, transform: &mut F) -> Node<R>
    where
        F: FnMut(&T) -> R,
    {
        match self {
            Node::Leaf(value) => Node::Leaf(transform(value)),
            Node::Sequence(items) => {
                Node::Sequence(items.iter().map(|item| item.map_inner(transform)).collect())
            }
        }
    }

    /// Whether both nodes have the same nesting structure and lengths
    #[must_use]
    pub fn same_shape<U>(&self, other: &Node<U>) -> bool {
        match (self, other) {
            (Node::Leaf(_), Node::Leaf(_)) => true,
            (Node::Sequence(a), Node::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        }
    }
}

/// Broadcasting configuration.
///
/// `max_depth` bounds the recursion; `None` disables the check for trusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Broadcaster {
    pub max_depth: Option<usize>,
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl Broadcaster {
    /// Applies `function` to every aligned set of leaves of `inputs`.
    ///
    /// # Errors
    /// Returns [`UncertainError::EmptyData`] when `inputs` is empty,
    /// [`UncertainError::ShapeMismatch`] when aligned sequences differ in length,
    /// [`UncertainError::StructureMismatch`] when a leaf is aligned with a sequence and
    /// [`UncertainError::DepthExceeded`] when nesting exceeds `max_depth`.
    pub fn apply<T, R, F>(&self, function: F, inputs: &[&Node<T>]) -> Result<Node<R>>
    where
        F: FnMut(&[&T]) -> R,
    {
        let mut function = function;
        self.try_apply(|items| Ok(function(items)), inputs)
    }

    /// Like [`Broadcaster::apply`], for functions that can fail.
    ///
    /// The first error returned by `function` stops the walk and is returned as is.
    ///
    /// # Errors
    /// See [`Broadcaster::apply`].
    pub fn try_apply<T, R, F>(&self, mut function: F, inputs: &[&Node<T>]) -> Result<Node<R>>
    where
        F: FnMut(&[&T]) -> Result<R>,
    {
        if inputs.is_empty() {
            return Err(UncertainError::EmptyData);
        }
        tracing::debug!(inputs = inputs.len(), "broadcasting over nested inputs");
        self.walk(&mut function, inputs, 0)
    }

    fn walk<'a, T, R, F>(&self, function: &mut F, inputs: &[&'a Node<T>], depth: usize) -> Result<Node<R>>
    where
        F: FnMut(&[&T]) -> Result<R>,
    {
        let mut leaves: Vec<&'a T> = Vec::with_capacity(inputs.len());
        let mut sequences: Vec<&'a [Node<T>]> = Vec::with_capacity(inputs.len());
        for &node in inputs {
            match node {
                Node::Leaf(value) => leaves.push(value),
                Node::Sequence(items) => sequences.push(items),
            }
        }

        if sequences.is_empty() {
            return function(&leaves).map(Node::Leaf);
        }
        if !leaves.is_empty() {
            return Err(UncertainError::structure_mismatch(depth));
        }
        if let Some(limit) = self.max_depth {
            if depth >= limit {
                return Err(UncertainError::depth_exceeded(limit));
            }
        }

        let expected = sequences[0].len();
        if let Some(items) = sequences.iter().find(|items| items.len() != expected) {
            return Err(UncertainError::shape_mismatch(expected, items.len()));
        }

        let mut result = Vec::with_capacity(expected);
        let mut aligned: Vec<&'a Node<T>> = Vec::with_capacity(sequences.len());
        for index in 0..expected {
            aligned.clear();
            aligned.extend(sequences.iter().map(|&items| &items[index]));
            result.push(self.walk(function, &aligned, depth + 1)?);
        }
        Ok(Node::Sequence(result))
    }
}

/// Applies `function` element-wise with the default [`Broadcaster`].
///
/// The function receives one leaf per input, in input order.
///
/// # Errors
/// See [`Broadcaster::apply`].
///
/// # Example
/// ```rust
/// use errprop_rs::{Node, broadcast};
///
/// let a = Node::sequence([Node::leaf(1), Node::from_leaves([2, 3])]);
/// let b = Node::sequence([Node::leaf(10), Node::from_leaves([20, 30])]);
///
/// let sums = broadcast(|items| items[0] + items[1], &[&a, &b]).unwrap();
/// assert_eq!(sums, Node::sequence([Node::leaf(11), Node::from_leaves([22, 33])]));
/// ```
pub fn broadcast<T, R, F>(function: F, inputs: &[&Node<T>]) -> Result<Node<R>>
where
    F: FnMut(&[&T]) -> R,
{
    Broadcaster::default().apply(function, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(values: [i64; 10]) -> Node<i64> {
        let v = values;
        Node::sequence([
            Node::leaf(v[0]),
            Node::leaf(v[1]),
            Node::leaf(v[2]),
            Node::sequence([
                Node::leaf(v[3]),
                Node::leaf(v[4]),
                Node::leaf(v[5]),
                Node::from_leaves([v[6], v[7]]),
                Node::leaf(v[8]),
            ]),
            Node::leaf(v[9]),
        ])
    }

    #[test]
    fn test_three_way_sum() {
        let a = nested([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let b = nested([10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        let c = nested([100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]);

        let result = broadcast(|items| items.iter().copied().sum::<i64>(), &[&a, &b, &c]).unwrap();

        assert_eq!(
            result,
            nested([111, 222, 333, 444, 555, 666, 777, 888, 999, 1110])
        );
        assert!(result.same_shape(&a));
    }

    #[test]
    fn test_arguments_arrive_in_input_order() {
        let a = Node::from_leaves([10, 20]);
        let b = Node::from_leaves([1, 2]);
        let result = broadcast(|items| items[0] - items[1], &[&a, &b]).unwrap();
        assert_eq!(result, Node::from_leaves([9, 18]));
    }

    #[test]
    fn test_leaf_inputs_produce_leaf() {
        let result = broadcast(|items| items[0] * items[1], &[&Node::leaf(3), &Node::leaf(4)]).unwrap();
        assert_eq!(result, Node::leaf(12));
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let a = Node::from_leaves([1, 2, 3]);
        let b = Node::from_leaves([1, 2]);
        assert_eq!(
            broadcast(|items| items[0] + items[1], &[&a, &b]),
            Err(UncertainError::shape_mismatch(3, 2))
        );
    }

    #[test]
    fn test_leaf_against_sequence_is_an_error() {
        let a = Node::sequence([Node::leaf(1), Node::leaf(2)]);
        let b = Node::sequence([Node::leaf(1), Node::from_leaves([2, 3])]);
        assert_eq!(
            broadcast(|items| items[0] + items[1], &[&a, &b]),
            Err(UncertainError::structure_mismatch(1))
        );
    }

    #[test]
    fn test_no_inputs_is_an_error() {
        let inputs: [&Node<i32>; 0] = [];
        assert_eq!(
            broadcast(|items| items.len(), &inputs),
            Err(UncertainError::EmptyData)
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut deep = Node::leaf(1);
        for _ in 0..5 {
            deep = Node::sequence([deep]);
        }

        let shallow = Broadcaster { max_depth: Some(3) };
        assert_eq!(
            shallow.apply(|items| *items[0], &[&deep]),
            Err(UncertainError::depth_exceeded(3))
        );

        let unbounded = Broadcaster { max_depth: None };
        assert_eq!(unbounded.apply(|items| *items[0], &[&deep]).unwrap(), deep);
    }

    #[test]
    fn test_try_apply_stops_at_first_error() {
        let a = Node::from_leaves([1, -1, 2]);
        let mut calls = 0;
        let result = Broadcaster::default().try_apply(
            |items| {
                calls += 1;
                if *items[0] < 0 {
                    Err(UncertainError::expression("negative input"))
                } else {
                    Ok(*items[0])
                }
            },
            &[&a],
        );
        assert_eq!(result, Err(UncertainError::expression("negative input")));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_empty_sequences_keep_shape() {
        let a: Node<i32> = Node::sequence([Node::sequence([]), Node::from_leaves([1])]);
        let result = broadcast(|items| *items[0] * 2, &[&a, &a]).unwrap();
        assert!(result.same_shape(&a));
        assert_eq!(result.into_leaves(), vec![2]);
    }

    #[test]
    fn test_node_helpers() {
        let node = nested([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(node.leaf_count(), 10);
        assert_eq!(node.depth(), 3);
        assert_eq!(
            node.leaves().into_iter().copied().collect::<Vec<_>>(),
            (1..=10).collect::<Vec<_>>()
        );
        assert_eq!(node.map(|x| x * 2).into_leaves()[9], 20);
        assert!(!node.is_leaf());
        assert!(!node.same_shape(&Node::from_leaves([1, 2])));
    }
}
