//! Property-based tests for propagation, formatting and broadcasting.

use errprop_rs::{Node, Uncertain, broadcast, format_uncertainty};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-12;

// Strategy for values with a non-negative uncertainty
fn uncertain() -> impl Strategy<Value = Uncertain> {
    (-1e3..1e3f64, 0.0..1e2f64).prop_map(|(value, uncertainty)| Uncertain::new(value, uncertainty))
}

fn positive_uncertain() -> impl Strategy<Value = Uncertain> {
    (1e-3..1e3f64, 0.0..1e2f64).prop_map(|(value, uncertainty)| Uncertain::new(value, uncertainty))
}

// Strategy for nested arrays up to four levels deep
fn nested() -> impl Strategy<Value = Node<f64>> {
    let leaf = (-1e3..1e3f64).prop_map(Node::Leaf);
    leaf.prop_recursive(4, 64, 6, |inner| {
        proptest::collection::vec(inner, 0..6).prop_map(Node::Sequence)
    })
}

proptest! {
    #[test]
    fn addition_commutes(a in uncertain(), b in uncertain()) {
        prop_assert!((a + b).approx_eq(&(b + a), TOLERANCE));
    }

    #[test]
    fn multiplication_commutes(a in uncertain(), b in uncertain()) {
        prop_assert!((a * b).approx_eq(&(b * a), TOLERANCE));
    }

    #[test]
    fn subtraction_uncertainty_is_symmetric(a in uncertain(), b in uncertain()) {
        let forward = a - b;
        let backward = b - a;
        prop_assert!((forward.uncertainty() - backward.uncertainty()).abs() <= TOLERANCE * forward.uncertainty().max(1.0));
        prop_assert!((forward.value() + backward.value()).abs() <= TOLERANCE * a.value().abs().max(b.value().abs()).max(1.0));
    }

    #[test]
    fn additive_and_multiplicative_identity(a in uncertain()) {
        prop_assert!((a + 0.0).approx_eq(&a, TOLERANCE));
        prop_assert!((a + Uncertain::point(0.0)).approx_eq(&a, TOLERANCE));
        prop_assert!((a * 1.0).approx_eq(&a, TOLERANCE));
    }

    #[test]
    fn sqrt_is_half_power(a in positive_uncertain()) {
        prop_assert_eq!(a.sqrt(), a.pow(0.5));
    }

    #[test]
    fn reflected_subtraction_lifts_left_operand(c in -1e3..1e3f64, a in uncertain()) {
        prop_assert_eq!(c - a, Uncertain::point(c) - a);
    }

    #[test]
    fn formatting_never_panics(value in proptest::num::f64::ANY, uncertainty in proptest::num::f64::ANY) {
        let rendered = format_uncertainty(value, uncertainty);
        prop_assert!(rendered.contains('±'));
    }

    #[test]
    fn broadcast_preserves_shape(node in nested()) {
        let doubled = broadcast(|items| items[0] + items[1], &[&node, &node]).unwrap();
        prop_assert!(doubled.same_shape(&node));

        let inputs = node.leaves();
        let outputs = doubled.leaves();
        prop_assert_eq!(inputs.len(), outputs.len());
        for (input, output) in inputs.into_iter().zip(outputs) {
            prop_assert_eq!(*output, input * 2.0);
        }
    }
}
