//! # errprop-rs
//!
//! Values with measurement uncertainty, and first-order propagation of that
//! uncertainty through arithmetic and formulas.
//!
//! ## Core Concept: Closed-Form Propagation
//!
//! Every operation on an [`Uncertain`] value computes the new value together with its
//! uncertainty `δf = √(Σ (∂f/∂xᵢ)² · δxᵢ²)`, assuming independent errors. Plain `f64`
//! operands are exact values.
//!
//! ```rust
//! use errprop_rs::Uncertain;
//!
//! let distance = Uncertain::new(321.856, 0.0324);
//! let time = Uncertain::new(10.0, 0.1);
//!
//! let speed = distance / time;
//! println!("{speed}"); // 32.2 ± 0.3
//!
//! assert_eq!(distance.to_string(), "321.86 ± 0.03");
//! ```
//!
//! ## Features
//!
//! - **Operator overloading**: `+ - * /` and negation between uncertain values and `f64`
//! - **Functions**: `pow` with constant or uncertain exponents, `ln`, `sin`, `cos`, `exp`, `sqrt`
//! - **Significant figures**: `Display` rounds to the precision the uncertainty supports
//! - **Broadcasting**: lift any n-ary operation over nested sequences with [`broadcast`]
//! - **Aggregation**: inverse-variance [`weighted_average`]
//! - **Formulas**: propagate through expressions from an external symbolic engine
//! - **Monte Carlo**: cross-check the linearized formulas by sampling

pub mod array;
pub mod broadcast;
pub mod distributions;
pub mod error;
pub mod format;
pub mod operations;
pub mod propagation;
pub mod statistics;
pub mod uncertain;

pub use broadcast::{Broadcaster, Node, broadcast};
pub use error::{Result, UncertainError};
pub use format::{FormatOptions, format_uncertainty};
pub use statistics::{MonteCarlo, weighted_average};
pub use uncertain::{Operand, Uncertain};

pub use operations::{BinaryOperation, UnaryOperation};
