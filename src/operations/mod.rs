pub mod arithmetic;
pub mod functions;

pub use arithmetic::BinaryOperation;
pub use functions::UnaryOperation;
