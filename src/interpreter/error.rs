use thiserror::Error;

/// Typed errors produced while walking the tree. Unknown operators cannot
/// occur: the operator enums are closed and matched exhaustively.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Unsupported operand types for '{operator}': {left} and {right}")]
    UnsupportedOperands {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Unsupported operand type for unary '{operator}': {operand}")]
    UnsupportedUnaryOperand {
        operator: &'static str,
        operand: &'static str,
    },
}
