//! Interpreter errors

use thiserror::Error;

use super::instruction::Instruction;
use super::state::ExecutionState;
use crate::grid::Position;

/// Result type for the interpreter
pub type VmResult<T> = Result<T, VmError>;

/// Interpreter errors
///
/// Everything except [`VmError::NotPaused`] is fatal: the controller moves to
/// `Failed` and keeps the error for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// Stack underflow
    #[error("{instruction} needs {required} operand(s), stack holds {available}")]
    InsufficientOperands {
        instruction: Instruction,
        required: usize,
        available: usize,
    },

    /// Divide or Modulo by zero
    #[error("{instruction} by zero")]
    DivisionByZero { instruction: Instruction },

    /// Roll depth negative or deeper than the stack
    #[error("invalid roll depth {depth}: stack holds {available}")]
    InvalidRollDepth { depth: i64, available: usize },

    /// Result does not fit in an i64
    #[error("{instruction} overflowed")]
    Overflow { instruction: Instruction },

    /// OutputCharacter on a value that is not a Unicode scalar
    #[error("{value} is not a valid character code")]
    InvalidCharacter { value: i64 },

    /// Current position does not exist in the grid
    #[error("position {position} is outside the grid")]
    OutOfGrid { position: Position },

    /// Aborted by the host
    #[error("execution terminated by host")]
    Terminated,

    /// Resume called while not waiting for input
    #[error("cannot resume: controller is {state}")]
    NotPaused { state: ExecutionState },
}

impl VmError {
    /// Whether the error aborts the run
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NotPaused { .. })
    }
}
