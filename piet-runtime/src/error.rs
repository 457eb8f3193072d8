//! Error types for the Piet runtime

use piet_core::color::ColorError;
use piet_core::grid::GridError;
use piet_core::vm::VmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid program format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Invalid codel at row {row}, column {column}: {source}")]
    InvalidCodel {
        row: usize,
        column: usize,
        #[source]
        source: ColorError,
    },

    #[error("Invalid grid: {0}")]
    GridError(#[from] GridError),

    #[error("Interpreter error: {0}")]
    ExecutionError(#[from] VmError),

    #[error("No program loaded")]
    NoProgramLoaded,

    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("Invalid input: expected an integer, got {0:?}")]
    InvalidInput(String),

    #[error("Input exhausted while the program was waiting for a value")]
    InputExhausted,
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
