//! # Prelude
//!
//! ```
//! use piet_core::prelude::*;
//! ```

// Palette
pub use crate::color::{Color, ColorError, ColorResult, Hue, Lightness};

// Grid
pub use crate::grid::{Codel, CodelGrid, Grid, GridBuilder, GridError, GridResult, Position};

// Interpreter
pub use crate::vm::{
    BufferedIo, Chooser, ControllerConfig, Direction, ExecutionController, ExecutionRecord,
    ExecutionState, InputKind, Instruction, IoContext, IoEvent, OperandStack, PointerState,
    RunOutcome, RunStatus, VmError, VmResult,
};
