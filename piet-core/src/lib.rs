//! # Piet-Core
//!
//! Color grid model and cooperative interpreter for Piet, the language whose
//! programs are images.
//!
//! - [`color`] - The 20-color palette
//! - [`grid`] - Codel storage and the read interface the interpreter uses
//! - [`vm`] - Region discovery, exit search, transitions, stack machine and
//!   the pausable run loop

pub mod color;
pub mod grid;
pub mod prelude;
pub mod vm;

pub use color::{Color, ColorError, Hue, Lightness};
pub use grid::{CodelGrid, Grid, GridBuilder, GridError, Position};
pub use vm::{ControllerConfig, ExecutionController, ExecutionState, VmError};
