//! # VM — Piet Interpreter
//!
//! Cooperative interpreter for Piet programs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     ExecutionController                          │
//! │   position · (dp, cc) · state · step budget · history            │
//! │                                                                  │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌──────────┐ │
//! │  │  region    │──►│  search    │──►│ transition │──►│ machine  │ │
//! │  │ flood fill │   │ 8 attempts │   │ 3×6 table  │   │  stack   │ │
//! │  └────────────┘   └────────────┘   └────────────┘   └────┬─────┘ │
//! └──────────────────────────────────────────────────────────┼───────┘
//!                                                            ▼
//!                                          io: requests · output · diagnostics
//! ```
//!
//! ## Modules
//!
//! - [`pointer`] - DP, CC and the retry sequence
//! - [`region`] - Color block discovery
//! - [`search`] - Next codel search
//! - [`transition`] - Color step → instruction
//! - [`instruction`] - Instruction set
//! - [`machine`] - Operand stack and execution
//! - [`io`] - Host collaborators
//! - [`controller`] - Run loop, pause/resume
//! - [`config`] - Environment settings
//!
//! ## Usage
//!
//! ```
//! use piet_core::color::Color;
//! use piet_core::grid::Grid;
//! use piet_core::vm::{BufferedIo, ControllerConfig, ExecutionController, ExecutionState};
//!
//! let grid = Grid::new(3, 3, Color::Red).unwrap();
//! let mut io = BufferedIo::new();
//! let mut controller = ExecutionController::start(&grid, ControllerConfig::default());
//!
//! assert_eq!(controller.run(&mut io), ExecutionState::Completed);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod instruction;
pub mod io;
pub mod machine;
pub mod pointer;
pub mod region;
pub mod search;
pub mod state;
pub mod transition;

// Re-exports
pub use controller::{ControllerConfig, ExecutionController};
pub use error::{VmError, VmResult};
pub use instruction::Instruction;
pub use io::{
    BufferedIo, DiagnosticSink, ExecutionRecord, InputRequester, IoContext, IoEvent, OutputSink,
};
pub use machine::{Effect, MachineStats, OperandStack, StackMachine};
pub use pointer::{Attempt, Chooser, Direction, MAX_ATTEMPTS, PointerState, Recovery};
pub use region::{ColorBlock, find_block};
pub use search::{SearchOutcome, search};
pub use state::{ExecutionState, InputKind, RunOutcome, RunStatus};
pub use transition::{PaletteEntry, palette, resolve};
