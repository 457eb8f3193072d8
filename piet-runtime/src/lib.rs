//! # piet-runtime — Runtime for Piet Programs
//!
//! Loads codel grids from JSON files and runs them against the console.
//!
//! ## Execution Flow
//!
//! ```text
//! grid file (.json)
//!      ↓
//! ProgramLoader ──► Grid
//!      ↓
//! PietRuntime ──► ExecutionController (piet-core)
//!      ↑               │
//!      └── ConsoleIo ◄─┘  input requests, output
//!      ↓
//! RunReport
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use piet_runtime::{PietRuntime, RuntimeConfig};
//!
//! let mut runtime = PietRuntime::new(RuntimeConfig::default());
//! runtime.load_file("hello.json")?;
//!
//! let report = runtime.run()?;
//! println!("{} after {} steps", report.outcome.message, report.steps);
//! # Ok::<(), piet_runtime::RuntimeError>(())
//! ```

pub mod console;
pub mod error;
pub mod loader;
pub mod runtime;

pub use console::ConsoleIo;
pub use error::{RuntimeError, RuntimeResult};
pub use loader::{Program, ProgramLoader};
pub use runtime::{PietRuntime, RunReport, RuntimeConfig};

// Re-export core types
pub use piet_core::prelude::*;
