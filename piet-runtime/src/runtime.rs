//! Main runtime implementation

use std::io::{BufRead, Write};
use std::path::Path;

use piet_core::grid::{CodelGrid, Grid};
use piet_core::vm::{
    ControllerConfig, ExecutionController, ExecutionRecord, ExecutionState, RunOutcome, config,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::console::ConsoleIo;
use crate::error::{RuntimeError, RuntimeResult};
use crate::loader::{Program, ProgramLoader};

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Step budget, `None` for unbounded
    pub max_steps: Option<u64>,

    /// Executed instructions kept for the report
    pub history_limit: usize,

    /// Debug mode
    pub debug: bool,

    /// Log every executed instruction
    pub trace_instructions: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            history_limit: config::DEFAULT_HISTORY_LIMIT,
            debug: false,
            trace_instructions: false,
        }
    }
}

impl RuntimeConfig {
    /// Limits from `PIET_MAX_STEPS` / `PIET_HISTORY_LIMIT`
    pub fn from_env() -> Self {
        let controller = ControllerConfig::from_env();
        Self {
            max_steps: controller.max_steps,
            history_limit: controller.history_limit,
            ..Self::default()
        }
    }

    fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            max_steps: self.max_steps,
            history_limit: self.history_limit,
        }
    }
}

/// Result of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Moves made
    pub steps: u64,
    /// Final stack, bottom → top
    pub stack: Vec<i64>,
    /// Last executed instructions, oldest first
    pub history: Vec<ExecutionRecord>,
}

impl RunReport {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Loads a program and drives it to completion against a console
pub struct PietRuntime {
    config: RuntimeConfig,
    program: Option<Program>,
}

impl PietRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            program: None,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// Load a grid file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> RuntimeResult<()> {
        info!(path = %path.as_ref().display(), "loading program");
        self.program = Some(ProgramLoader::load_file(path)?);
        Ok(())
    }

    /// Load grid JSON directly
    pub fn load_source(&mut self, source: &str) -> RuntimeResult<()> {
        self.program = Some(ProgramLoader::parse(source)?);
        Ok(())
    }

    /// Load an in-memory grid
    pub fn load_grid(&mut self, grid: Grid) {
        self.program = Some(Program::new(grid));
    }

    /// Run against stdin/stdout
    pub fn run(&self) -> RuntimeResult<RunReport> {
        let mut io = ConsoleIo::stdio().with_instruction_trace(self.config.trace_instructions);
        self.run_with(&mut io)
    }

    /// Run against `io`
    ///
    /// Every pause is serviced by reading from the console and resuming.
    /// Running out of steps or of valid input terminates the run and is an
    /// error; a program failure is reported in the [`RunReport`].
    pub fn run_with<R: BufRead, W: Write>(
        &self,
        io: &mut ConsoleIo<R, W>,
    ) -> RuntimeResult<RunReport> {
        let program = self.program.as_ref().ok_or(RuntimeError::NoProgramLoaded)?;
        let grid = &program.grid;
        info!(
            name = program.name.as_deref().unwrap_or("<unnamed>"),
            width = grid.width(),
            height = grid.height(),
            "running program"
        );

        let mut controller = ExecutionController::start(grid, self.config.controller_config());

        loop {
            let state = controller.run(io);
            io.flush()?;

            match state {
                ExecutionState::Completed | ExecutionState::Failed => break,
                ExecutionState::Paused(kind) => {
                    debug!(%kind, steps = controller.steps(), "reading input");
                    match io.read_value(kind) {
                        Ok(value) => controller.supply_input(value)?,
                        Err(err) => {
                            controller.terminate();
                            return Err(err);
                        }
                    }
                }
                ExecutionState::Running => {
                    let limit = controller.config().max_steps.unwrap_or(controller.steps());
                    controller.terminate();
                    return Err(RuntimeError::StepLimitExceeded { limit });
                }
            }
        }

        let outcome = controller
            .outcome()
            .unwrap_or_else(|| RunOutcome::failed("run ended without an outcome"));
        info!(status = ?outcome.status, steps = controller.steps(), "{}", outcome.message);

        let report = RunReport {
            outcome,
            steps: controller.steps(),
            stack: controller.stack().as_slice().to_vec(),
            history: controller.history().copied().collect(),
        };

        if self.config.debug {
            Self::print_report(&report);
        }
        Ok(report)
    }

    /// Print report summary
    fn print_report(report: &RunReport) {
        eprintln!();
        eprintln!("{}", "═".repeat(60));
        eprintln!("status : {:?}", report.outcome.status);
        eprintln!("message: {}", report.outcome.message);
        eprintln!("steps  : {}", report.steps);
        eprintln!("stack  : {:?}", report.stack);
        if !report.history.is_empty() {
            eprintln!("last instructions:");
            for record in report.history.iter().rev().take(10).rev() {
                eprintln!("   {record}");
            }
        }
        eprintln!("{}", "═".repeat(60));
    }
}
