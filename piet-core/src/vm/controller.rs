//! Execution controller
//!
//! Owns the run loop: block discovery, exit search, transition and
//! execution, one move per [`step`](ExecutionController::step).
//!
//! Input is cooperative. An input instruction leaves the controller `Paused`
//! and hands control back to the caller; the caller supplies the value with
//! [`resume`](ExecutionController::resume) whenever it has one. Nothing blocks
//! and nothing polls.
//!
//! ```text
//!            step/run                   resume(v)
//!   Running ─────────► Paused(kind) ──────────────► Running
//!      │                   │
//!      │ no exit           │ terminate
//!      ▼                   ▼
//!   Completed            Failed ◄── fatal error / terminate
//! ```

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::grid::{CodelGrid, Position};

use super::config;
use super::error::{VmError, VmResult};
use super::io::{ExecutionRecord, IoContext};
use super::machine::{Effect, MachineStats, OperandStack, StackMachine};
use super::pointer::PointerState;
use super::region::find_block;
use super::search::search;
use super::state::{ExecutionState, RunOutcome};
use super::transition::resolve;

/// Controller limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Moves [`run`](ExecutionController::run) may make over the whole
    /// program lifetime, `None` for no limit
    pub max_steps: Option<u64>,
    /// Executed instructions kept in the history ring
    pub history_limit: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            history_limit: config::DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ControllerConfig {
    /// Limits from `PIET_MAX_STEPS` / `PIET_HISTORY_LIMIT`
    pub fn from_env() -> Self {
        Self {
            max_steps: config::max_steps(),
            history_limit: config::history_limit(),
        }
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }
}

/// Drives one program over a borrowed grid
///
/// The grid is borrowed immutably for the controller's whole lifetime, so it
/// cannot change under a run.
#[derive(Debug)]
pub struct ExecutionController<'g, G: CodelGrid + ?Sized> {
    grid: &'g G,
    config: ControllerConfig,
    machine: StackMachine,
    pointer: PointerState,
    position: Position,
    state: ExecutionState,
    steps: u64,
    history: VecDeque<ExecutionRecord>,
    failure: Option<VmError>,
}

impl<'g, G: CodelGrid + ?Sized> ExecutionController<'g, G> {
    /// Start a run at the grid origin with DP right, CC left and an empty stack
    pub fn start(grid: &'g G, config: ControllerConfig) -> Self {
        info!(
            width = grid.width(),
            height = grid.height(),
            max_steps = ?config.max_steps,
            "starting run"
        );
        Self {
            grid,
            config,
            machine: StackMachine::new(),
            pointer: PointerState::default(),
            position: Position::ORIGIN,
            state: ExecutionState::Running,
            steps: 0,
            history: VecDeque::new(),
            failure: None,
        }
    }

    /// Back to the initial state, same grid and config
    pub fn restart(&mut self) {
        self.machine.reset();
        self.pointer = PointerState::default();
        self.position = Position::ORIGIN;
        self.state = ExecutionState::Running;
        self.steps = 0;
        self.history.clear();
        self.failure = None;
        info!("run restarted");
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STEPPING
    // ═══════════════════════════════════════════════════════════════════════

    /// Make one move
    ///
    /// No-op unless the state is `Running`. Fatal errors are absorbed into
    /// `Failed` and kept in [`failure`](Self::failure).
    pub fn step(&mut self, io: &mut dyn IoContext) -> ExecutionState {
        if self.state != ExecutionState::Running {
            return self.state;
        }
        match self.advance(io) {
            Ok(state) => state,
            Err(err) => self.fail(err),
        }
    }

    /// Step until the program pauses, halts, fails or exhausts its step budget
    ///
    /// With the budget exhausted the state is still `Running`, see
    /// [`budget_exhausted`](Self::budget_exhausted).
    pub fn run(&mut self, io: &mut dyn IoContext) -> ExecutionState {
        while self.state == ExecutionState::Running && !self.budget_exhausted() {
            self.step(io);
        }
        if self.budget_exhausted() && self.state == ExecutionState::Running {
            debug!(steps = self.steps, "step budget exhausted");
        }
        self.state
    }

    fn advance(&mut self, io: &mut dyn IoContext) -> VmResult<ExecutionState> {
        let position = self.position;
        let seed = self
            .grid
            .codel(position.x, position.y)
            .ok_or(VmError::OutOfGrid { position })?;

        let block = find_block(self.grid, seed);
        let outcome = search(self.grid, &block, &mut self.pointer);

        let Some(next) = outcome.next else {
            info!(steps = self.steps, %position, "no exit from block, program completed");
            self.state = ExecutionState::Completed;
            return Ok(self.state);
        };

        let instruction = resolve(block.color(), next.color);
        debug!(
            step = self.steps,
            from = %position,
            to = %next.position,
            block_size = block.len(),
            %instruction,
            crossed_white = outcome.crossed_white,
            pointer = %self.pointer,
            "move"
        );

        let effect = if outcome.crossed_white {
            Effect::Continue
        } else {
            let effect = self
                .machine
                .execute(instruction, block.len(), &mut self.pointer, io)?;
            if let Some(record) = self.machine.last_record().copied() {
                self.remember(record);
            }
            effect
        };

        self.position = next.position;
        self.steps += 1;

        if let Effect::AwaitInput(kind) = effect {
            info!(%kind, position = %self.position, "waiting for input");
            self.state = ExecutionState::Paused(kind);
        }
        Ok(self.state)
    }

    fn remember(&mut self, record: ExecutionRecord) {
        if self.config.history_limit == 0 {
            return;
        }
        if self.history.len() >= self.config.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }

    fn fail(&mut self, err: VmError) -> ExecutionState {
        warn!(error = %err, position = %self.position, steps = self.steps, "run failed");
        self.failure = Some(err);
        self.state = ExecutionState::Failed;
        self.state
    }

    // ═══════════════════════════════════════════════════════════════════════
    // HOST CONTROL
    // ═══════════════════════════════════════════════════════════════════════

    /// Push the value an input instruction asked for, without running
    pub fn supply_input(&mut self, value: i64) -> VmResult<()> {
        let ExecutionState::Paused(kind) = self.state else {
            return Err(VmError::NotPaused { state: self.state });
        };
        info!(%kind, value, "input supplied");
        self.machine.push_input(value);
        self.state = ExecutionState::Running;
        Ok(())
    }

    /// Push the awaited value and keep running
    pub fn resume(&mut self, value: i64, io: &mut dyn IoContext) -> VmResult<ExecutionState> {
        self.supply_input(value)?;
        Ok(self.run(io))
    }

    /// [`resume`](Self::resume) with a character's code point
    pub fn resume_char(&mut self, c: char, io: &mut dyn IoContext) -> VmResult<ExecutionState> {
        self.resume(i64::from(u32::from(c)), io)
    }

    /// Abort from any state
    ///
    /// An earlier failure reason is kept.
    pub fn terminate(&mut self) {
        info!(state = %self.state, "terminated by host");
        if self.failure.is_none() {
            self.failure = Some(VmError::Terminated);
        }
        self.state = ExecutionState::Failed;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INSPECTION
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    #[inline]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Codel the next step starts from
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn stack(&self) -> &OperandStack {
        self.machine.stack()
    }

    /// Moves made so far
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether `run` would stop because of `max_steps`
    #[inline]
    pub fn budget_exhausted(&self) -> bool {
        self.config.max_steps.is_some_and(|max| self.steps >= max)
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &'g G {
        self.grid
    }

    /// Error that moved the run to `Failed`
    #[inline]
    pub fn failure(&self) -> Option<&VmError> {
        self.failure.as_ref()
    }

    /// Most recent executed instructions, oldest first
    pub fn history(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.history.iter()
    }

    #[inline]
    pub fn stats(&self) -> &MachineStats {
        self.machine.stats()
    }

    /// Terminal result, `None` while the run can still make progress
    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.state {
            ExecutionState::Completed => Some(RunOutcome::completed()),
            ExecutionState::Failed => Some(RunOutcome::failed(
                self.failure
                    .as_ref()
                    .map_or_else(|| "execution failed".to_string(), ToString::to_string),
            )),
            ExecutionState::Running | ExecutionState::Paused(_) => None,
        }
    }
}
