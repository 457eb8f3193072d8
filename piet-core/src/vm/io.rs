//! Collaborators the interpreter talks to
//!
//! The core never blocks on I/O. Input instructions only *announce* that a
//! value is needed ([`InputRequester`]) and the host later supplies it through
//! [`ExecutionController::resume`](super::controller::ExecutionController::resume).
//! Output and diagnostics are fire-and-forget.

use serde::Serialize;

use super::instruction::Instruction;

/// One executed instruction, as seen by diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    pub instruction: Instruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand_a: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand_b: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<i64>,
}

impl ExecutionRecord {
    pub const fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            operand_a: None,
            operand_b: None,
            result: None,
        }
    }

    pub const fn with_operands(mut self, a: i64, b: i64) -> Self {
        self.operand_a = Some(a);
        self.operand_b = Some(b);
        self
    }

    pub const fn with_operand(mut self, a: i64) -> Self {
        self.operand_a = Some(a);
        self
    }

    pub const fn with_result(mut self, result: i64) -> Self {
        self.result = Some(result);
        self
    }
}

impl std::fmt::Display for ExecutionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.instruction)?;
        match (self.operand_a, self.operand_b) {
            (Some(a), Some(b)) => write!(f, " {a}, {b}")?,
            (Some(a), None) => write!(f, " {a}")?,
            _ => {}
        }
        if let Some(result) = self.result {
            write!(f, " -> {result}")?;
        }
        Ok(())
    }
}

/// Receives requests for input values
pub trait InputRequester {
    fn request_integer(&mut self);
    fn request_character(&mut self);
}

/// Receives program output
pub trait OutputSink {
    fn emit_integer(&mut self, value: i64);
    fn emit_character(&mut self, value: char);
}

/// Observes execution, never feeds back into it
pub trait DiagnosticSink {
    /// Called after every executed instruction
    fn record(&mut self, _record: &ExecutionRecord) {}

    /// Stack snapshot (bottom → top) after every executed instruction
    fn stack_changed(&mut self, _stack: &[i64]) {}
}

/// Everything the interpreter needs from its host
pub trait IoContext: InputRequester + OutputSink + DiagnosticSink {}

impl<T: InputRequester + OutputSink + DiagnosticSink + ?Sized> IoContext for T {}

// ═══════════════════════════════════════════════════════════════════════════════
// BUFFERED COLLABORATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Something the interpreter asked for or produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IoEvent {
    IntegerRequested,
    CharacterRequested,
    IntegerOutput { value: i64 },
    CharacterOutput { value: char },
    Executed { record: ExecutionRecord },
    StackChanged { stack: Vec<i64> },
}

/// In-memory collaborator that keeps every event in order
///
/// Useful for tests and for hosts that poll after each `step`/`run`.
#[derive(Debug, Clone, Default)]
pub struct BufferedIo {
    events: Vec<IoEvent>,
    record_diagnostics: bool,
}

impl BufferedIo {
    /// Buffer for input requests and output only
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer that also keeps execution records and stack snapshots
    pub fn with_diagnostics() -> Self {
        Self {
            events: Vec::new(),
            record_diagnostics: true,
        }
    }

    pub fn events(&self) -> &[IoEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<IoEvent> {
        std::mem::take(&mut self.events)
    }

    /// Output so far rendered as text: integers in decimal, characters as-is
    pub fn output_text(&self) -> String {
        let mut text = String::new();
        for event in &self.events {
            match event {
                IoEvent::IntegerOutput { value } => text.push_str(&value.to_string()),
                IoEvent::CharacterOutput { value } => text.push(*value),
                _ => {}
            }
        }
        text
    }

    /// Execution records so far
    pub fn records(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.events.iter().filter_map(|event| match event {
            IoEvent::Executed { record } => Some(record),
            _ => None,
        })
    }
}

impl InputRequester for BufferedIo {
    fn request_integer(&mut self) {
        self.events.push(IoEvent::IntegerRequested);
    }

    fn request_character(&mut self) {
        self.events.push(IoEvent::CharacterRequested);
    }
}

impl OutputSink for BufferedIo {
    fn emit_integer(&mut self, value: i64) {
        self.events.push(IoEvent::IntegerOutput { value });
    }

    fn emit_character(&mut self, value: char) {
        self.events.push(IoEvent::CharacterOutput { value });
    }
}

impl DiagnosticSink for BufferedIo {
    fn record(&mut self, record: &ExecutionRecord) {
        if self.record_diagnostics {
            self.events.push(IoEvent::Executed { record: *record });
        }
    }

    fn stack_changed(&mut self, stack: &[i64]) {
        if self.record_diagnostics {
            self.events.push(IoEvent::StackChanged {
                stack: stack.to_vec(),
            });
        }
    }
}
