//! Console collaborator
//!
//! Output goes straight to a writer. Input requests are only remembered: the
//! runtime reads the value once the controller has paused, then resumes it.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use piet_core::vm::{
    DiagnosticSink, ExecutionRecord, InputKind, InputRequester, OutputSink,
};
use tracing::info;

use crate::error::{RuntimeError, RuntimeResult};

/// [`IoContext`](piet_core::vm::IoContext) over a reader and a writer
pub struct ConsoleIo<R: BufRead, W: Write> {
    input: R,
    output: W,
    /// Unread characters of the current input line
    pending: VecDeque<char>,
    requested: Option<InputKind>,
    write_error: Option<io::Error>,
    trace_instructions: bool,
}

impl ConsoleIo<io::StdinLock<'static>, io::StdoutLock<'static>> {
    /// Process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout().lock())
    }
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
            requested: None,
            write_error: None,
            trace_instructions: false,
        }
    }

    /// Log every executed instruction at info level
    pub fn with_instruction_trace(mut self, enabled: bool) -> Self {
        self.trace_instructions = enabled;
        self
    }

    /// Kind of the last input request not yet answered
    pub fn requested(&self) -> Option<InputKind> {
        self.requested
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read the value the program asked for
    pub fn read_value(&mut self, kind: InputKind) -> RuntimeResult<i64> {
        let value = match kind {
            InputKind::Integer => self.read_integer()?,
            InputKind::Character => i64::from(u32::from(self.read_character()?)),
        };
        self.requested = None;
        Ok(value)
    }

    /// Next non-blank line parsed as a decimal integer
    pub fn read_integer(&mut self) -> RuntimeResult<i64> {
        self.flush()?;
        loop {
            let line: String = if self.pending.is_empty() {
                self.read_line()?.ok_or(RuntimeError::InputExhausted)?
            } else {
                self.pending.drain(..).collect()
            };

            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            return text
                .parse()
                .map_err(|_| RuntimeError::InvalidInput(text.to_string()));
        }
    }

    /// Next character, line breaks included
    pub fn read_character(&mut self) -> RuntimeResult<char> {
        self.flush()?;
        if self.pending.is_empty() {
            let line = self.read_line()?.ok_or(RuntimeError::InputExhausted)?;
            self.pending.extend(line.chars());
        }
        self.pending.pop_front().ok_or(RuntimeError::InputExhausted)
    }

    fn read_line(&mut self) -> RuntimeResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Flush output, surfacing any write error seen since the last check
    pub fn flush(&mut self) -> RuntimeResult<()> {
        if let Some(err) = self.write_error.take() {
            return Err(err.into());
        }
        self.output.flush()?;
        Ok(())
    }

    fn write(&mut self, args: std::fmt::Arguments<'_>) {
        if self.write_error.is_some() {
            return;
        }
        if let Err(err) = self.output.write_fmt(args) {
            self.write_error = Some(err);
        }
    }
}

impl<R: BufRead, W: Write> InputRequester for ConsoleIo<R, W> {
    fn request_integer(&mut self) {
        self.requested = Some(InputKind::Integer);
    }

    fn request_character(&mut self) {
        self.requested = Some(InputKind::Character);
    }
}

impl<R: BufRead, W: Write> OutputSink for ConsoleIo<R, W> {
    fn emit_integer(&mut self, value: i64) {
        self.write(format_args!("{value}"));
    }

    fn emit_character(&mut self, value: char) {
        self.write(format_args!("{value}"));
    }
}

impl<R: BufRead, W: Write> DiagnosticSink for ConsoleIo<R, W> {
    fn record(&mut self, record: &ExecutionRecord) {
        if self.trace_instructions {
            info!(target: "piet_runtime::trace", "{record}");
        }
    }
}
