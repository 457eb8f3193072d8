//! Execution lifecycle
//!
//! `Running → {Paused, Completed, Failed}`, `Paused → {Running, Failed}`.
//! `Completed` and `Failed` are terminal for a run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of value an input instruction is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Decimal integer (`InputNumber`)
    Integer,
    /// Single character, pushed as its code point (`InputCharacter`)
    Character,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Character => f.write_str("character"),
        }
    }
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    /// Stepping through the grid
    Running,
    /// Suspended on an input instruction
    Paused(InputKind),
    /// No exit from the current block: normal halt
    Completed,
    /// Aborted by a fatal error or by the host
    Failed,
}

impl ExecutionState {
    /// Completed or Failed
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused(_))
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Paused(kind) => write!(f, "paused (awaiting {})", kind),
            Self::Completed => f.write_str("completed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Terminal result handed to hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub message: String,
}

impl RunOutcome {
    pub fn completed() -> Self {
        Self {
            status: RunStatus::Completed,
            message: "program halted: no exit from the current color block".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Failed,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ExecutionState::Completed.is_terminal());
        assert!(ExecutionState::Failed.is_terminal());
        assert!(!ExecutionState::Running.is_terminal());
        assert!(!ExecutionState::Paused(InputKind::Integer).is_terminal());
        assert!(ExecutionState::Paused(InputKind::Character).is_paused());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ExecutionState::Paused(InputKind::Integer).to_string(),
            "paused (awaiting integer)"
        );
        assert!(RunOutcome::completed().is_success());
        assert!(!RunOutcome::failed("boom").is_success());
    }
}
