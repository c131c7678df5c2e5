//! Structured error types for sortscope
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::RunState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Run already started (state: {0})")]
    AlreadyStarted(RunState),

    #[error("Cannot {op} a run that is {state}")]
    InvalidTransition { op: &'static str, state: RunState },

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write trace file: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = RunError::InvalidTransition { op: "pause", state: RunState::Finished };
        assert_eq!(err.to_string(), "Cannot pause a run that is FINISHED");
    }

    #[test]
    fn test_already_started_display() {
        let err = RunError::AlreadyStarted(RunState::Running);
        assert!(err.to_string().contains("RUNNING"));
    }
}
