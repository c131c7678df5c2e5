//! Domain types shared by the engine and its consumers

use std::fmt;

/// Lifecycle of a single run.
///
/// ```text
/// NotStarted ──start──▶ Running ──pause──▶ Paused
///                          ▲                  │
///                          └──────resume──────┘
/// Running | Paused ──stop / natural completion──▶ Finished
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    NotStarted,
    Running,
    Paused,
    Finished,
}

impl RunState {
    /// `true` while a worker thread exists for the run.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::NotStarted => "NOT STARTED",
            RunState::Running => "RUNNING",
            RunState::Paused => "PAUSED",
            RunState::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}

/// Running totals published alongside snapshots.
///
/// A comparison counts as one comparison and two accesses; a read or a write
/// counts as one access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub accesses: u64,
    pub comparisons: u64,
}

/// How the worker thread ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The algorithm returned normally.
    Completed,
    /// The run was stopped and the algorithm abandoned at an operation boundary.
    Cancelled,
    /// The algorithm panicked; the sequence was lost with the worker.
    Panicked,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Completed => "completed",
            Outcome::Cancelled => "cancelled",
            Outcome::Panicked => "panicked",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(!RunState::NotStarted.is_active());
        assert!(RunState::Running.is_active());
        assert!(RunState::Paused.is_active());
        assert!(!RunState::Finished.is_active());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(RunState::NotStarted.to_string(), "NOT STARTED");
        assert_eq!(Outcome::Cancelled.to_string(), "cancelled");
    }
}
