//! Domain model for sortscope
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via small enums and newtypes
//! - Self-documenting function signatures
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{Counters, Outcome, RunState};

pub use errors::{ExportError, RunError, TuiError};
