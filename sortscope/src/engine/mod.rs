//! Instrumented execution engine.
//!
//! - [`aggregator`] - coalesces hook events into [`Snapshot`]s
//! - [`emitter`] - fixed-rate schedule deciding when to drain
//! - `hook` - shared coordination state and the worker-side hook
//! - [`run`] - the [`Run`] state machine tying them together

pub mod aggregator;
pub mod emitter;
mod hook;
pub mod run;

pub use aggregator::{ChangeSet, Snapshot};
pub use emitter::{Emitter, DEFAULT_FPS};
pub use run::{Run, RunConfig, RunEvent};
