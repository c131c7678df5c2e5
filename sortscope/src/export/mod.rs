//! Trace export functionality
//!
//! Records the events a run publishes and writes them in Chrome Trace Event
//! Format, viewable in Perfetto or `chrome://tracing`.

pub mod trace;

pub use trace::RunTraceExporter;
