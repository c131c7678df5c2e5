//! # sortscope - Watch Sorting Algorithms Run
//!
//! sortscope runs an ordinary, unmodified sorting routine on a worker thread
//! and lets a controller watch it in near-real time, pause it, resume it and
//! cancel it between any two element operations.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Sorting Algorithm (plain code)               │
//! │        fn(&mut Tracked) -> Step<()>, uses `?` on every op       │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ compare / read / write
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Engine Hook (worker thread)                     │
//! │  • pause wait, cancel check, throttle sleep (mutex released)    │
//! │  • record touched / assigned bars, bump counters                │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ ChangeSet (under one mutex)
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Run (controller thread)                         │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐        │
//! │  │   Emitter    │──▶│   Snapshot   │──▶│ Subscribers  │        │
//! │  │  (25 Hz)     │   │ + Counters   │   │  (channels)  │        │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘        │
//! │                                               │                 │
//! │                      ┌────────────────────────┼──────────┐     │
//! │                      ▼                        ▼          ▼     │
//! │               ┌──────────────┐   ┌──────────────┐ ┌──────────┐ │
//! │               │     TUI      │   │   Headless   │ │  Export  │ │
//! │               │   (bars)     │   │  (summary)   │ │  (JSON)  │ │
//! │               └──────────────┘   └──────────────┘ └──────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`engine`]: the instrumented execution engine
//!   - `run`: `NotStarted → Running ⇄ Paused → Finished` state machine
//!   - `aggregator`: coalesces events into snapshots
//!   - `emitter`: fixed-rate snapshot schedule
//! - [`algorithms`]: the catalogue of plug-in sorting routines
//! - [`generate`]: input sequences in five initial orders
//! - [`tui`]: live terminal bar view with keyboard control
//! - [`export`]: Chrome Trace Event Format JSON of a run
//! - [`cli`]: command-line arguments
//! - [`domain`]: states, counters and error types
//!
//! ## Typical Usage
//!
//! ```bash
//! # Watch QuickSort on 100 shuffled elements
//! sortscope
//!
//! # Run ShellSort without a terminal UI and save a trace
//! sortscope -a ShellSort -n 2000 --delay-us 0 --headless --export trace.json
//! ```

pub mod algorithms;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod export;
pub mod generate;
pub mod tui;
