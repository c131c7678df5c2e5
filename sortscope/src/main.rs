//! # sortscope - Main Entry Point
//!
//! Supports two operational modes:
//! - **Live TUI** (default): bars, status panel and keyboard control
//! - **Headless** (`--headless`): run to completion (or `--duration`), print a
//!   summary, optionally export a trace

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use sortscope_common::{is_sorted, Algorithm};
use std::path::Path;
use std::time::{Duration, Instant};

use sortscope::algorithms;
use sortscope::cli::Args;
use sortscope::domain::{Outcome, TuiError};
use sortscope::engine::Run;
use sortscope::export::RunTraceExporter;
use sortscope::generate::generate;
use sortscope::tui::{self, LiveOptions};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

/// How often headless mode logs progress
const STATS_INTERVAL: Duration = Duration::from_secs(1);

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if matches!(err.downcast_ref::<TuiError>(), Some(TuiError::UnknownAlgorithm(_))) {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if args.list {
        for algorithm in algorithms::catalogue() {
            println!("{}", algorithm.name);
        }
        return Ok(());
    }

    let algorithm = algorithms::find(&args.algorithm)
        .ok_or_else(|| TuiError::UnknownAlgorithm(args.algorithm.clone()))?;

    if !args.quiet {
        println!("sortscope v{}", env!("CARGO_PKG_VERSION"));
        println!("algorithm: {}", algorithm.name);
        println!("elements: {} ({})", args.size, args.order);
        if let Some(ref export_path) = args.export {
            println!("export: {}", export_path.display());
        }
    }

    let trace = if args.headless {
        run_headless(&args, algorithm)?
    } else {
        tui::run_live(LiveOptions {
            algorithm: algorithm.name.to_string(),
            order: args.order,
            size: args.size,
            config: args.run_config(),
            record_trace: args.export.is_some(),
        })?
    };

    if let (Some(trace), Some(export_path)) = (trace, args.export.as_deref()) {
        write_trace(&trace, export_path)?;
        if !args.quiet {
            println!("saved: {}", export_path.display());
        }
    }

    Ok(())
}

/// Run one algorithm to completion without a terminal UI.
fn run_headless(args: &Args, algorithm: &Algorithm) -> Result<Option<RunTraceExporter>> {
    let mut run = Run::new(generate(args.size, args.order), args.run_config());
    let events = run.subscribe();
    let mut trace = args.export.as_ref().map(|_| RunTraceExporter::new(algorithm.name, args.size));

    run.start(algorithm).context("Failed to start run")?;
    let started = Instant::now();
    let duration_limit = args.duration_limit();
    let mut stats_timer = Instant::now();

    loop {
        let mut wait = STATS_INTERVAL;
        if let Some(limit) = duration_limit {
            let remaining = limit.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                info!("Duration limit reached, stopping {}", algorithm.name);
                run.stop().context("Failed to stop run")?;
                break;
            }
            wait = wait.min(remaining);
        }

        let finished = run.wait_finished(Some(wait));
        if let Some(trace) = &mut trace {
            for event in events.try_iter() {
                trace.record(&event);
            }
        } else {
            events.try_iter().for_each(drop);
        }
        if finished {
            break;
        }

        if stats_timer.elapsed() >= STATS_INTERVAL {
            let counters = run.counters();
            info!(
                "{}: {} comparisons, {} accesses",
                algorithm.name, counters.comparisons, counters.accesses
            );
            stats_timer = Instant::now();
        }
    }

    // Events published by the final stop
    if let Some(trace) = &mut trace {
        for event in events.try_iter() {
            trace.record(&event);
        }
    }

    let outcome = run.outcome().unwrap_or(Outcome::Cancelled);
    let counters = run.counters();
    let exit_reason = match outcome {
        Outcome::Completed => "completed",
        Outcome::Cancelled => "duration limit reached",
        Outcome::Panicked => "algorithm panicked",
    };
    eprintln!(
        "\n{exit_reason}: {} on {} elements in {:.3}s, {} comparisons, {} accesses",
        algorithm.name,
        args.size,
        run.elapsed().unwrap_or_default().as_secs_f64(),
        counters.comparisons,
        counters.accesses,
    );

    match (outcome, run.sequence()) {
        (Outcome::Panicked, _) => anyhow::bail!("{} panicked during the run", algorithm.name),
        (Outcome::Completed, Some(sequence)) if !is_sorted(sequence) => {
            warn!("{} finished but the sequence is not sorted", algorithm.name);
        }
        _ => {}
    }

    Ok(trace)
}

fn write_trace(trace: &RunTraceExporter, path: &Path) -> Result<()> {
    trace.export_to_path(path).context("Failed to export trace")?;
    info!("Wrote {} trace events to {}", trace.event_count(), path.display());
    Ok(())
}
