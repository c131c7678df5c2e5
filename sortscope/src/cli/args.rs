//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::RunConfig;
use crate::generate::ArrayOrder;

/// Largest sequence the renderer can still draw one column per element for.
pub const MAX_SIZE: usize = 10_000;

#[derive(Parser, Debug)]
#[command(
    name = "sortscope",
    version,
    about = "Watch sorting algorithms run live, with pause, resume and cancel",
    after_help = "\
EXAMPLES:
    sortscope                                   QuickSort on 100 shuffled elements
    sortscope -a ShellSort -n 400 -o mostly-sorted
    sortscope --headless --export trace.json    Run to completion, save a Chrome trace
    sortscope --list                            Show available algorithms"
)]
pub struct Args {
    /// Algorithm to run (see --list; case-insensitive)
    #[arg(short, long, default_value = "QuickSort")]
    pub algorithm: String,

    /// Number of elements
    #[arg(short = 'n', long, default_value_t = 100, value_parser = parse_size)]
    pub size: usize,

    /// Initial order: ascending, descending, random, mostly-sorted, partially-sorted
    #[arg(short, long, default_value = "random")]
    pub order: ArrayOrder,

    /// Delay inserted at every compare, read and write, in microseconds
    #[arg(long, value_name = "MICROS", default_value_t = 1000)]
    pub delay_us: u64,

    /// Snapshot rate delivered to the renderer
    #[arg(long, default_value_t = crate::engine::DEFAULT_FPS,
          value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub fps: u32,

    /// Run without TUI and print a summary
    #[arg(long)]
    pub headless: bool,

    /// Cancel the run after N seconds (0 = unlimited, headless only)
    #[arg(long, value_name = "SECS", default_value = "0")]
    pub duration: u64,

    /// Export a Chrome trace of the run to FILE
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// List available algorithms and exit
    #[arg(long)]
    pub list: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_micros(self.delay_us)
    }

    #[must_use]
    pub fn duration_limit(&self) -> Option<Duration> {
        (self.duration > 0).then(|| Duration::from_secs(self.duration))
    }

    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        RunConfig { delay: self.delay(), fps: self.fps }
    }
}

fn parse_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("must be between 1 and {MAX_SIZE}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sortscope"]).unwrap();
        assert_eq!(args.algorithm, "QuickSort");
        assert_eq!(args.size, 100);
        assert_eq!(args.order, ArrayOrder::Random);
        assert_eq!(args.delay(), Duration::from_micros(1000));
        assert_eq!(args.fps, 25);
        assert!(args.duration_limit().is_none());
        assert_eq!(args.run_config(), RunConfig { delay: Duration::from_millis(1), fps: 25 });
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "sortscope", "-a", "heapsort", "-n", "42", "-o", "mostly-sorted", "-q",
        ])
        .unwrap();
        assert_eq!(args.algorithm, "heapsort");
        assert_eq!(args.size, 42);
        assert_eq!(args.order, ArrayOrder::MostlySorted);
        assert!(args.quiet);
    }

    #[test]
    fn test_size_bounds() {
        assert!(Args::try_parse_from(["sortscope", "-n", "0"]).is_err());
        assert!(Args::try_parse_from(["sortscope", "-n", "10001"]).is_err());
        assert!(Args::try_parse_from(["sortscope", "-n", "10000"]).is_ok());
    }

    #[test]
    fn test_rejects_unknown_order_and_zero_fps() {
        assert!(Args::try_parse_from(["sortscope", "-o", "sideways"]).is_err());
        assert!(Args::try_parse_from(["sortscope", "--fps", "0"]).is_err());
    }

    #[test]
    fn test_headless_duration() {
        let args =
            Args::try_parse_from(["sortscope", "--headless", "--duration", "3"]).unwrap();
        assert!(args.headless);
        assert_eq!(args.duration_limit(), Some(Duration::from_secs(3)));
    }
}
