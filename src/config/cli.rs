//! Command-line argument parsing
//!
//! Arguments for the demo binary. The library itself is configured through
//! `RunConfig`; this is only the thin shell around it.

use clap::Parser;

use super::run_config::RunConfig;

/// Micro-benchmark harness with nanosecond timing and hardware counter sampling
#[derive(Parser, Debug, Clone)]
#[command(name = "nanobench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Workload Selection =====
    /// Built-in workload(s) to run
    #[arg(short = 't', long = "workloads", value_delimiter = ',', default_value = "spin")]
    pub workloads: Vec<String>,

    // ===== Benchmark Parameters =====
    /// Number of measured iterations per workload
    #[arg(short = 'n', long = "iterations", default_value_t = 100)]
    pub iterations: u64,

    /// Number of untimed warmup repetitions before measurement
    #[arg(short = 'w', long = "warmup", default_value_t = 10)]
    pub warmup: u64,

    /// Number of worker threads (0 = auto-detect, 1 = single-threaded runner)
    #[arg(long = "threads", default_value_t = 1)]
    pub threads: u32,

    /// Sample hardware performance counters around each invocation
    #[arg(long = "counters")]
    pub counters: bool,

    // ===== Output =====
    /// Only print the benchmark reports (errors still logged)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse from process arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.workloads.is_empty() {
            return Err("at least one workload must be selected".to_string());
        }

        if self.iterations == 0 {
            return Err("--iterations must be at least 1".to_string());
        }

        if self.quiet && self.verbose {
            return Err("--quiet and --verbose are mutually exclusive".to_string());
        }

        Ok(())
    }

    /// Get effective number of threads (0 = auto-detect)
    pub fn effective_threads(&self) -> u32 {
        if self.threads == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get() as u32)
                .unwrap_or(4)
        } else {
            self.threads
        }
    }

    /// Build the run configuration for one named workload
    pub fn run_config(&self, workload: &str) -> RunConfig {
        RunConfig::new(workload)
            .with_iterations(self.iterations)
            .with_warmup(self.warmup)
            .with_threads(self.effective_threads())
            .with_counters(self.counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["test"]);
        assert_eq!(args.workloads, vec!["spin"]);
        assert_eq!(args.iterations, 100);
        assert_eq!(args.warmup, 10);
        assert_eq!(args.threads, 1);
        assert!(!args.counters);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_workload_list() {
        let args = CliArgs::parse_from(["test", "-t", "spin,alloc,fib"]);
        assert_eq!(args.workloads, vec!["spin", "alloc", "fib"]);
    }

    #[test]
    fn test_validation_zero_iterations() {
        let args = CliArgs::parse_from(["test", "-n", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_quiet_verbose_conflict() {
        let args = CliArgs::parse_from(["test", "-q", "-v"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_effective_threads_auto() {
        let args = CliArgs::parse_from(["test", "--threads", "0"]);
        assert!(args.effective_threads() >= 1);
    }

    #[test]
    fn test_run_config_carries_args() {
        let args = CliArgs::parse_from(["test", "-n", "25", "-w", "3", "--threads", "2", "--counters"]);
        let config = args.run_config("alloc");
        assert_eq!(config.name, "alloc");
        assert_eq!(config.iterations, 25);
        assert_eq!(config.warmup, 3);
        assert_eq!(config.threads, 2);
        assert!(config.counters);
    }
}
