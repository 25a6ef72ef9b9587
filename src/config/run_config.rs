//! Benchmark run configuration
//!
//! A `RunConfig` is immutable for the duration of a run: the runner copies
//! it at construction and never writes back.

use crate::utils::{BenchmarkError, Result};

/// Configuration for one benchmark run.
///
/// Defaults: 100 iterations, 10 warmup repetitions, worker count equal to
/// the host's available parallelism, counters off.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Report title and output-file stem. Must be non-empty.
    pub name: String,
    /// Measured iterations (rounds, for the concurrent runner). Must be > 0.
    pub iterations: u64,
    /// Untimed repetitions before measurement begins.
    pub warmup: u64,
    /// Worker threads per round (concurrent runner only).
    pub threads: u32,
    /// Sample a hardware performance counter around each invocation.
    pub counters: bool,
}

impl RunConfig {
    /// Create a configuration with default iteration counts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iterations: 100,
            warmup: 10,
            threads: default_threads(),
            counters: false,
        }
    }

    /// Set the measured iteration count.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the warmup repetition count.
    pub fn with_warmup(mut self, warmup: u64) -> Self {
        self.warmup = warmup;
        self
    }

    /// Set the worker thread count (0 keeps the auto-detected default).
    pub fn with_threads(mut self, threads: u32) -> Self {
        if threads > 0 {
            self.threads = threads;
        }
        self
    }

    /// Toggle hardware counter sampling.
    pub fn with_counters(mut self, counters: bool) -> Self {
        self.counters = counters;
        self
    }

    /// Validate the configuration.
    ///
    /// Zero iterations would divide by zero in the statistics; an empty name
    /// would produce an unusable report title and a hidden `_results.csv`.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(BenchmarkError::Config(
                "benchmark name must not be empty".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(BenchmarkError::Config(format!(
                "benchmark '{}': iterations must be at least 1",
                self.name
            )));
        }
        if self.threads == 0 {
            return Err(BenchmarkError::Config(format!(
                "benchmark '{}': thread count must be at least 1",
                self.name
            )));
        }
        Ok(())
    }
}

/// Host parallelism, resolved once at configuration time.
fn default_threads() -> u32 {
    std::thread::available_parallelism()
        .map(|p| p.get() as u32)
        .unwrap_or(4)
}
