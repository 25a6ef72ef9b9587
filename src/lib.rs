//! nanobench library
//!
//! Micro-benchmark harness: runs an opaque unit of work repeatedly, times
//! each invocation at nanosecond resolution, optionally samples a hardware
//! performance counter around it, then prints summary statistics and writes
//! the raw samples to CSV.
//!
//! Two runners share one reporting pipeline:
//! - [`SingleThreadedRunner`] measures serially
//! - [`ConcurrentRunner`] fans each round out across worker threads with a
//!   barrier between rounds
//!
//! ```no_run
//! use nanobench::{RunConfig, SingleThreadedRunner};
//!
//! let config = RunConfig::new("vec_push").with_iterations(1000).with_warmup(50);
//! let runner = SingleThreadedRunner::new(config, || {
//!     let mut v = Vec::with_capacity(64);
//!     v.push(1u64);
//!     std::hint::black_box(&v);
//! })?;
//! let report = runner.run()?;
//! println!("mean: {} ns", report.stats.mean_ns);
//! # Ok::<(), nanobench::BenchmarkError>(())
//! ```

pub mod benchmark;
pub mod config;
pub mod counters;
pub mod metrics;
pub mod utils;

pub use benchmark::{ConcurrentRunner, SingleThreadedRunner, WorkloadFn};
pub use config::{CliArgs, RunConfig};
pub use counters::{CounterProvider, CounterSource, MockCounterProvider};
pub use metrics::{RunReport, SampleSet, SummaryStats};
pub use utils::{BenchmarkError, CounterError, Phase, Result};
