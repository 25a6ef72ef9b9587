//! Benchmark runners
//!
//! This module provides the two measurement drivers:
//! - `SingleThreadedRunner`: serial warmup and measurement loops
//! - `ConcurrentRunner`: round-barrier fan-out across worker threads
//!
//! Both share the same per-invocation cycle (`timed_pass`) and the same
//! reporting pipeline in `metrics`; they differ only in how the sample set
//! is populated.

pub mod concurrent;
pub mod single;

use std::time::Instant;

use crate::config::RunConfig;
use crate::counters::{self, CounterProvider, CounterSource};
use crate::utils::{CounterError, Result};

pub use concurrent::ConcurrentRunner;
pub use single::SingleThreadedRunner;

/// A unit of work under measurement: opaque, zero-argument, side-effecting.
///
/// The `Sync` bound is what lets the concurrent runner invoke one workload
/// from several threads at once; making that invocation actually safe is
/// the caller's responsibility.
pub type WorkloadFn = Box<dyn Fn() + Send + Sync>;

/// One untimed repetition: setup, workload, teardown, nothing recorded.
pub(crate) fn warmup_pass(
    workload: &WorkloadFn,
    setup: Option<&WorkloadFn>,
    teardown: Option<&WorkloadFn>,
) {
    if let Some(f) = setup {
        f();
    }
    workload();
    if let Some(f) = teardown {
        f();
    }
}

/// One measured repetition.
///
/// The duration and the counter delta cover the same interval: the workload
/// invocation alone. Setup runs before the clock starts, teardown after it
/// stops, so neither contributes to either sample.
pub(crate) fn timed_pass(
    workload: &WorkloadFn,
    setup: Option<&WorkloadFn>,
    teardown: Option<&WorkloadFn>,
    counter: &mut Option<Box<dyn CounterSource>>,
) -> std::result::Result<(i64, Option<u64>), CounterError> {
    if let Some(f) = setup {
        f();
    }

    let start = Instant::now();
    let delta = match counter.as_mut() {
        Some(c) => {
            let before = c.read()?;
            workload();
            let after = c.read()?;
            Some(after.wrapping_sub(before))
        }
        None => {
            workload();
            None
        }
    };
    let duration_ns = start.elapsed().as_nanos() as i64;

    if let Some(f) = teardown {
        f();
    }

    Ok((duration_ns, delta))
}

/// Resolve the counter provider for a run: the injected one if present,
/// otherwise the platform default. `None` when counter mode is off.
pub(crate) fn resolve_provider(
    config: &RunConfig,
    injected: Option<Box<dyn CounterProvider>>,
) -> Result<Option<Box<dyn CounterProvider>>> {
    if !config.counters {
        return Ok(None);
    }
    match injected {
        Some(provider) => Ok(Some(provider)),
        None => Ok(Some(counters::default_provider()?)),
    }
}
