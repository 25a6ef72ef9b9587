//! perf_event-based counter access for Linux.
//!
//! Reads the hardware CPU-cycle counter through the perf_event subsystem.
//! Requires `CAP_PERFMON`, root, or `kernel.perf_event_paranoid <= 2`; on
//! systems without that, construction fails with
//! [`CounterError::PermissionDenied`] and the caller can fall back to plain
//! wall-clock timing.
//!
//! Counters opened here observe only the opening thread, so each worker
//! building its own source gets a per-thread cycle count.

#![cfg(all(target_os = "linux", feature = "perf"))]

use perf_event2::events::Hardware;
use perf_event2::{Builder, Counter};

use super::{CounterProvider, CounterSource};
use crate::utils::CounterError;

/// Counter provider backed by Linux perf_event CPU-cycle counters.
pub struct PerfCounterProvider {
    _private: (),
}

impl PerfCounterProvider {
    /// Initialize the provider, probing counter availability.
    ///
    /// The probe opens (and immediately drops) one counter so permission and
    /// configuration problems surface here, before any measurement starts.
    pub fn new() -> Result<Self, CounterError> {
        let _probe = open_cycle_counter()?;
        Ok(Self { _private: () })
    }
}

impl CounterProvider for PerfCounterProvider {
    fn counter(&self) -> Result<Box<dyn CounterSource>, CounterError> {
        Ok(Box::new(PerfCounterSource {
            counter: open_cycle_counter()?,
        }))
    }
}

struct PerfCounterSource {
    counter: Counter,
}

impl CounterSource for PerfCounterSource {
    fn read(&mut self) -> Result<u64, CounterError> {
        self.counter.read().map_err(CounterError::Read)
    }
}

fn open_cycle_counter() -> Result<Counter, CounterError> {
    let mut counter = Builder::new(Hardware::CPU_CYCLES).build().map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            CounterError::PermissionDenied
        } else {
            CounterError::Setup(e)
        }
    })?;

    counter.enable().map_err(CounterError::Setup)?;
    Ok(counter)
}
