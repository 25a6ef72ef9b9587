//! Hardware performance counter capability
//!
//! The harness never talks to counter hardware directly; it goes through the
//! `CounterSource` trait so the measurement loop can be tested with a mock
//! and so unavailability surfaces as a recoverable error instead of
//! undefined low-level behavior.
//!
//! One source is built per measuring thread via `CounterProvider`. The
//! snapshot scratch therefore lives inside each source and is never shared
//! across workers.

pub mod perf;

use crate::utils::CounterError;

#[cfg(all(target_os = "linux", feature = "perf"))]
pub use perf::PerfCounterProvider;

/// A running 64-bit counter that can be snapshotted.
///
/// Snapshots are only meaningful relative to each other: the harness records
/// the delta between the reads bracketing one workload invocation. The
/// counter is assumed monotonic for the duration of one measurement.
pub trait CounterSource {
    /// Take a snapshot of the counter.
    fn read(&mut self) -> Result<u64, CounterError>;
}

/// Builds one `CounterSource` per measuring thread.
///
/// Implementations must be cheap enough to call once per worker per round;
/// the build happens outside the timed interval.
pub trait CounterProvider: Send + Sync {
    /// Build a counter source for the calling thread.
    fn counter(&self) -> Result<Box<dyn CounterSource>, CounterError>;
}

/// The platform counter provider, if one exists for this build.
pub fn default_provider() -> Result<Box<dyn CounterProvider>, CounterError> {
    #[cfg(all(target_os = "linux", feature = "perf"))]
    {
        Ok(Box::new(PerfCounterProvider::new()?))
    }
    #[cfg(not(all(target_os = "linux", feature = "perf")))]
    {
        Err(CounterError::Unsupported)
    }
}

/// Deterministic counter for tests: every snapshot advances by a fixed step.
///
/// Each source built by the provider starts from zero, so the delta around
/// any single invocation is exactly `step` regardless of which worker took
/// the measurement.
#[derive(Debug, Clone, Copy)]
pub struct MockCounterProvider {
    step: u64,
}

impl MockCounterProvider {
    /// Create a provider whose sources advance by `step` per read.
    pub fn new(step: u64) -> Self {
        Self { step }
    }
}

impl CounterProvider for MockCounterProvider {
    fn counter(&self) -> Result<Box<dyn CounterSource>, CounterError> {
        Ok(Box::new(MockCounterSource {
            value: 0,
            step: self.step,
        }))
    }
}

struct MockCounterSource {
    value: u64,
    step: u64,
}

impl CounterSource for MockCounterSource {
    fn read(&mut self) -> Result<u64, CounterError> {
        self.value = self.value.wrapping_add(self.step);
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_counter_fixed_step() {
        let provider = MockCounterProvider::new(7);
        let mut source = provider.counter().unwrap();

        let first = source.read().unwrap();
        let second = source.read().unwrap();
        assert_eq!(second - first, 7);

        let third = source.read().unwrap();
        assert_eq!(third - second, 7);
    }

    #[test]
    fn test_mock_sources_are_independent() {
        let provider = MockCounterProvider::new(3);
        let mut a = provider.counter().unwrap();
        let mut b = provider.counter().unwrap();

        assert_eq!(a.read().unwrap(), 3);
        assert_eq!(a.read().unwrap(), 6);
        // A fresh source starts over; nothing leaked across workers.
        assert_eq!(b.read().unwrap(), 3);
    }

    #[test]
    #[cfg(not(all(target_os = "linux", feature = "perf")))]
    fn test_default_provider_unsupported() {
        assert!(matches!(
            default_provider(),
            Err(CounterError::Unsupported)
        ));
    }
}
