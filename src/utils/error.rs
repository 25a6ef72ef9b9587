//! Error types for nanobench

use std::fmt;
use std::io;
use thiserror::Error;

/// Phase of a benchmark run, carried by errors so failures can be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Warmup,
    Measurement,
    Report,
    Export,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Warmup => "warmup",
            Phase::Measurement => "measurement",
            Phase::Report => "report",
            Phase::Export => "export",
        };
        f.write_str(s)
    }
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Counter error: {0}")]
    Counter(#[from] CounterError),

    #[error("benchmark '{name}': I/O failure during {phase}: {source}")]
    Io {
        name: String,
        phase: Phase,
        source: io::Error,
    },

    #[error("benchmark '{name}': worker panicked during {phase}")]
    Worker { name: String, phase: Phase },

    #[error("benchmark '{name}': no samples recorded during {phase}")]
    Empty { name: String, phase: Phase },
}

impl BenchmarkError {
    /// Tag an I/O failure with the run it belongs to and the phase it hit.
    pub fn io(name: &str, phase: Phase, source: io::Error) -> Self {
        BenchmarkError::Io {
            name: name.to_string(),
            phase,
            source,
        }
    }
}

/// Hardware-counter capability errors
///
/// Counter access must fail as a recoverable condition, never as undefined
/// low-level behavior. Callers can match on these to fall back to plain
/// wall-clock timing.
#[derive(Error, Debug)]
pub enum CounterError {
    #[error("hardware counters are not supported on this platform (build with the 'perf' feature on Linux)")]
    Unsupported,

    #[error(
        "perf_event requires elevated privileges: run with sudo, grant CAP_PERFMON, \
         or set kernel.perf_event_paranoid <= 2"
    )]
    PermissionDenied,

    #[error("counter setup failed: {0}")]
    Setup(io::Error),

    #[error("counter read failed: {0}")]
    Read(io::Error),
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Warmup.to_string(), "warmup");
        assert_eq!(Phase::Measurement.to_string(), "measurement");
        assert_eq!(Phase::Report.to_string(), "report");
        assert_eq!(Phase::Export.to_string(), "export");
    }

    #[test]
    fn test_error_names_run_and_phase() {
        let err = BenchmarkError::io(
            "hash_insert",
            Phase::Export,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("hash_insert"));
        assert!(msg.contains("export"));
    }

    #[test]
    fn test_counter_error_converts() {
        let err: BenchmarkError = CounterError::Unsupported.into();
        assert!(matches!(err, BenchmarkError::Counter(_)));
    }
}
