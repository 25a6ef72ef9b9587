//! Utility modules

pub mod error;

pub use error::{BenchmarkError, CounterError, Phase, Result};
