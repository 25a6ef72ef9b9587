//! Shared result reporting and CSV export
//!
//! Both runners populate a `SampleSet` differently but report identically,
//! so the report/export logic lives here once. The console report goes to
//! plain stdout (it is the product of the run, not a log line); the raw
//! samples go to `<name>_results.csv` in the current working directory.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::sample_set::SampleSet;
use super::stats::SummaryStats;
use crate::utils::{BenchmarkError, Phase, Result};

/// Summary of one completed run, returned to programmatic callers.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Benchmark name.
    pub name: String,
    /// Configured iteration count (rounds, for the concurrent runner).
    pub iterations: u64,
    /// Total duration samples recorded.
    pub sample_count: usize,
    /// Summary statistics over all samples.
    pub stats: SummaryStats,
    /// Path of the exported CSV file.
    pub csv_path: PathBuf,
}

/// Print the human-readable report to stdout.
pub fn print_report(name: &str, iterations: u64, set: &SampleSet) -> Result<SummaryStats> {
    let stats = SummaryStats::from_samples(set.durations()).ok_or_else(|| BenchmarkError::Empty {
        name: name.to_string(),
        phase: Phase::Report,
    })?;

    println!("Benchmark: {}", name);
    println!("Iterations: {}", iterations);
    println!("Mean: {} ns", stats.mean_ns);
    println!("Stddev: {} ns", stats.stddev_ns);
    println!("Min: {} ns", stats.min_ns);
    println!("Max: {} ns", stats.max_ns);

    if set.has_counters() {
        println!("Performance Counters:");
        for delta in set.counter_deltas() {
            println!("Counter Value: {}", delta);
        }
    }

    println!("=========================");

    Ok(stats)
}

/// File name the raw samples are exported under.
pub fn csv_file_name(name: &str) -> String {
    format!("{}_results.csv", name)
}

/// Write the raw samples as CSV to `<name>_results.csv` in the current
/// working directory, overwriting any existing file, and print a
/// confirmation line naming the file.
pub fn export_csv(name: &str, set: &SampleSet) -> io::Result<PathBuf> {
    let path = PathBuf::from(csv_file_name(name));

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, set)?;
    writer.flush()?;

    println!("Results exported to {}", path.display());
    Ok(path)
}

/// Write the CSV table: header, then one row per sample with a 1-based
/// iteration index. The counter column is present only when deltas were
/// recorded, and each row's counter cell is written only if a delta exists
/// at that index.
fn write_csv<W: Write>(writer: &mut W, set: &SampleSet) -> io::Result<()> {
    write!(writer, "Iteration,Duration (ns)")?;
    if set.has_counters() {
        write!(writer, ",Performance Counter")?;
    }
    writeln!(writer)?;

    let deltas = set.counter_deltas();
    for (i, duration) in set.durations().iter().enumerate() {
        write!(writer, "{},{}", i + 1, duration)?;
        if set.has_counters() {
            if let Some(delta) = deltas.get(i) {
                write!(writer, ",{}", delta)?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}
