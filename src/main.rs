//! nanobench - micro-benchmark harness demo binary
//!
//! Runs built-in workloads through the harness. Workloads are deliberately
//! trivial; they exist so the runners, statistics, and export paths can be
//! exercised end to end without writing any code.

use anyhow::Result;
use std::hint::black_box;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use nanobench::benchmark::WorkloadFn;
use nanobench::{CliArgs, ConcurrentRunner, RunReport, SingleThreadedRunner};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(args: &CliArgs) {
    if args.quiet {
        return;
    }

    println!("nanobench v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Workloads: {:?}", args.workloads);
    println!(
        "Iterations: {}, Warmup: {}, Threads: {}",
        args.iterations,
        args.warmup,
        args.effective_threads()
    );
    if args.counters {
        println!("Hardware counters: enabled");
    }
    println!("====================================\n");
}

/// Resolve a built-in workload by name.
fn demo_workload(name: &str) -> Option<WorkloadFn> {
    match name {
        // Tight arithmetic loop: measures raw CPU work with no allocation.
        "spin" => Some(Box::new(|| {
            let mut x: u64 = 0x9E3779B97F4A7C15;
            for _ in 0..1000 {
                x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            }
            black_box(x);
        })),
        // Heap round-trip: allocation plus a page-touching fill.
        "alloc" => Some(Box::new(|| {
            let mut buf = vec![0u8; 4096];
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = i as u8;
            }
            black_box(&buf);
        })),
        // Recursive call chain: branch-heavy, cache-friendly.
        "fib" => Some(Box::new(|| {
            black_box(fib(black_box(20)));
        })),
        _ => None,
    }
}

fn fib(n: u64) -> u64 {
    if n < 2 {
        n
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

fn run() -> Result<Vec<RunReport>> {
    let args = CliArgs::parse_args();

    setup_logging(args.verbose, args.quiet);

    args.validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    print_banner(&args);

    let mut reports = Vec::new();
    for name in &args.workloads {
        let workload = demo_workload(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown workload: {} (available: spin, alloc, fib)", name))?;

        let config = args.run_config(name);
        let threads = config.threads;

        info!("Running workload: {}", name);
        let report = if threads > 1 {
            ConcurrentRunner::new(config, workload)?.run()?
        } else {
            SingleThreadedRunner::new(config, workload)?.run()?
        };
        reports.push(report);
    }

    if !args.quiet {
        println!("\n====================================");
        println!("BENCHMARK COMPLETE");
        println!("====================================");
        println!("Workloads run: {}", reports.len());
        let total_samples: usize = reports.iter().map(|r| r.sample_count).sum();
        println!("Total samples: {}", total_samples);
    }

    Ok(reports)
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_workloads_resolve() {
        assert!(demo_workload("spin").is_some());
        assert!(demo_workload("alloc").is_some());
        assert!(demo_workload("fib").is_some());
        assert!(demo_workload("bogus").is_none());
    }

    #[test]
    fn test_fib_base_cases() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(10), 55);
    }
}
