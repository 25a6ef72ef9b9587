//! Single-threaded benchmark runner
//!
//! Runs the workload serially: `warmup` untimed repetitions, then
//! `iterations` measured ones, then the shared report/export pipeline.

use tracing::{debug, info};

use super::{resolve_provider, timed_pass, warmup_pass, WorkloadFn};
use crate::config::RunConfig;
use crate::counters::CounterProvider;
use crate::metrics::{reporter, RunReport, SampleSet};
use crate::utils::{BenchmarkError, Phase, Result};

/// Serial benchmark runner.
///
/// A runner is single-use: `run` consumes it, so samples from two runs can
/// never accumulate into one statistic.
pub struct SingleThreadedRunner {
    config: RunConfig,
    workload: WorkloadFn,
    setup: Option<WorkloadFn>,
    teardown: Option<WorkloadFn>,
    counter_provider: Option<Box<dyn CounterProvider>>,
}

impl SingleThreadedRunner {
    /// Create a runner for `workload`.
    ///
    /// Fails with a configuration error if the config names an empty
    /// benchmark or asks for zero iterations.
    pub fn new(config: RunConfig, workload: impl Fn() + Send + Sync + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            workload: Box::new(workload),
            setup: None,
            teardown: None,
            counter_provider: None,
        })
    }

    /// Attach a setup hook, invoked before every invocation, outside the
    /// measured interval. Last call wins.
    pub fn set_setup(&mut self, setup: impl Fn() + Send + Sync + 'static) {
        self.setup = Some(Box::new(setup));
    }

    /// Attach a teardown hook, invoked after every invocation, outside the
    /// measured interval. Last call wins.
    pub fn set_teardown(&mut self, teardown: impl Fn() + Send + Sync + 'static) {
        self.teardown = Some(Box::new(teardown));
    }

    /// Toggle hardware counter sampling for the upcoming run.
    pub fn enable_counters(&mut self, enabled: bool) {
        self.config.counters = enabled;
    }

    /// Inject a counter provider (tests use a mock; the default is the
    /// platform provider).
    pub fn set_counter_provider(&mut self, provider: Box<dyn CounterProvider>) {
        self.counter_provider = Some(provider);
    }

    /// Execute the full run: warmup, measurement, report, CSV export.
    pub fn run(mut self) -> Result<RunReport> {
        let provider = resolve_provider(&self.config, self.counter_provider.take())?;

        info!(
            benchmark = %self.config.name,
            iterations = self.config.iterations,
            warmup = self.config.warmup,
            counters = provider.is_some(),
            "starting single-threaded run"
        );

        self.warm_up();

        let mut set = SampleSet::with_capacity(self.config.iterations as usize);
        self.measure(&mut set, provider.as_deref())?;

        let stats = reporter::print_report(&self.config.name, self.config.iterations, &set)?;
        let csv_path = reporter::export_csv(&self.config.name, &set)
            .map_err(|e| BenchmarkError::io(&self.config.name, Phase::Export, e))?;

        Ok(RunReport {
            name: self.config.name.clone(),
            iterations: self.config.iterations,
            sample_count: set.len(),
            stats,
            csv_path,
        })
    }

    fn warm_up(&self) {
        debug!(benchmark = %self.config.name, "warmup phase");
        for _ in 0..self.config.warmup {
            warmup_pass(&self.workload, self.setup.as_ref(), self.teardown.as_ref());
        }
    }

    fn measure(&self, set: &mut SampleSet, provider: Option<&dyn CounterProvider>) -> Result<()> {
        debug!(benchmark = %self.config.name, "measurement phase");

        let mut counter = provider.map(|p| p.counter()).transpose()?;
        for _ in 0..self.config.iterations {
            let (duration_ns, delta) = timed_pass(
                &self.workload,
                self.setup.as_ref(),
                self.teardown.as_ref(),
                &mut counter,
            )?;
            set.record(duration_ns, delta);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::MockCounterProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn config(name: &str, iterations: u64, warmup: u64) -> RunConfig {
        RunConfig::new(name).with_iterations(iterations).with_warmup(warmup)
    }

    #[test]
    fn test_sample_count_ignores_warmup() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let i = Arc::clone(&invocations);

        let runner = SingleThreadedRunner::new(
            config("single_sample_count", 4, 3),
            move || {
                i.fetch_add(1, Ordering::Relaxed);
            },
        )
        .unwrap();

        let report = runner.run().unwrap();
        assert_eq!(report.sample_count, 4);
        // Warmup invocations happen but are never recorded.
        assert_eq!(invocations.load(Ordering::Relaxed), 7);

        std::fs::remove_file(report.csv_path).unwrap();
    }

    #[test]
    fn test_hooks_run_once_per_measured_invocation() {
        let setups = Arc::new(AtomicUsize::new(0));
        let teardowns = Arc::new(AtomicUsize::new(0));

        let mut runner =
            SingleThreadedRunner::new(config("single_hook_count", 6, 0), || {}).unwrap();
        let s = Arc::clone(&setups);
        runner.set_setup(move || {
            s.fetch_add(1, Ordering::Relaxed);
        });
        let t = Arc::clone(&teardowns);
        runner.set_teardown(move || {
            t.fetch_add(1, Ordering::Relaxed);
        });

        let report = runner.run().unwrap();
        assert_eq!(report.sample_count, 6);
        // Counts taken after run() returned: nothing fired during report or
        // export.
        assert_eq!(setups.load(Ordering::Relaxed), 6);
        assert_eq!(teardowns.load(Ordering::Relaxed), 6);

        std::fs::remove_file(report.csv_path).unwrap();
    }

    #[test]
    fn test_fixed_delay_workload() {
        let runner = SingleThreadedRunner::new(config("single_fixed_delay", 5, 2), || {
            std::thread::sleep(Duration::from_millis(1));
        })
        .unwrap();

        let report = runner.run().unwrap();
        assert_eq!(report.sample_count, 5);
        // Every sample is at least the sleep; scheduler jitter only adds.
        assert!(report.stats.min_ns >= 1_000_000);
        assert!(report.stats.mean_ns >= 1_000_000);
        assert!(report.stats.max_ns < 1_000_000_000);

        std::fs::remove_file(report.csv_path).unwrap();
    }

    #[test]
    fn test_zero_iterations_is_a_config_error() {
        let result = SingleThreadedRunner::new(config("single_zero_iters", 0, 10), || {});
        assert!(matches!(result, Err(BenchmarkError::Config(_))));
    }

    #[test]
    fn test_mock_counter_deltas_are_exported() {
        let mut runner =
            SingleThreadedRunner::new(config("single_mock_counter", 6, 1), || {}).unwrap();
        runner.enable_counters(true);
        runner.set_counter_provider(Box::new(MockCounterProvider::new(5)));

        let report = runner.run().unwrap();
        assert_eq!(report.sample_count, 6);

        let csv = std::fs::read_to_string(&report.csv_path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Iteration,Duration (ns),Performance Counter");
        assert_eq!(lines.len(), 1 + 6);
        for line in &lines[1..] {
            let delta: u64 = line.split(',').nth(2).unwrap().parse().unwrap();
            assert_eq!(delta, 5);
        }

        std::fs::remove_file(report.csv_path).unwrap();
    }

    #[test]
    fn test_counters_disabled_by_default() {
        let runner = SingleThreadedRunner::new(config("single_no_counters", 3, 0), || {}).unwrap();
        let report = runner.run().unwrap();

        let csv = std::fs::read_to_string(&report.csv_path).unwrap();
        assert_eq!(csv.lines().next().unwrap(), "Iteration,Duration (ns)");

        std::fs::remove_file(report.csv_path).unwrap();
    }
}
