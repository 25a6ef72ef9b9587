//! Concurrent benchmark runner
//!
//! Runs the workload across a fixed set of worker threads in synchronized
//! rounds: every round spawns one worker per thread, waits for all of them,
//! and only then dispatches the next round. All samples land in one shared
//! dataset; reporting and export are identical to the single-threaded
//! runner.

use parking_lot::Mutex;
use std::thread;
use tracing::{debug, info};

use super::{resolve_provider, timed_pass, warmup_pass, WorkloadFn};
use crate::config::RunConfig;
use crate::counters::CounterProvider;
use crate::metrics::{reporter, RunReport, SampleSet};
use crate::utils::{BenchmarkError, Phase, Result};

/// Round-barrier concurrent runner.
///
/// Each round, every worker executes one setup → timed workload → teardown
/// cycle and appends its duration sample (and counter delta) to the shared
/// set under one lock. Workers build their own counter sources, so counter
/// scratch state is never shared between threads.
///
/// Like `SingleThreadedRunner`, a runner is single-use: `run` consumes it.
pub struct ConcurrentRunner {
    config: RunConfig,
    workload: WorkloadFn,
    setup: Option<WorkloadFn>,
    teardown: Option<WorkloadFn>,
    counter_provider: Option<Box<dyn CounterProvider>>,
}

impl ConcurrentRunner {
    /// Create a runner for `workload`.
    ///
    /// The worker count comes from `config.threads` (default: the host's
    /// available parallelism, resolved when the config was built).
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

    /// Attach a setup hook, invoked by every worker before its invocation,
    /// outside the measured interval. Last call wins.
    pub fn set_setup(&mut self, setup: impl Fn() + Send + Sync + 'static) {
        self.setup = Some(Box::new(setup));
    }

    /// Attach a teardown hook, invoked by every worker after its invocation,
    /// outside the measured interval. Last call wins.
    pub fn set_teardown(&mut self, teardown: impl Fn() + Send + Sync + 'static) {
        self.teardown = Some(Box::new(teardown));
    }

    /// Toggle hardware counter sampling for the upcoming run.
    pub fn enable_counters(&mut self, enabled: bool) {
        self.config.counters = enabled;
    }

    /// Inject a counter provider shared by all workers; each worker builds
    /// its own source from it.
    pub fn set_counter_provider(&mut self, provider: Box<dyn CounterProvider>) {
        self.counter_provider = Some(provider);
    }

    /// Execute the full run: warmup rounds, measurement rounds, report,
    /// CSV export. Total samples on success: `iterations * threads`.
    pub fn run(mut self) -> Result<RunReport> {
        let provider = resolve_provider(&self.config, self.counter_provider.take())?;

        info!(
            benchmark = %self.config.name,
            iterations = self.config.iterations,
            warmup = self.config.warmup,
            threads = self.config.threads,
            counters = provider.is_some(),
            "starting concurrent run"
        );

        let capacity = (self.config.iterations as usize) * (self.config.threads as usize);
        let set = Mutex::new(SampleSet::with_capacity(capacity));

        debug!(benchmark = %self.config.name, "warmup phase");
        for _ in 0..self.config.warmup {
            self.round(Phase::Warmup, None, None)?;
        }

        debug!(benchmark = %self.config.name, "measurement phase");
        for _ in 0..self.config.iterations {
            self.round(Phase::Measurement, Some(&set), provider.as_deref())?;
        }

        let set = set.into_inner();
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

    /// Run one synchronized round: spawn one worker per thread, then join
    /// every worker before returning. A round with `set == None` is a warmup
    /// round and records nothing.
    ///
    /// Every handle is joined even when a worker fails, so no thread ever
    /// outlives the failure that aborts the run.
    fn round(
        &self,
        phase: Phase,
        set: Option<&Mutex<SampleSet>>,
        provider: Option<&dyn CounterProvider>,
    ) -> Result<()> {
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.config.threads as usize);

            for worker_id in 0..self.config.threads {
                let handle = thread::Builder::new()
                    .name(format!("bench-worker-{}", worker_id))
                    .spawn_scoped(scope, move || -> Result<()> {
                        match set {
                            Some(set) => {
                                // Per-worker counter source: snapshot scratch
                                // stays thread-local.
                                let mut counter =
                                    provider.map(|p| p.counter()).transpose()?;
                                let (duration_ns, delta) = timed_pass(
                                    &self.workload,
                                    self.setup.as_ref(),
                                    self.teardown.as_ref(),
                                    &mut counter,
                                )?;
                                // One locked append keeps durations and
                                // deltas aligned.
                                set.lock().record(duration_ns, delta);
                            }
                            None => {
                                warmup_pass(
                                    &self.workload,
                                    self.setup.as_ref(),
                                    self.teardown.as_ref(),
                                );
                            }
                        }
                        Ok(())
                    })
                    .expect("Failed to spawn worker thread");

                handles.push(handle);
            }

            let mut first_error = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        first_error.get_or_insert(BenchmarkError::Worker {
                            name: self.config.name.clone(),
                            phase,
                        });
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
    }
}
