//! Unit Invocation Loop
//!
//! Runs one composed unit through a warmup phase and a measurement phase,
//! recording one wall-clock sample per invocation. Stop conditions follow
//! the same discipline as the rest of the harness family:
//! - a maximum iteration count always stops the loop
//! - the sample target or time budget stops it only once the minimum
//!   iteration count is satisfied

use crate::measure::Timer;
use fixbench_compose::{Failure, Outcome};
use serde::Serialize;
use std::time::Instant;

/// Default number of measurement samples to collect.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Configuration for the invocation loop.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Warmup time in nanoseconds.
    pub warmup_time_ns: u64,
    /// Measurement time in nanoseconds.
    pub measurement_time_ns: u64,
    /// Minimum measurement invocations before any stop condition applies.
    pub min_iterations: Option<u64>,
    /// Hard cap on measurement invocations.
    pub max_iterations: Option<u64>,
    /// Number of samples to aim for during measurement.
    pub target_samples: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_time_ns: 3_000_000_000,      // 3 seconds
            measurement_time_ns: 5_000_000_000, // 5 seconds
            min_iterations: Some(100),
            max_iterations: None,
            target_samples: DEFAULT_SAMPLE_COUNT,
        }
    }
}

/// One timed invocation of a composed unit.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Sample {
    /// Duration of the invocation in nanoseconds.
    pub duration_nanos: u64,
}

/// Result of running one unit through the full loop.
#[derive(Debug)]
pub struct UnitResult {
    /// Collected measurement samples (warmup excluded).
    pub samples: Vec<Sample>,
    /// Total invocations performed, warmup included.
    pub iterations: u64,
    /// The failure that aborted the run, if any.
    pub failure: Option<Failure>,
}

impl UnitResult {
    /// Whether every invocation completed normally.
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run the full loop for one unit: warmup, then measurement.
///
/// The invoker is the zero-argument callable a `BenchmarkUnit` produces; any
/// failure it propagates aborts the run immediately and is reported in the
/// result rather than being swallowed or retried.
pub fn run_unit<F>(invoker: F, config: &RunnerConfig) -> UnitResult
where
    F: Fn() -> Outcome,
{
    let mut iterations: u64 = 0;
    let mut samples = Vec::with_capacity(config.target_samples);

    tracing::debug!(warmup_ns = config.warmup_time_ns, "warmup phase");
    let warmup_start = Instant::now();
    while warmup_start.elapsed().as_nanos() < config.warmup_time_ns as u128 {
        iterations += 1;
        if let Err(failure) = invoker() {
            return UnitResult {
                samples,
                iterations,
                failure: Some(failure),
            };
        }
    }

    tracing::debug!(measurement_ns = config.measurement_time_ns, "measurement phase");
    let min_iterations = config.min_iterations.unwrap_or(0);
    let max_iterations = config.max_iterations.unwrap_or(u64::MAX).max(min_iterations);
    let measure_start = Instant::now();
    let mut measured: u64 = 0;

    loop {
        if measured >= max_iterations {
            break;
        }

        let min_iterations_met = measured >= min_iterations;
        let has_enough_samples = samples.len() >= config.target_samples;
        let time_limit_reached =
            measure_start.elapsed().as_nanos() >= config.measurement_time_ns as u128;

        if (has_enough_samples || time_limit_reached) && min_iterations_met {
            break;
        }

        iterations += 1;
        measured += 1;

        let timer = Timer::start();
        let outcome = invoker();
        let duration_nanos = timer.stop();

        if let Err(failure) = outcome {
            return UnitResult {
                samples,
                iterations,
                failure: Some(failure),
            };
        }

        if samples.len() < config.target_samples {
            samples.push(Sample { duration_nanos });
        }
    }

    UnitResult {
        samples,
        iterations,
        failure: None,
    }
}
