//! Suite Registry
//!
//! Collects composed units under their descriptors and runs them in
//! deterministic order, sequentially or across worker threads. Units are
//! shared immutably; each invocation builds its own statement graph on the
//! invoking thread, so no locking is needed around a run.

use crate::runner::{RunnerConfig, Sample, run_unit};
use fixbench_compose::{BenchmarkUnit, Outcome, TestDescriptor};
use fxhash::FxHashMap;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

type SharedInvoker = Arc<dyn Fn() -> Outcome + Send + Sync>;

/// Errors from suite execution.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// A unit was registered twice under the same descriptor.
    #[error("duplicate unit: {0}")]
    DuplicateUnit(String),

    /// The worker thread pool could not be built.
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Serialized outcome of one unit's run.
#[derive(Debug, Serialize)]
pub struct UnitReport {
    /// Display form of the unit's descriptor.
    pub id: String,
    /// Total invocations performed, warmup included.
    pub iterations: u64,
    /// Collected measurement samples.
    pub samples: Vec<Sample>,
    /// Failure message if the run aborted.
    pub error_message: Option<String>,
}

impl UnitReport {
    /// Whether the unit's run completed without failure.
    pub fn is_ok(&self) -> bool {
        self.error_message.is_none()
    }
}

/// A collection of composed units, keyed by descriptor.
#[derive(Default)]
pub struct Suite {
    units: FxHashMap<TestDescriptor, SharedInvoker>,
}

impl Suite {
    /// An empty suite.
    pub fn new() -> Self {
        Suite::default()
    }

    /// Register a composed unit. Fails if its descriptor is already taken.
    pub fn register<T: 'static>(&mut self, unit: BenchmarkUnit<T>) -> Result<(), SuiteError> {
        let descriptor = *unit.descriptor();
        if self.units.contains_key(&descriptor) {
            return Err(SuiteError::DuplicateUnit(descriptor.to_string()));
        }
        self.units.insert(descriptor, Arc::new(unit.invoker()));
        Ok(())
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the suite holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Run every unit sequentially, in alphabetical descriptor order.
    pub fn run_all(&self, config: &RunnerConfig) -> Vec<UnitReport> {
        self.ordered_units()
            .into_iter()
            .map(|(id, invoker)| Self::run_one(id, invoker, config))
            .collect()
    }

    /// Run every unit on a dedicated worker pool with `threads` workers.
    /// Report order matches the sequential run.
    pub fn run_all_parallel(
        &self,
        config: &RunnerConfig,
        threads: usize,
    ) -> Result<Vec<UnitReport>, SuiteError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        let units = self.ordered_units();

        Ok(pool.install(|| {
            units
                .into_par_iter()
                .map(|(id, invoker)| Self::run_one(id, invoker, config))
                .collect()
        }))
    }

    /// Units sorted alphabetically by display id for deterministic runs.
    fn ordered_units(&self) -> Vec<(String, SharedInvoker)> {
        let mut units: Vec<_> = self
            .units
            .iter()
            .map(|(descriptor, invoker)| (descriptor.to_string(), Arc::clone(invoker)))
            .collect();
        units.sort_by(|a, b| a.0.cmp(&b.0));
        units
    }

    fn run_one(id: String, invoker: SharedInvoker, config: &RunnerConfig) -> UnitReport {
        tracing::debug!(unit = %id, "running unit");
        let result = run_unit(|| invoker(), config);
        tracing::debug!(
            unit = %id,
            iterations = result.iterations,
            ok = result.is_ok(),
            "unit finished"
        );

        UnitReport {
            id,
            iterations: result.iterations,
            samples: result.samples,
            error_message: result.failure.map(|failure| failure.to_string()),
        }
    }
}
