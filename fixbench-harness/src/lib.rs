#![warn(missing_docs)]
//! FixBench Harness - Invocation Loop and Suite Runner
//!
//! Drives composed benchmark units at high frequency:
//! - Warmup then measurement phases with wall-clock sampling
//! - Iteration clamps (minimum/maximum) and a target sample count
//! - A suite registry keyed by `TestDescriptor`, run sequentially or across
//!   worker threads
//!
//! The harness is the propagation boundary for failures: a failing
//! invocation aborts that unit's run and is reported in its result. No
//! statistics are computed and nothing is persisted; callers decide what to
//! do with the raw samples.

mod measure;
mod runner;
mod suite;

pub use measure::Timer;
pub use runner::{DEFAULT_SAMPLE_COUNT, RunnerConfig, Sample, UnitResult, run_unit};
pub use suite::{Suite, SuiteError, UnitReport};
