#![warn(missing_docs)]
//! # FixBench
//!
//! Run fixture-equipped test cases as benchmark units.
//!
//! FixBench composes a test case's setup/teardown hooks and rules around its
//! payload exactly the way a test runner would - same invocation order, same
//! exception semantics, same resource lifetimes - and packages the result as
//! a zero-argument unit a harness can invoke at high frequency:
//! - **Composition engine**: `Statement`, `ClassRule`/`InstanceRule`,
//!   `FixtureManifest`, `BenchmarkUnit`
//! - **Timing-rule exclusion**: timeout-style rules are skipped during
//!   composition so wall-clock deadlines never distort measurements
//! - **Expectation combinator**: `expect_failure` for payloads whose success
//!   is a particular failure
//! - **Harness**: warmup/measurement invocation loop and a suite registry,
//!   sequential or multi-threaded
//!
//! ## Quick Start
//!
//! ```
//! use fixbench::prelude::*;
//!
//! struct Case {
//!     value: u64,
//! }
//!
//! let manifest = FixtureManifest::builder()
//!     .instance_setup(|case: &mut Case| {
//!         case.value = 16;
//!         Ok(())
//!     })
//!     .build();
//!
//! let unit = BenchmarkUnit::new(
//!     TestDescriptor::of::<Case>("is_sixteen"),
//!     manifest,
//!     || Case { value: 0 },
//!     |case| {
//!         if case.value == 16 { Ok(()) } else { Err(Failure::assertion("setup did not run")) }
//!     },
//! );
//!
//! unit.invoke().unwrap();
//! ```

pub use fixbench_compose::{
    AssertionError, BenchmarkUnit, ClassRule, DeadlineExceeded, Failure, FixtureManifest,
    FixtureManifestBuilder, InstanceRule, MethodRef, Outcome, RuleCategory, RuleSource,
    SharedInstance, Statement, TestDescriptor, apply_class_rule, apply_instance_rule,
    expect_failure, expect_failure_in,
};

pub use fixbench_harness::{
    RunnerConfig, Sample, Suite, SuiteError, Timer, UnitReport, UnitResult, run_unit,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BenchmarkUnit, ClassRule, Failure, FixtureManifest, InstanceRule, Outcome, RuleSource,
        RunnerConfig, Statement, Suite, TestDescriptor, expect_failure, run_unit,
    };
}
