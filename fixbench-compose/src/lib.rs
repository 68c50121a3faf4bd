#![warn(missing_docs)]
//! FixBench Compose - Test Lifecycle Composition Engine
//!
//! This crate turns a test case equipped with xUnit-style fixtures (setup and
//! teardown hooks, per-invocation rules, per-class rules) into a single
//! executable unit that reproduces the runner's invocation order, exception
//! semantics, and resource lifetimes - packaged so a benchmarking harness can
//! invoke it repeatedly with no per-invocation discovery overhead:
//! - `Statement` - a run-once unit of work that completes or propagates a failure
//! - `ClassRule` / `InstanceRule` - decorators wrapping a `Statement` with
//!   cross-cutting setup/teardown behavior
//! - `FixtureManifest` - the static, ordered description of a test's hooks and
//!   rules, built once by an external analysis pass
//! - `BenchmarkUnit` - the composed, repeatedly-invokable product
//! - `expect_failure` - the exception-expectation combinator
//!
//! The engine never discovers fixtures itself: manifests arrive as plain data.
//! Nothing here logs or retries; every failure propagates to the caller.

mod composer;
mod descriptor;
mod expect;
mod failure;
mod manifest;
mod rule;
mod statement;

pub use composer::BenchmarkUnit;
pub use descriptor::{MethodRef, TestDescriptor};
pub use expect::{expect_failure, expect_failure_in};
pub use failure::{AssertionError, Failure, Outcome};
pub use manifest::{ClassHook, FixtureManifest, FixtureManifestBuilder, InstanceHook, RuleSource};
pub use rule::{
    ClassRule, DeadlineExceeded, InstanceRule, RuleCategory, SharedInstance, apply_class_rule,
    apply_instance_rule,
};
pub use statement::Statement;
