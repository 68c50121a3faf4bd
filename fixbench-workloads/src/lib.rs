#![warn(missing_docs)]
//! FixBench Workloads
//!
//! Deterministic workloads with fixed input/output constants, plus the
//! fixture-equipped benchmark cases built on them. Each workload module
//! exposes `run_workload`, its `INPUT`/`OUTPUT` constants, a case type with
//! once/twice/thrice payload variants, and composed-unit builders. The
//! workloads are opaque payloads to the composition engine; they exist so a
//! suite has something real to measure and so repeatability is testable
//! against known answers.

pub mod parse_source;
pub mod sqrt;
pub mod to_hex;

use fixbench_compose::{Failure, Outcome};
use std::fmt::Debug;

/// How many times a case's payload runs the workload per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reps {
    /// Run the workload once.
    Once,
    /// Run the workload twice.
    Twice,
    /// Run the workload three times.
    Thrice,
}

impl Reps {
    /// Number of workload runs per invocation.
    pub fn count(self) -> u32 {
        match self {
            Reps::Once => 1,
            Reps::Twice => 2,
            Reps::Thrice => 3,
        }
    }

    /// Method name used in the unit's descriptor.
    pub fn method(self) -> &'static str {
        match self {
            Reps::Once => "run_workload_once",
            Reps::Twice => "run_workload_twice",
            Reps::Thrice => "run_workload_thrice",
        }
    }
}

/// Assert-style equality check for payloads: mismatches become assertion
/// failures that propagate through the composed statement graph.
pub fn expect_eq<V>(expected: &V, actual: &V) -> Outcome
where
    V: PartialEq + Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(Failure::assertion(format!(
            "expected {expected:?} but was {actual:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixbench_compose::AssertionError;

    #[test]
    fn test_expect_eq() {
        assert!(expect_eq(&4, &4).is_ok());

        let failure = expect_eq(&4, &5).unwrap_err();
        assert_eq!(
            failure.downcast_ref::<AssertionError>().unwrap().0,
            "expected 4 but was 5"
        );
    }

    #[test]
    fn test_reps() {
        assert_eq!(Reps::Once.count(), 1);
        assert_eq!(Reps::Thrice.count(), 3);
        assert_eq!(Reps::Twice.method(), "run_workload_twice");
    }
}
