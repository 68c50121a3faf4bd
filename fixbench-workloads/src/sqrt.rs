//! Square-Root Workload
//!
//! Newton's method square root with a fixed perfect-square input, so results
//! compare exactly. The integer variant is used by repeatability checks.

use crate::{Reps, expect_eq};
use fixbench_compose::{BenchmarkUnit, FixtureManifest, Outcome, TestDescriptor};

/// Fixed workload input.
pub const INPUT: f64 = 16.0;

/// Expected workload output.
pub const OUTPUT: f64 = 4.0;

/// Square root by Newton's method: starting from `value`, iterate
/// `x <- (x + value / x) / 2`. The sequence decreases strictly toward the
/// root; the loop stops at the first non-decreasing step, which for a
/// perfect square lands on the exact result.
pub fn run_workload(value: f64) -> f64 {
    let mut x = value;
    for _ in 0..64 {
        let next = 0.5 * (x + value / x);
        if next >= x {
            break;
        }
        x = next;
    }
    x
}

/// Integer square root by the same method: `x` starts at `n` and the
/// iteration `x <- (x + n / x) / 2` decreases monotonically until it crosses
/// the root, at which point the previous value is the floor square root.
pub fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut next = (x + n / x) / 2;
    while next < x {
        x = next;
        next = (x + n / x) / 2;
    }
    x
}

/// Benchmark case: asserts the workload's result against the known answer.
pub struct SqrtCase {
    input: f64,
    expected: f64,
}

impl Default for SqrtCase {
    fn default() -> Self {
        SqrtCase {
            input: INPUT,
            expected: OUTPUT,
        }
    }
}

impl SqrtCase {
    /// Run the workload `reps` times, checking every result.
    pub fn run(&mut self, reps: Reps) -> Outcome {
        for _ in 0..reps.count() {
            expect_eq(&self.expected, &run_workload(self.input))?;
        }
        Ok(())
    }
}

/// Composed unit for this workload with no fixtures declared.
pub fn unit_for(reps: Reps) -> BenchmarkUnit<SqrtCase> {
    BenchmarkUnit::new(
        TestDescriptor::of::<SqrtCase>(reps.method()),
        FixtureManifest::empty(),
        SqrtCase::default,
        move |case| case.run(reps),
    )
}
