//! Hex-Formatting Workload
//!
//! Renders the IEEE-754 bit pattern of a double nibble by nibble.

use crate::{Reps, expect_eq};
use fixbench_compose::{BenchmarkUnit, FixtureManifest, Outcome, TestDescriptor};

/// Fixed workload input.
pub const INPUT: f64 = 1234.5;

/// Expected workload output: the bit pattern of `INPUT`.
pub const OUTPUT: &str = "0x40934a0000000000";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Format the raw bit pattern of `value` as a lowercase hex literal,
/// most significant nibble first.
pub fn run_workload(value: f64) -> String {
    let bits = value.to_bits();
    let mut out = String::with_capacity(18);
    out.push_str("0x");
    for shift in (0..16).rev() {
        let nibble = (bits >> (shift * 4)) & 0xf;
        out.push(HEX_DIGITS[nibble as usize] as char);
    }
    out
}

/// Benchmark case: asserts the workload's result against the known answer.
pub struct ToHexCase {
    input: f64,
    expected: &'static str,
}

impl Default for ToHexCase {
    fn default() -> Self {
        ToHexCase {
            input: INPUT,
            expected: OUTPUT,
        }
    }
}

impl ToHexCase {
    /// Run the workload `reps` times, checking every result.
    pub fn run(&mut self, reps: Reps) -> Outcome {
        for _ in 0..reps.count() {
            expect_eq(&self.expected.to_string(), &run_workload(self.input))?;
        }
        Ok(())
    }
}

/// Composed unit for this workload with no fixtures declared.
pub fn unit_for(reps: Reps) -> BenchmarkUnit<ToHexCase> {
    BenchmarkUnit::new(
        TestDescriptor::of::<ToHexCase>(reps.method()),
        FixtureManifest::empty(),
        ToHexCase::default,
        move |case| case.run(reps),
    )
}
