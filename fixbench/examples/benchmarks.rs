//! Runs the bundled workload units through the harness and prints a
//! per-unit summary.
//!
//! ```sh
//! cargo run --example benchmarks
//! ```

use fixbench::SuiteError;
use fixbench::prelude::*;
use fixbench_workloads::{Reps, parse_source, sqrt, to_hex};

fn main() -> Result<(), SuiteError> {
    tracing_subscriber::fmt()
        .with_env_filter("fixbench=debug")
        .init();

    let mut suite = Suite::new();
    for reps in [Reps::Once, Reps::Twice, Reps::Thrice] {
        suite.register(sqrt::unit_for(reps))?;
        suite.register(to_hex::unit_for(reps))?;
        suite.register(parse_source::unit_for(reps))?;
    }

    let config = RunnerConfig {
        warmup_time_ns: 200_000_000,
        measurement_time_ns: 500_000_000,
        min_iterations: Some(100),
        max_iterations: None,
        target_samples: 100,
    };

    for report in suite.run_all(&config) {
        let mean_ns = if report.samples.is_empty() {
            0
        } else {
            report.samples.iter().map(|s| s.duration_nanos).sum::<u64>()
                / report.samples.len() as u64
        };
        match &report.error_message {
            None => println!(
                "{:<40} {:>8} iterations  mean {:>8} ns",
                report.id, report.iterations, mean_ns
            ),
            Some(message) => println!("{:<40} FAILED: {message}", report.id),
        }
    }

    Ok(())
}
