//! Wall-Clock Timing
//!
//! Invocations are timed with `std::time::Instant`. Cycle counters are
//! deliberately not used here: composed units run whole test lifecycles, so
//! sub-nanosecond resolution buys nothing.

use std::time::Instant;

/// Timer for measuring one invocation.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    #[inline(always)]
    pub fn start() -> Self {
        Timer {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds.
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timer_measures_sleep() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let nanos = timer.stop();

        // At least 5ms in nanos, allowing scheduler slop
        assert!(nanos >= 5_000_000);
    }

    #[test]
    fn test_timer_is_monotonic() {
        let timer = Timer::start();
        let first = timer.stop();
        let second = timer.stop();
        assert!(second >= first);
    }
}
