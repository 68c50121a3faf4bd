//! Statement - The Run-Once Execution Unit
//!
//! A `Statement` is a zero-argument unit of work: it either completes or
//! fails by propagating the condition raised in its body, including
//! conditions raised by nested statements it wraps. A single statement runs
//! at most once; the composer rebuilds the full statement graph for each
//! invocation, so a freshly composed graph reproduces the same behavior
//! every time.

use crate::failure::Outcome;

/// A run-once unit of work in a composed invocation.
///
/// Statements own no state beyond their closure. They are built and run on
/// the invoking thread, so captures need not be `Send`.
pub struct Statement(Box<dyn FnOnce() -> Outcome>);

impl Statement {
    /// Wrap a closure as a statement.
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce() -> Outcome + 'static,
    {
        Statement(Box::new(body))
    }

    /// A statement that completes immediately.
    pub fn empty() -> Self {
        Statement::new(|| Ok(()))
    }

    /// Run the statement, consuming it.
    pub fn run(self) -> Outcome {
        (self.0)()
    }
}
