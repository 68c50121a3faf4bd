//! Failure Propagation
//!
//! A `Failure` is the condition a `Statement` propagates when it does not
//! complete normally. It boxes an arbitrary error value while keeping the
//! concrete type recoverable, so the expectation combinator can match on the
//! failure's kind by downcast.

use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Result of running a `Statement` or invoking a composed unit.
pub type Outcome = Result<(), Failure>;

/// A propagated failure condition.
///
/// Wraps the originating error without altering it: re-propagation hands the
/// caller the exact value that was raised, and `is`/`downcast_ref` recover the
/// concrete kind.
#[derive(Debug)]
pub struct Failure(Box<dyn Error + Send + Sync + 'static>);

impl Failure {
    /// Wrap a concrete error as a failure.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Failure(Box::new(error))
    }

    /// Shorthand for an assertion-style failure with a message.
    pub fn assertion(message: impl Into<String>) -> Self {
        Failure::new(AssertionError(message.into()))
    }

    /// Whether the underlying error is of kind `E`.
    pub fn is<E>(&self) -> bool
    where
        E: Error + 'static,
    {
        self.0.is::<E>()
    }

    /// Borrow the underlying error as kind `E`, if it matches.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Consume the failure, returning the boxed error.
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<E> From<E> for Failure
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Failure::new(error)
    }
}

/// Assertion-style failure raised by test payloads and by the expectation
/// combinator when an expected failure never occurred.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct AssertionError(pub String);
