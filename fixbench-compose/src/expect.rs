//! Exception-Expectation Combinator
//!
//! Decorates a statement (or any zero-argument callable) with an expected
//! failure kind: a matching failure completes the wrapper normally, a
//! non-matching failure propagates unchanged, and a clean completion raises
//! an assertion failure of its own. This is the only place in the engine
//! that ever catches a failure.

use crate::failure::{Failure, Outcome};
use crate::statement::Statement;
use std::error::Error;

/// Wrap `inner` so it completes only if it fails with kind `E`.
pub fn expect_failure<E>(inner: Statement) -> Statement
where
    E: Error + 'static,
{
    Statement::new(move || expect_failure_in::<E>(|| inner.run()))
}

/// Standalone form of the combinator, usable outside the composer: runs
/// `body` and applies the same match/propagate/raise contract.
pub fn expect_failure_in<E>(body: impl FnOnce() -> Outcome) -> Outcome
where
    E: Error + 'static,
{
    match body() {
        Err(failure) if failure.is::<E>() => Ok(()),
        Err(failure) => Err(failure),
        Ok(()) => Err(Failure::assertion(format!(
            "expected {} but none was thrown",
            std::any::type_name::<E>()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::AssertionError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("expected kind")]
    struct Expected;

    #[derive(Debug, Error)]
    #[error("other kind")]
    struct Other;

    #[test]
    fn test_matching_failure_completes() {
        let stmt = Statement::new(|| Err(Failure::new(Expected)));
        assert!(expect_failure::<Expected>(stmt).run().is_ok());
    }

    #[test]
    fn test_non_matching_failure_propagates_unchanged() {
        let stmt = Statement::new(|| Err(Failure::new(Other)));
        let failure = expect_failure::<Expected>(stmt).run().unwrap_err();
        assert!(failure.is::<Other>());
    }

    #[test]
    fn test_clean_completion_raises() {
        let failure = expect_failure::<Expected>(Statement::empty())
            .run()
            .unwrap_err();
        let message = &failure.downcast_ref::<AssertionError>().unwrap().0;
        assert!(message.contains("Expected"));
        assert!(message.ends_with("but none was thrown"));
    }

    #[test]
    fn test_standalone_form() {
        assert!(expect_failure_in::<Expected>(|| Err(Failure::new(Expected))).is_ok());
        assert!(expect_failure_in::<Expected>(|| Ok(())).is_err());
    }
}
