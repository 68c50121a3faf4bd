//! Rules - Statement Decorators
//!
//! A rule transforms a `Statement` into a wrapping `Statement`. Two call
//! shapes exist, kept as distinct types rather than overloaded dispatch:
//! - `ClassRule` wraps the whole per-class lifecycle; it sees only the
//!   `TestDescriptor`.
//! - `InstanceRule` wraps a single test-method invocation; it additionally
//!   receives the live test instance.
//!
//! Rules in the `Timing` category impose wall-clock deadlines that are
//! meaningless inside a measurement loop, so the apply helpers skip them
//! entirely: their wrapping logic never runs and the inner statement passes
//! through unchanged.

use crate::descriptor::{MethodRef, TestDescriptor};
use crate::failure::{Failure, Outcome};
use crate::statement::Statement;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// The live test instance, shared within a single invocation.
///
/// Each invocation owns its instance exclusively and runs on one logical
/// thread, so single-threaded shared ownership is sufficient.
pub type SharedInstance<T> = Rc<RefCell<T>>;

/// Category a rule belongs to. `Timing` rules are excluded from composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Applied unconditionally, in declared order.
    Standard,
    /// Timeout-style wall-clock control; skipped when composing for
    /// benchmarking.
    Timing,
}

type ClassApply = Arc<dyn Fn(Statement, &TestDescriptor) -> Statement + Send + Sync>;
type InstanceApply<T> =
    Arc<dyn Fn(Statement, &MethodRef, SharedInstance<T>) -> Statement + Send + Sync>;

/// A class-scoped rule: wraps the per-class lifecycle once per invocation.
pub struct ClassRule {
    category: RuleCategory,
    apply: ClassApply,
}

impl ClassRule {
    /// A standard rule from a wrapping function.
    pub fn wrap<F>(apply: F) -> Self
    where
        F: Fn(Statement, &TestDescriptor) -> Statement + Send + Sync + 'static,
    {
        ClassRule {
            category: RuleCategory::Standard,
            apply: Arc::new(apply),
        }
    }

    /// A timing-control rule. Its wrapping logic exists but is never invoked
    /// by the composer.
    pub fn timing<F>(apply: F) -> Self
    where
        F: Fn(Statement, &TestDescriptor) -> Statement + Send + Sync + 'static,
    {
        ClassRule {
            category: RuleCategory::Timing,
            apply: Arc::new(apply),
        }
    }

    /// The timeout rule: fails the statement if it ran longer than `limit`.
    /// Always in the `Timing` category, so composition skips it.
    pub fn timeout(limit: Duration) -> Self {
        ClassRule::timing(move |inner, _desc| {
            Statement::new(move || {
                let start = Instant::now();
                inner.run()?;
                let elapsed = start.elapsed();
                if elapsed > limit {
                    return Err(Failure::new(DeadlineExceeded { limit, elapsed }));
                }
                Ok(())
            })
        })
    }

    /// A stateless pass-through rule. Replaces the need for a shared
    /// singleton: it carries no state, so a fresh value is equivalent.
    pub fn noop() -> Self {
        ClassRule::wrap(|inner, _desc| inner)
    }

    /// This rule's category.
    pub fn category(&self) -> RuleCategory {
        self.category
    }
}

impl Clone for ClassRule {
    fn clone(&self) -> Self {
        ClassRule {
            category: self.category,
            apply: Arc::clone(&self.apply),
        }
    }
}

/// An instance-scoped rule: wraps one test-method invocation and may read or
/// mutate the live test instance.
pub struct InstanceRule<T> {
    category: RuleCategory,
    apply: InstanceApply<T>,
}

impl<T> InstanceRule<T> {
    /// A standard rule from a wrapping function.
    pub fn wrap<F>(apply: F) -> Self
    where
        F: Fn(Statement, &MethodRef, SharedInstance<T>) -> Statement + Send + Sync + 'static,
    {
        InstanceRule {
            category: RuleCategory::Standard,
            apply: Arc::new(apply),
        }
    }

    /// A timing-control rule; never invoked by the composer.
    pub fn timing<F>(apply: F) -> Self
    where
        F: Fn(Statement, &MethodRef, SharedInstance<T>) -> Statement + Send + Sync + 'static,
    {
        InstanceRule {
            category: RuleCategory::Timing,
            apply: Arc::new(apply),
        }
    }

    /// A stateless pass-through rule.
    pub fn noop() -> Self {
        InstanceRule::wrap(|inner, _method, _instance| inner)
    }

    /// This rule's category.
    pub fn category(&self) -> RuleCategory {
        self.category
    }
}

impl<T> Clone for InstanceRule<T> {
    fn clone(&self) -> Self {
        InstanceRule {
            category: self.category,
            apply: Arc::clone(&self.apply),
        }
    }
}

/// Failure raised by the timeout rule when run outside the composer.
#[derive(Debug, Error)]
#[error("statement ran for {elapsed:?}, exceeding the {limit:?} deadline")]
pub struct DeadlineExceeded {
    /// The configured wall-clock limit.
    pub limit: Duration,
    /// How long the statement actually ran.
    pub elapsed: Duration,
}

/// Apply a class-scoped rule, skipping timing-control rules.
pub fn apply_class_rule(rule: &ClassRule, statement: Statement, desc: &TestDescriptor) -> Statement {
    if rule.category == RuleCategory::Timing {
        return statement;
    }
    (rule.apply)(statement, desc)
}

/// Apply an instance-scoped rule, skipping timing-control rules.
pub fn apply_instance_rule<T>(
    rule: &InstanceRule<T>,
    statement: Statement,
    method: &MethodRef,
    instance: SharedInstance<T>,
) -> Statement {
    if rule.category == RuleCategory::Timing {
        return statement;
    }
    (rule.apply)(statement, method, instance)
}
