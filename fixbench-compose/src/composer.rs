//! Composer - Building the Executable Unit
//!
//! Nests the raw test payload inside instance rules, the fresh-instance
//! fixture wrapper, class fixtures, and class rules, in that order from the
//! inside out. The composed `BenchmarkUnit` is the cached builder: invoking
//! it rebuilds the statement graph (and a fresh test instance) and runs one
//! full lifecycle, so a harness can call it at high frequency from any
//! thread with no per-invocation discovery cost.
//!
//! Invocation phases, entered strictly in order:
//!
//! ```text
//! Built -> Instance-Created -> Setup-Running -> Payload-Running
//!       -> Teardown-Running -> {Completed | Failed}
//! ```
//!
//! Teardown-Running is entered unconditionally once the instance exists,
//! regardless of which earlier phase failed.

use crate::descriptor::{MethodRef, TestDescriptor};
use crate::failure::{Failure, Outcome};
use crate::manifest::FixtureManifest;
use crate::rule::{SharedInstance, apply_class_rule, apply_instance_rule};
use crate::statement::Statement;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

type Constructor<T> = Arc<dyn Fn() -> T + Send + Sync>;
type Payload<T> = Arc<dyn Fn(&mut T) -> Outcome + Send + Sync>;

/// A composed, repeatedly-invokable test-method execution.
///
/// The unit shares its manifest, constructor, and payload across threads;
/// every invocation builds a private statement graph and test instance on
/// the invoking thread, so concurrent invocations never share mutable state.
pub struct BenchmarkUnit<T> {
    descriptor: TestDescriptor,
    method_ref: MethodRef,
    manifest: Arc<FixtureManifest<T>>,
    constructor: Constructor<T>,
    payload: Payload<T>,
}

impl<T: 'static> BenchmarkUnit<T> {
    /// Bind a payload to its fixtures.
    ///
    /// `constructor` produces the fresh test instance each invocation;
    /// `payload` is the test method body, stateless by itself.
    pub fn new<C, P>(
        descriptor: TestDescriptor,
        manifest: FixtureManifest<T>,
        constructor: C,
        payload: P,
    ) -> Self
    where
        C: Fn() -> T + Send + Sync + 'static,
        P: Fn(&mut T) -> Outcome + Send + Sync + 'static,
    {
        BenchmarkUnit {
            descriptor,
            method_ref: MethodRef::new(descriptor),
            manifest: Arc::new(manifest),
            constructor: Arc::new(constructor),
            payload: Arc::new(payload),
        }
    }

    /// The descriptor identifying this unit's test method.
    pub fn descriptor(&self) -> &TestDescriptor {
        &self.descriptor
    }

    /// Perform one full invocation.
    ///
    /// When the manifest declares no hooks and no rules, this collapses to
    /// constructing the instance and calling the payload directly. The
    /// collapse is a pure shortcut: `invoke_composed` runs the general
    /// nested path with identical observable behavior.
    pub fn invoke(&self) -> Outcome {
        if self.manifest.is_empty() {
            let mut instance = (self.constructor)();
            return (self.payload)(&mut instance);
        }
        self.invoke_composed()
    }

    /// Perform one full invocation through the general nested path,
    /// regardless of whether the manifest is empty.
    pub fn invoke_composed(&self) -> Outcome {
        self.compose().run()
    }

    /// The zero-argument callable handed to a benchmarking harness.
    pub fn invoker(&self) -> impl Fn() -> Outcome + Send + Sync + 'static {
        let unit = self.clone();
        move || unit.invoke()
    }

    /// Build the statement graph for one invocation.
    ///
    /// Class-rule accessors are resolved here, so factory-backed rules are
    /// fresh per composition; instance rules resolve inside the lifecycle
    /// wrapper once the instance exists.
    pub fn compose(&self) -> Statement {
        let mut statement = self.instance_lifecycle();

        // Class fixtures wrap the per-class lifecycle the class rules enclose.
        let manifest = Arc::clone(&self.manifest);
        let inner = statement;
        statement = Statement::new(move || {
            let mut body_failure = None;
            for hook in &manifest.class_setup {
                if let Err(failure) = hook() {
                    body_failure = Some(failure);
                    break;
                }
            }

            if body_failure.is_none() {
                body_failure = inner.run().err();
            }

            let mut teardown_failure = None;
            for hook in &manifest.class_teardown {
                if let Err(failure) = hook() {
                    teardown_failure.get_or_insert(failure);
                }
            }

            finish(body_failure, teardown_failure)
        });

        // Class rules: first-declared outermost, timing rules skipped.
        for source in self.manifest.class_rules.iter().rev() {
            let rule = source.resolve();
            statement = apply_class_rule(&rule, statement, &self.descriptor);
        }

        statement
    }

    /// The fresh-instance wrapper: constructs the instance, wraps the payload
    /// in instance rules, and runs instance setup/teardown around the result.
    fn instance_lifecycle(&self) -> Statement {
        let manifest = Arc::clone(&self.manifest);
        let constructor = Arc::clone(&self.constructor);
        let payload = Arc::clone(&self.payload);
        let method_ref = self.method_ref;

        Statement::new(move || {
            // Instance-Created
            let instance: SharedInstance<T> = Rc::new(RefCell::new(constructor()));

            // Payload invocation, bound to the live instance
            let payload_instance = Rc::clone(&instance);
            let mut statement =
                Statement::new(move || payload(&mut *payload_instance.borrow_mut()));

            // Instance rules: first-declared outermost, so teardown-style
            // rule logic unwinds in reverse of setup-style logic. Accessor
            // sources are re-resolved here, once per invocation.
            for source in manifest.instance_rules.iter().rev() {
                let rule = source.resolve();
                statement =
                    apply_instance_rule(&rule, statement, &method_ref, Rc::clone(&instance));
            }

            // Setup-Running: first failure aborts the rest and the payload
            let mut body_failure = None;
            for hook in &manifest.instance_setup {
                if let Err(failure) = hook(&mut *instance.borrow_mut()) {
                    body_failure = Some(failure);
                    break;
                }
            }

            // Payload-Running
            if body_failure.is_none() {
                body_failure = statement.run().err();
            }

            // Teardown-Running: every hook is attempted, in declaration order
            let mut teardown_failure = None;
            for hook in &manifest.instance_teardown {
                if let Err(failure) = hook(&mut *instance.borrow_mut()) {
                    teardown_failure.get_or_insert(failure);
                }
            }

            finish(body_failure, teardown_failure)
        })
    }
}

impl<T> Clone for BenchmarkUnit<T> {
    fn clone(&self) -> Self {
        BenchmarkUnit {
            descriptor: self.descriptor,
            method_ref: self.method_ref,
            manifest: Arc::clone(&self.manifest),
            constructor: Arc::clone(&self.constructor),
            payload: Arc::clone(&self.payload),
        }
    }
}

/// First-failure-wins, body takes priority: a setup or payload failure
/// propagates even when teardown also failed; teardown failures surface only
/// for an otherwise clean body.
fn finish(body_failure: Option<Failure>, teardown_failure: Option<Failure>) -> Outcome {
    match body_failure.or(teardown_failure) {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::AssertionError;
    use crate::manifest::RuleSource;
    use crate::rule::{ClassRule, InstanceRule};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Case {
        value: u32,
    }

    type EventLog = Arc<Mutex<Vec<String>>>;

    fn log_event(log: &EventLog, event: &str) {
        log.lock().unwrap().push(event.to_string());
    }

    fn descriptor() -> TestDescriptor {
        TestDescriptor::of::<Case>("run")
    }

    #[test]
    fn test_invoke_runs_payload_on_fresh_instance() {
        let constructions = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&constructions);
        let unit = BenchmarkUnit::new(
            descriptor(),
            FixtureManifest::empty(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Case { value: 7 }
            },
            |case: &mut Case| {
                case.value += 1;
                Ok(())
            },
        );

        unit.invoke().unwrap();
        unit.invoke().unwrap();
        assert_eq!(constructions.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hook_and_fixture_order() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (l0, l1, l2, l3, l4) = (
            Arc::clone(&log),
            Arc::clone(&log),
            Arc::clone(&log),
            Arc::clone(&log),
            Arc::clone(&log),
        );

        let manifest = FixtureManifest::builder()
            .class_setup(move || {
                log_event(&l0, "class-setup");
                Ok(())
            })
            .class_teardown(move || {
                log_event(&l1, "class-teardown");
                Ok(())
            })
            .instance_setup(move |_case: &mut Case| {
                log_event(&l2, "setup");
                Ok(())
            })
            .instance_teardown(move |_case: &mut Case| {
                log_event(&l3, "teardown");
                Ok(())
            })
            .build();

        let unit = BenchmarkUnit::new(descriptor(), manifest, Case::default, move |_case| {
            log_event(&l4, "payload");
            Ok(())
        });

        unit.invoke().unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["class-setup", "setup", "payload", "teardown", "class-teardown"]
        );
    }

    #[test]
    fn test_setup_failure_aborts_payload_and_later_setups() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (l0, l1, l2, l3) = (
            Arc::clone(&log),
            Arc::clone(&log),
            Arc::clone(&log),
            Arc::clone(&log),
        );

        let manifest = FixtureManifest::builder()
            .instance_setup(move |_case: &mut Case| {
                log_event(&l0, "setup-1");
                Err(Failure::assertion("setup broke"))
            })
            .instance_setup(move |_case: &mut Case| {
                log_event(&l1, "setup-2");
                Ok(())
            })
            .instance_teardown(move |_case: &mut Case| {
                log_event(&l2, "teardown");
                Ok(())
            })
            .build();

        let unit = BenchmarkUnit::new(descriptor(), manifest, Case::default, move |_case| {
            log_event(&l3, "payload");
            Ok(())
        });

        let failure = unit.invoke().unwrap_err();
        assert!(failure.is::<AssertionError>());
        assert_eq!(*log.lock().unwrap(), vec!["setup-1", "teardown"]);
    }

    #[test]
    fn test_teardown_failure_propagates_for_clean_body() {
        let manifest = FixtureManifest::builder()
            .instance_teardown(|_case: &mut Case| Err(Failure::assertion("teardown broke")))
            .build();
        let unit = BenchmarkUnit::new(descriptor(), manifest, Case::default, |_case| Ok(()));

        let failure = unit.invoke().unwrap_err();
        assert_eq!(
            failure.downcast_ref::<AssertionError>().unwrap().0,
            "teardown broke"
        );
    }

    #[test]
    fn test_body_failure_wins_over_teardown_failure() {
        let ran_second_teardown = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ran_second_teardown);

        let manifest = FixtureManifest::builder()
            .instance_teardown(|_case: &mut Case| Err(Failure::assertion("teardown broke")))
            .instance_teardown(move |_case: &mut Case| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build();
        let unit = BenchmarkUnit::new(descriptor(), manifest, Case::default, |_case| {
            Err(Failure::assertion("payload broke"))
        });

        let failure = unit.invoke().unwrap_err();
        assert_eq!(
            failure.downcast_ref::<AssertionError>().unwrap().0,
            "payload broke"
        );
        // Every teardown hook still ran
        assert_eq!(ran_second_teardown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_class_rules_first_declared_outermost() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));

        let logging_rule = |name: &'static str, log: EventLog| {
            ClassRule::wrap(move |inner, _desc| {
                let log = Arc::clone(&log);
                Statement::new(move || {
                    log_event(&log, &format!("{name}:pre"));
                    let result = inner.run();
                    log_event(&log, &format!("{name}:post"));
                    result
                })
            })
        };

        let manifest = FixtureManifest::builder()
            .class_rule(RuleSource::Stored(logging_rule("r1", Arc::clone(&log))))
            .class_rule(RuleSource::Stored(logging_rule("r2", Arc::clone(&log))))
            .build();

        let payload_log = Arc::clone(&log);
        let unit = BenchmarkUnit::new(descriptor(), manifest, Case::default, move |_case| {
            log_event(&payload_log, "payload");
            Ok(())
        });

        unit.invoke().unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["r1:pre", "r2:pre", "payload", "r2:post", "r1:post"]
        );
    }

    #[test]
    fn test_accessor_rule_is_fresh_per_invocation() {
        let resolutions = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&resolutions);

        let manifest: FixtureManifest<Case> = FixtureManifest::builder()
            .instance_rule(RuleSource::accessor(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                InstanceRule::noop()
            }))
            .build();
        let unit = BenchmarkUnit::new(descriptor(), manifest, Case::default, |_case| Ok(()));

        for _ in 0..3 {
            unit.invoke().unwrap();
        }
        assert_eq!(resolutions.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_instance_rule_mutation_visible_to_payload() {
        let manifest = FixtureManifest::builder()
            .instance_rule(RuleSource::Stored(InstanceRule::wrap(
                |inner, _method, instance: SharedInstance<Case>| {
                    Statement::new(move || {
                        instance.borrow_mut().value = 99;
                        inner.run()
                    })
                },
            )))
            .build();

        let unit = BenchmarkUnit::new(descriptor(), manifest, Case::default, |case| {
            if case.value == 99 {
                Ok(())
            } else {
                Err(Failure::assertion("rule mutation not visible"))
            }
        });

        unit.invoke().unwrap();
    }

    #[test]
    fn test_invoker_is_send_and_reusable() {
        let unit = BenchmarkUnit::new(
            descriptor(),
            FixtureManifest::empty(),
            Case::default,
            |_case| Ok(()),
        );
        let invoker = unit.invoker();

        let handle = std::thread::spawn(move || {
            invoker().unwrap();
            invoker().unwrap();
        });
        handle.join().unwrap();
    }
}
