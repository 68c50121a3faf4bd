//! Fixture Manifests
//!
//! The static, ordered description of one test method's hooks and rules.
//! An external analysis pass builds the manifest once, in declaration order;
//! the composer only ever reads it. Ordering within each category is part of
//! the observable contract: outer rules run their setup logic first and
//! their cleanup logic last.

use crate::failure::Outcome;
use crate::rule::{ClassRule, InstanceRule};
use std::sync::Arc;

/// A setup or teardown hook on the class lifecycle (no instance in scope).
pub type ClassHook = Arc<dyn Fn() -> Outcome + Send + Sync>;

/// A setup or teardown hook on a single test instance.
pub type InstanceHook<T> = Arc<dyn Fn(&mut T) -> Outcome + Send + Sync>;

/// Where a rule value comes from.
///
/// Field-backed rules are stored once; accessor-backed rules are re-invoked
/// on every composition so a factory yields a fresh rule per invocation.
pub enum RuleSource<R> {
    /// A stored rule value.
    Stored(R),
    /// A zero-argument accessor producing the rule.
    Accessor(Arc<dyn Fn() -> R + Send + Sync>),
}

impl<R: Clone> RuleSource<R> {
    /// Obtain the rule, invoking the accessor if the source is one.
    pub fn resolve(&self) -> R {
        match self {
            RuleSource::Stored(rule) => rule.clone(),
            RuleSource::Accessor(accessor) => accessor(),
        }
    }
}

impl<R> RuleSource<R> {
    /// An accessor-backed source from a closure.
    pub fn accessor<F>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        RuleSource::Accessor(Arc::new(f))
    }
}

/// Ordered hooks and rule sources for one test method.
///
/// Immutable after construction; safe for unsynchronized concurrent reads.
pub struct FixtureManifest<T> {
    pub(crate) class_setup: Vec<ClassHook>,
    pub(crate) class_teardown: Vec<ClassHook>,
    pub(crate) instance_setup: Vec<InstanceHook<T>>,
    pub(crate) instance_teardown: Vec<InstanceHook<T>>,
    pub(crate) class_rules: Vec<RuleSource<ClassRule>>,
    pub(crate) instance_rules: Vec<RuleSource<InstanceRule<T>>>,
}

impl<T> FixtureManifest<T> {
    /// Start building a manifest. Hooks and rules are recorded in call order,
    /// which must match declaration order.
    pub fn builder() -> FixtureManifestBuilder<T> {
        FixtureManifestBuilder {
            manifest: FixtureManifest::empty(),
        }
    }

    /// A manifest with no hooks and no rules.
    pub fn empty() -> Self {
        FixtureManifest {
            class_setup: Vec::new(),
            class_teardown: Vec::new(),
            instance_setup: Vec::new(),
            instance_teardown: Vec::new(),
            class_rules: Vec::new(),
            instance_rules: Vec::new(),
        }
    }

    /// Whether the manifest declares no hooks and no rules. Composition
    /// collapses to a direct payload call in that case.
    pub fn is_empty(&self) -> bool {
        self.class_setup.is_empty()
            && self.class_teardown.is_empty()
            && self.instance_setup.is_empty()
            && self.instance_teardown.is_empty()
            && self.class_rules.is_empty()
            && self.instance_rules.is_empty()
    }
}

/// Builder for `FixtureManifest`.
pub struct FixtureManifestBuilder<T> {
    manifest: FixtureManifest<T>,
}

impl<T> FixtureManifestBuilder<T> {
    /// Append a class-setup hook.
    pub fn class_setup<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Outcome + Send + Sync + 'static,
    {
        self.manifest.class_setup.push(Arc::new(hook));
        self
    }

    /// Append a class-teardown hook.
    pub fn class_teardown<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Outcome + Send + Sync + 'static,
    {
        self.manifest.class_teardown.push(Arc::new(hook));
        self
    }

    /// Append an instance-setup hook.
    pub fn instance_setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut T) -> Outcome + Send + Sync + 'static,
    {
        self.manifest.instance_setup.push(Arc::new(hook));
        self
    }

    /// Append an instance-teardown hook.
    pub fn instance_teardown<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut T) -> Outcome + Send + Sync + 'static,
    {
        self.manifest.instance_teardown.push(Arc::new(hook));
        self
    }

    /// Append a class-scoped rule source.
    pub fn class_rule(mut self, source: RuleSource<ClassRule>) -> Self {
        self.manifest.class_rules.push(source);
        self
    }

    /// Append an instance-scoped rule source.
    pub fn instance_rule(mut self, source: RuleSource<InstanceRule<T>>) -> Self {
        self.manifest.instance_rules.push(source);
        self
    }

    /// Finish the manifest.
    pub fn build(self) -> FixtureManifest<T> {
        self.manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_manifest() {
        let manifest: FixtureManifest<()> = FixtureManifest::empty();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_any_hook_makes_manifest_non_empty() {
        let manifest: FixtureManifest<()> =
            FixtureManifest::builder().instance_setup(|_| Ok(())).build();
        assert!(!manifest.is_empty());

        let manifest: FixtureManifest<()> = FixtureManifest::builder()
            .class_rule(RuleSource::Stored(ClassRule::noop()))
            .build();
        assert!(!manifest.is_empty());
    }

    #[test]
    fn test_builder_preserves_declaration_order() {
        let manifest: FixtureManifest<Vec<u8>> = FixtureManifest::builder()
            .instance_setup(|v: &mut Vec<u8>| {
                v.push(1);
                Ok(())
            })
            .instance_setup(|v: &mut Vec<u8>| {
                v.push(2);
                Ok(())
            })
            .build();

        let mut probe = Vec::new();
        for hook in &manifest.instance_setup {
            hook(&mut probe).unwrap();
        }
        assert_eq!(probe, vec![1, 2]);
    }

    #[test]
    fn test_accessor_source_reinvoked() {
        use std::sync::atomic::{AtomicU32, Ordering};
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let source: RuleSource<ClassRule> = RuleSource::accessor(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ClassRule::noop()
        });

        source.resolve();
        source.resolve();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
