//! Test Descriptors
//!
//! Identifies the test a composed statement belongs to. A descriptor is the
//! context handed to class-scoped rules; a `MethodRef` is the context handed
//! to instance-scoped rules. Both are plain data: no reflection exists, so a
//! method reference carries nothing beyond the identity of its test.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a (test type, method name) pair.
///
/// Equality and hashing use the type's `TypeId` plus the method name, so two
/// descriptors for identically-named methods on different test types are
/// distinct. The type name is retained only for display.
#[derive(Debug, Clone, Copy)]
pub struct TestDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    method: &'static str,
}

impl TestDescriptor {
    /// Create a descriptor for method `method` on test type `T`.
    pub fn of<T: 'static>(method: &'static str) -> Self {
        TestDescriptor {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            method,
        }
    }

    /// Name of the test type, as reported by the compiler.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Name of the test method.
    pub fn method(&self) -> &'static str {
        self.method
    }
}

impl PartialEq for TestDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.method == other.method
    }
}

impl Eq for TestDescriptor {}

impl Hash for TestDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.method.hash(state);
    }
}

impl fmt::Display for TestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trailing path segment keeps suite listings readable
        let short = self.type_name.rsplit("::").next().unwrap_or(self.type_name);
        write!(f, "{}::{}", short, self.method)
    }
}

/// Context handed to instance-scoped rules alongside the live test instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodRef {
    descriptor: TestDescriptor,
}

impl MethodRef {
    /// Create a method reference from a descriptor.
    pub fn new(descriptor: TestDescriptor) -> Self {
        MethodRef { descriptor }
    }

    /// The descriptor this reference points at.
    pub fn descriptor(&self) -> &TestDescriptor {
        &self.descriptor
    }
}
