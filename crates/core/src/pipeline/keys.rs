//! Type-safe keys for PipeMap

use crate::args::BuildArgs;
use crate::layout::ProjectLayout;
use crate::report::{ErrorList, StatsReport};
use std::marker::PhantomData;

/// A type-safe key for PipeMap that enforces compile-time type checking
pub struct TypedKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> TypedKey<T> {
    /// Create a new typed key with a static name
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    /// Get the key name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name usable in a node's input list when the value may be absent
    pub fn optional(&self) -> String {
        format!("{}?", self.name)
    }
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedKey<T> {}

/// Arguments of the current build
pub const ARGS: TypedKey<BuildArgs> = TypedKey::new("args");

/// Project directories
pub const LAYOUT: TypedKey<ProjectLayout> = TypedKey::new("layout");

/// Stage errors accumulated so far
pub const ERRORS: TypedKey<ErrorList> = TypedKey::new("errors");

/// Final output statistics
pub const STATS: TypedKey<StatsReport> = TypedKey::new("stats");
