//! Class registry for blessed-value materialization.

use indexmap::IndexMap;

use crate::values::{Blessed, StorableValue};

/// Constructor invoked for a registered class: receives the class name and
/// the decoded underlying value, returns the materialized value.
pub type BlessFn = dyn Fn(&str, StorableValue) -> StorableValue + Send + Sync;

/// Ordered mapping from class (package) name to constructor.
///
/// Classes without a registration materialize as a generic
/// [`Blessed`] wrapper carrying the class name and the underlying
/// structure, so no data is dropped.
#[derive(Default)]
pub struct ClassRegistry {
    factories: IndexMap<String, Box<BlessFn>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Registers a constructor for a class name. A later registration for
    /// the same name replaces the earlier one.
    pub fn register<F>(&mut self, class: impl Into<String>, factory: F)
    where
        F: Fn(&str, StorableValue) -> StorableValue + Send + Sync + 'static,
    {
        self.factories.insert(class.into(), Box::new(factory));
    }

    /// Returns `true` if a constructor is registered for `class`.
    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Materializes a decoded underlying value for `class`.
    pub fn construct(&self, class: &str, underlying: StorableValue) -> StorableValue {
        match self.factories.get(class) {
            Some(factory) => factory(class, underlying),
            None => StorableValue::Blessed(Box::new(Blessed::new(class, underlying))),
        }
    }
}
