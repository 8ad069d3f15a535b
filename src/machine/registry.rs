// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 nodeflow contributors

//! Machine registry
//!
//! Maps a stable type name to a constructor. The embedding application fills
//! the registry at startup and hands it to whatever needs to create machines
//! by name (the text codec, the `init` templates).

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use super::Machine;

/// Constructor for a fresh, default-configured machine
pub type MachineFactory = Box<dyn Fn() -> Box<dyn Machine> + Send + Sync>;

/// Registered machine types by name
#[derive(Default)]
pub struct MachineRegistry {
    factories: BTreeMap<String, MachineFactory>,
}

impl MachineRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in machine
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtin::register_all(&mut registry);
        registry
    }

    /// Register a factory under `name`, replacing any earlier one
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Machine> + Send + Sync + 'static,
    {
        if self
            .factories
            .insert(name.to_string(), Box::new(factory))
            .is_some()
        {
            warn!(machine = name, "replacing previously registered machine type");
        }
    }

    /// Instantiate the machine registered as `name`
    pub fn create(&self, name: &str) -> Option<Box<dyn Machine>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for MachineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::testing::StubMachine;

    #[test]
    fn test_register_and_create() {
        let mut registry = MachineRegistry::new();
        assert!(registry.is_empty());

        registry.register("Stub.One", || Box::new(StubMachine::new("Stub.One", 1, 1)));

        let machine = registry.create("Stub.One").unwrap();
        assert_eq!(machine.type_name(), "Stub.One");
        assert!(registry.contains("Stub.One"));
        assert!(registry.create("Stub.Two").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = MachineRegistry::new();
        registry.register("Stub", || Box::new(StubMachine::new("first", 0, 1)));
        registry.register("Stub", || Box::new(StubMachine::new("second", 0, 1)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.create("Stub").unwrap().type_name(), "second");
    }

    #[test]
    fn test_builtins_are_sorted() {
        let registry = MachineRegistry::with_builtins();
        let names: Vec<_> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(registry.contains("Text.Reverse"));
        assert!(registry.contains("Sink.File"));
    }
}
