//! # Schema Registry
//!
//! Named record schemas of one resolution pass, plus the names whose
//! members are still being resolved.

use indexmap::IndexMap;
use openapiv3::Schema;
use std::collections::HashSet;

/// Record name to schema, in registration order.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Schema>,
    in_progress: HashSet<String>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a schema (complete or not) exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// The schema registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Whether `name` is registered and all of its members are resolved.
    pub fn is_complete(&self, name: &str) -> bool {
        self.contains(name) && !self.in_progress.contains(name)
    }

    /// Registers a placeholder before members are resolved, so recursive
    /// references to `name` terminate.
    pub fn reserve(&mut self, name: &str, placeholder: Schema) {
        self.schemas.insert(name.to_string(), placeholder);
        self.in_progress.insert(name.to_string());
    }

    /// Replaces the placeholder with the finished schema.
    pub fn complete(&mut self, name: &str, schema: Schema) {
        self.in_progress.remove(name);
        self.schemas.insert(name.to_string(), schema);
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Consumes the registry into the components map.
    pub fn into_schemas(self) -> IndexMap<String, Schema> {
        self.schemas
    }
}
