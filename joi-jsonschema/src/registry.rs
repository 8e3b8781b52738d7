//! Registry of extracted sub-schemas.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::config::PATH_SEPARATOR;

/// Extracted sub-schemas keyed by their full slash-delimited path.
///
/// The registry only grows. Registering a path that is already present keeps
/// the existing schema: the first writer wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    schemas: Map<String, Value>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry from `(path, schema)` pairs.
    pub fn with_schemas<I, K>(schemas: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut registry = Self::new();
        for (path, schema) in schemas {
            registry.register(path, schema);
        }
        registry
    }

    /// Register a schema. Returns `false` and leaves the registry untouched
    /// if the path is already taken.
    pub fn register(&mut self, path: impl Into<String>, schema: Value) -> bool {
        let path = path.into();
        if self.schemas.contains_key(&path) {
            return false;
        }
        self.schemas.insert(path, schema);
        true
    }

    /// Get a schema by path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.schemas.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.schemas.contains_key(path)
    }

    /// Registered paths and schemas, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.schemas.iter()
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Render the registry as a nested JSON document, one object level per
    /// path segment: `/components/schemas/Foo` lands at
    /// `{"components": {"schemas": {"Foo": ...}}}`.
    ///
    /// A path that is a prefix of another registered path cannot be nested
    /// without overwriting a schema; the schema registered first keeps its
    /// slot and the later, conflicting one is left out.
    pub fn to_document(&self) -> Value {
        let mut root = Map::new();
        let mut leaves: HashSet<Vec<&str>> = HashSet::new();

        for (path, schema) in &self.schemas {
            let segments: Vec<&str> = path
                .split(PATH_SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .collect();

            let Some((leaf, parents)) = segments.split_last() else {
                continue;
            };

            let shadowed = (1..segments.len()).any(|n| leaves.contains(&segments[..n]));
            let slot = if shadowed {
                None
            } else {
                descend(&mut root, parents)
            };

            match slot {
                Some(slot) if !slot.contains_key(*leaf) => {
                    slot.insert((*leaf).to_string(), schema.clone());
                    leaves.insert(segments.clone());
                }
                _ => tracing::debug!(path = %path, "registry path conflicts with an earlier schema"),
            }
        }

        Value::Object(root)
    }
}

fn descend<'a>(
    map: &'a mut Map<String, Value>,
    segments: &[&str],
) -> Option<&'a mut Map<String, Value>> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(map);
    };

    match map
        .entry((*first).to_string())
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(inner) => descend(inner, rest),
        _ => None,
    }
}
