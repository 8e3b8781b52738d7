//! Output fragment IR.
//!
//! An [`OutputSchema`] is one JSON Schema fragment under construction. JSON
//! Schema keywords live in an open map; pass-through metadata lives in a
//! separate [`Meta`] bag whose converter-relevant keys are named fields, so
//! they can be consumed before the fragment is emitted.

use serde_json::{Map, Value};

/// Meta key naming a sub-schema for extraction.
pub const EXTRACT_KEY: &str = "extract";

/// Meta key overriding the alternation combinator.
pub const TERM_KEY: &str = "term";

const NOTES_KEY: &str = "notes";
const TAGS_KEY: &str = "tags";
const UNIT_KEY: &str = "unit";

/// Pass-through metadata bag, emitted as the `meta` keyword.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    entries: Map<String, Value>,
    notes: Option<Vec<Value>>,
    tags: Option<Vec<Value>>,
    unit: Option<Value>,
    extract: Option<Value>,
    term: Option<Value>,
}

impl Meta {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one metadata fragment. Later keys overwrite earlier ones.
    pub fn merge(&mut self, fragment: &Map<String, Value>) {
        for (key, value) in fragment {
            match key.as_str() {
                EXTRACT_KEY => self.extract = Some(value.clone()),
                TERM_KEY => self.term = Some(value.clone()),
                NOTES_KEY => self.notes = Some(into_sequence(value)),
                TAGS_KEY => self.tags = Some(into_sequence(value)),
                UNIT_KEY => self.unit = Some(value.clone()),
                _ => {
                    self.entries.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Set an arbitrary pass-through entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Look up a pass-through entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Append notes.
    pub fn push_notes<'a>(&mut self, notes: impl IntoIterator<Item = &'a String>) {
        self.notes
            .get_or_insert_with(Vec::new)
            .extend(notes.into_iter().cloned().map(Value::String));
    }

    /// Append tags.
    pub fn push_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) {
        self.tags
            .get_or_insert_with(Vec::new)
            .extend(tags.into_iter().cloned().map(Value::String));
    }

    /// Set the unit. Last write wins.
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = Some(Value::String(unit.into()));
    }

    /// The extraction name, when one is present and is a non-empty string.
    pub fn extract_name(&self) -> Option<&str> {
        self.extract
            .as_ref()
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Remove and return the extraction name.
    pub fn take_extract(&mut self) -> Option<String> {
        take_string(&mut self.extract)
    }

    /// Remove and return the combinator override.
    pub fn take_term(&mut self) -> Option<String> {
        take_string(&mut self.term)
    }

    /// Whether nothing would be emitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.notes.is_none()
            && self.tags.is_none()
            && self.unit.is_none()
            && self.extract.is_none()
            && self.term.is_none()
    }

    /// Render the bag as a JSON object.
    pub fn into_value(self) -> Value {
        let mut map = self.entries;
        if let Some(notes) = self.notes {
            map.insert(NOTES_KEY.to_string(), Value::Array(notes));
        }
        if let Some(tags) = self.tags {
            map.insert(TAGS_KEY.to_string(), Value::Array(tags));
        }
        if let Some(unit) = self.unit {
            map.insert(UNIT_KEY.to_string(), unit);
        }
        if let Some(extract) = self.extract {
            map.insert(EXTRACT_KEY.to_string(), extract);
        }
        if let Some(term) = self.term {
            map.insert(TERM_KEY.to_string(), term);
        }
        Value::Object(map)
    }
}

fn into_sequence(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values.clone(),
        other => vec![other.clone()],
    }
}

fn take_string(slot: &mut Option<Value>) -> Option<String> {
    match slot.take() {
        Some(Value::String(s)) => Some(s),
        other => {
            *slot = other;
            None
        }
    }
}

/// One JSON Schema fragment under construction.
///
/// `meta` is emitted at the position it was first created, between the
/// keywords set before and after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSchema {
    keywords: Map<String, Value>,
    meta: Option<Meta>,
    meta_slot: usize,
}

impl OutputSchema {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a keyword, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.keywords.insert(key.into(), value.into())
    }

    /// Look up a keyword.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.keywords.get(key)
    }

    /// Remove a keyword, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.keywords.keys().position(|k| k == key)?;
        if index < self.meta_slot {
            self.meta_slot -= 1;
        }
        self.keywords.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keywords.contains_key(key)
    }

    /// All keywords set so far.
    pub fn keywords(&self) -> &Map<String, Value> {
        &self.keywords
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// The metadata bag, created on first use.
    pub fn meta_mut(&mut self) -> &mut Meta {
        if self.meta.is_none() {
            self.meta_slot = self.keywords.len();
        }
        self.meta.get_or_insert_with(Meta::new)
    }

    /// Consume the extraction name, dropping the bag if it is left empty.
    pub fn take_extract(&mut self) -> Option<String> {
        let name = self.meta.as_mut()?.take_extract();
        self.drop_empty_meta();
        name
    }

    /// Consume the combinator override, dropping the bag if it is left empty.
    pub fn take_term(&mut self) -> Option<String> {
        let term = self.meta.as_mut()?.take_term();
        self.drop_empty_meta();
        term
    }

    fn drop_empty_meta(&mut self) {
        if self.meta.as_ref().is_some_and(Meta::is_empty) {
            self.meta = None;
        }
    }

    /// Render the fragment as a JSON object.
    pub fn into_value(self) -> Value {
        let Some(meta) = self.meta else {
            return Value::Object(self.keywords);
        };

        let mut map = Map::with_capacity(self.keywords.len() + 1);
        let mut keywords = self.keywords.into_iter();
        map.extend(keywords.by_ref().take(self.meta_slot));
        map.insert("meta".to_string(), meta.into_value());
        map.extend(keywords);
        Value::Object(map)
    }
}

impl From<OutputSchema> for Value {
    fn from(schema: OutputSchema) -> Self {
        schema.into_value()
    }
}

/// Build the reference object substituted for an extracted sub-schema.
pub fn reference(path: &str) -> Value {
    let mut map = Map::new();
    map.insert("$ref".to_string(), Value::String(format!("#{path}")));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_meta_merge_overwrites_left_to_right() {
        let mut meta = Meta::new();
        meta.merge(&fragment(json!({"a": 1, "b": 2})));
        meta.merge(&fragment(json!({"b": 3})));

        assert_eq!(meta.into_value(), json!({"a": 1, "b": 3}));
    }

    #[test]
    fn test_notes_and_tags_accumulate() {
        let mut meta = Meta::new();
        meta.merge(&fragment(json!({"notes": "from meta"})));
        meta.push_notes(&["one".to_string(), "two".to_string()]);
        meta.push_tags(&["t".to_string()]);
        meta.set_unit("ms");
        meta.set_unit("s");

        assert_eq!(
            meta.into_value(),
            json!({"notes": ["from meta", "one", "two"], "tags": ["t"], "unit": "s"})
        );
    }

    #[test]
    fn test_take_extract_only_consumes_strings() {
        let mut meta = Meta::new();
        meta.merge(&fragment(json!({"extract": 5})));
        assert_eq!(meta.extract_name(), None);
        assert_eq!(meta.take_extract(), None);
        assert_eq!(meta.into_value(), json!({"extract": 5}));
    }

    #[test]
    fn test_consuming_last_key_drops_meta() {
        let mut out = OutputSchema::new();
        out.meta_mut().merge(&fragment(json!({"extract": "Foo"})));
        out.insert("type", "object");

        assert_eq!(out.take_extract().as_deref(), Some("Foo"));
        assert!(out.meta().is_none());
        assert_eq!(out.into_value(), json!({"type": "object"}));
    }

    #[test]
    fn test_consuming_keeps_other_meta() {
        let mut out = OutputSchema::new();
        out.meta_mut()
            .merge(&fragment(json!({"term": "allOf", "extra": true})));

        assert_eq!(out.take_term().as_deref(), Some("allOf"));
        assert_eq!(out.into_value(), json!({"meta": {"extra": true}}));
    }

    #[test]
    fn test_empty_extract_name_is_ignored() {
        let mut meta = Meta::new();
        meta.merge(&fragment(json!({"extract": ""})));
        assert_eq!(meta.extract_name(), None);
    }

    #[test]
    fn test_meta_keeps_its_position() {
        let mut out = OutputSchema::new();
        out.insert("nullable", true);
        out.meta_mut().merge(&fragment(json!({"a": 1})));
        out.insert("title", "L");
        out.insert("type", "string");

        let keys: Vec<String> = match out.into_value() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => panic!("expected an object"),
        };
        assert_eq!(keys, ["nullable", "meta", "title", "type"]);
    }

    #[test]
    fn test_remove_before_meta_keeps_its_position() {
        let mut out = OutputSchema::new();
        out.insert("a", 1);
        out.insert("b", 2);
        out.meta_mut().insert("x", json!(true));
        out.insert("c", 3);
        out.remove("a");

        let keys: Vec<String> = match out.into_value() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => panic!("expected an object"),
        };
        assert_eq!(keys, ["b", "meta", "c"]);
    }

    #[test]
    fn test_reference_shape() {
        assert_eq!(
            reference("/components/schemas/Foo"),
            json!({"$ref": "#/components/schemas/Foo"})
        );
    }
}
