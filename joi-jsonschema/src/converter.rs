//! Conversion entry point.
//!
//! A [`Converter`] owns its options and its extraction registry. Every node
//! goes through [`Converter::convert_node`], which builds the keywords shared
//! by all types, resolves extraction, then hands the node to its handler.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::ConversionOptions;
use crate::describe::Describe;
use crate::error::{ConfigResult, ConvertError, ConvertResult};
use crate::handlers::{BuiltinHandler, NodeType, TypeHandler};
use crate::ir::{reference, Meta, OutputSchema, SchemaNode};
use crate::registry::SchemaRegistry;

/// A resolved handler.
enum Handler {
    Builtin(BuiltinHandler),
    Custom(TypeHandler),
}

/// Converts schema descriptions into JSON Schema.
///
/// # Example
///
/// ```rust
/// use joi_jsonschema::{ConversionOptions, Converter};
/// use serde_json::json;
///
/// let mut converter = Converter::new(ConversionOptions::new())?;
/// let schema = converter.convert(&json!({
///     "type": "string",
///     "rules": [{"name": "min", "arg": 3}]
/// }))?;
///
/// assert_eq!(schema, Some(json!({"type": "string", "minLength": 3})));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Converter {
    options: ConversionOptions,
    schemas: SchemaRegistry,
}

impl Converter {
    /// Create a converter with an empty registry.
    pub fn new(options: ConversionOptions) -> ConfigResult<Self> {
        Self::with_registry(options, SchemaRegistry::new())
    }

    /// Create a converter whose registry starts with `schemas`.
    pub fn with_registry(options: ConversionOptions, schemas: SchemaRegistry) -> ConfigResult<Self> {
        Ok(Self {
            options: options.validate()?,
            schemas,
        })
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Sub-schemas extracted so far.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Consume the converter, keeping its registry.
    pub fn into_schemas(self) -> SchemaRegistry {
        self.schemas
    }

    /// Convert a schema.
    ///
    /// Returns `None` when the root node itself is dropped (an unknown type
    /// with unknown types tolerated, or a handler that omits it).
    pub fn convert<D: Describe + ?Sized>(&mut self, schema: &D) -> ConvertResult<Option<Value>> {
        if !schema.is_schema() {
            return Err(ConvertError::not_a_schema("value does not describe a schema"));
        }

        let node = schema.describe()?;
        self.convert_node(&node)
    }

    /// Convert one node and its descendants.
    pub fn convert_node(&mut self, node: &SchemaNode) -> ConvertResult<Option<Value>> {
        let Some(handler) = self.resolve(&node.type_name) else {
            if self.options.ignore_unknown_types {
                debug!(type_name = %node.type_name, "Dropping node of unknown type");
                return Ok(None);
            }
            return Err(ConvertError::unknown_type(&node.type_name));
        };

        trace!(type_name = %node.type_name, rules = node.rules.len(), "Converting node");

        let mut out = OutputSchema::new();

        if node.valids.iter().any(Value::is_null) {
            out.insert("nullable", true);
        }

        if node.flags.allow_only && !node.valids.is_empty() {
            let allowed: Vec<Value> = node
                .valids
                .iter()
                .filter(|value| !value.is_null())
                .cloned()
                .collect();
            out.insert("enum", allowed);
        }

        if let Some(fragments) = &node.meta {
            let meta = out.meta_mut();
            for fragment in fragments {
                meta.merge(fragment);
            }
        }

        let extraction = self.extraction_path(&out);
        if let Some(path) = &extraction {
            if self.schemas.contains(path) {
                debug!(path = %path, "Reusing extracted schema");
                return Ok(Some(reference(path)));
            }
        }

        if let Some(notes) = &node.notes {
            out.meta_mut().push_notes(notes);
        }
        if let Some(tags) = &node.tags {
            out.meta_mut().push_tags(tags);
        }
        if let Some(unit) = &node.unit {
            out.meta_mut().set_unit(unit.as_str());
        }

        if let Some(examples) = &node.examples {
            let values: Vec<Value> = examples
                .iter()
                .filter_map(|example| example.as_object()?.get("value").cloned())
                .collect();
            out.insert("examples", values);
        }

        if let Some(label) = &node.label {
            out.insert("title", label.as_str());
        }
        if let Some(description) = &node.description {
            out.insert("description", description.as_str());
        }
        if let Some(default) = &node.flags.default {
            out.insert("default", default.clone());
        }

        let converted = match handler {
            Handler::Builtin(handler) => handler(node, out, self)?,
            Handler::Custom(handler) => handler(node, out, self)?,
        };
        let Some(mut out) = converted else {
            debug!(type_name = %node.type_name, "Handler dropped node");
            return Ok(None);
        };

        let Some(path) = extraction else {
            return Ok(Some(out.into_value()));
        };

        out.take_extract();
        if self.schemas.register(path.as_str(), out.into_value()) {
            debug!(path = %path, "Extracted schema");
        } else {
            debug!(path = %path, "Keeping schema registered during descent");
        }
        Ok(Some(reference(&path)))
    }

    /// Override first, then the built-in table.
    fn resolve(&self, type_name: &str) -> Option<Handler> {
        if let Some(handler) = self.options.types.get(type_name) {
            return Some(Handler::Custom(Arc::clone(handler)));
        }

        type_name
            .parse::<NodeType>()
            .ok()
            .map(|node_type| Handler::Builtin(node_type.handler()))
    }

    /// Registry path for the node, when extraction applies to it.
    fn extraction_path(&self, out: &OutputSchema) -> Option<String> {
        if !self.options.extract {
            return None;
        }

        out.meta()
            .and_then(Meta::extract_name)
            .map(|name| self.options.extraction_path(name))
    }
}
