//! Per-type handlers.
//!
//! Every node type maps to one handler. A handler receives the node, the
//! fragment holding the type-agnostic keywords built so far, and the
//! [`Converter`] for recursion and options. It returns the finished fragment,
//! or `None` to drop the node.
//!
//! # Built-in Types
//!
//! | Node type | JSON Schema `type` |
//! |-----------|--------------------|
//! | `string` | `string` |
//! | `number` | `number` / `integer` |
//! | `boolean` | `boolean` |
//! | `binary` | `string` (`format: binary` / `byte`) |
//! | `date` | `string` (`format: date-time`) |
//! | `array` | `array` |
//! | `object` | `object` |
//! | `alternatives` | none, a combinator (`anyOf` by default) |
//!
//! Handlers registered through [`ConversionOptions::with_type`] are checked
//! before this table, so they can replace a built-in or add a new type.
//!
//! [`ConversionOptions::with_type`]: crate::ConversionOptions::with_type

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::{OutputSchema, Rule, SchemaNode};

pub mod alternatives;
pub mod array;
pub mod binary;
pub mod boolean;
pub mod date;
pub mod number;
pub mod object;
pub mod string;

/// Signature of a built-in handler.
pub type BuiltinHandler =
    fn(&SchemaNode, OutputSchema, &mut Converter) -> ConvertResult<Option<OutputSchema>>;

/// A user-supplied handler overriding or adding a node type.
pub type TypeHandler = Arc<
    dyn Fn(&SchemaNode, OutputSchema, &mut Converter) -> ConvertResult<Option<OutputSchema>>
        + Send
        + Sync,
>;

/// Node types with a built-in handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    String,
    Number,
    Boolean,
    Binary,
    Date,
    Array,
    Object,
    Alternatives,
}

impl NodeType {
    /// Every built-in type.
    pub const ALL: [NodeType; 8] = [
        NodeType::String,
        NodeType::Number,
        NodeType::Boolean,
        NodeType::Binary,
        NodeType::Date,
        NodeType::Array,
        NodeType::Object,
        NodeType::Alternatives,
    ];

    /// The `type` discriminant of the description.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
            Self::Date => "date",
            Self::Array => "array",
            Self::Object => "object",
            Self::Alternatives => "alternatives",
        }
    }

    /// The built-in handler for this type.
    pub fn handler(&self) -> BuiltinHandler {
        match self {
            Self::String => string::convert,
            Self::Number => number::convert,
            Self::Boolean => boolean::convert,
            Self::Binary => binary::convert,
            Self::Date => date::convert,
            Self::Array => array::convert,
            Self::Object => object::convert,
            Self::Alternatives => alternatives::convert,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|node_type| node_type.as_str() == s)
            .ok_or_else(|| ConvertError::unknown_type(s))
    }
}

/// Keywords receiving `min`/`max`/`length` limits.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LengthKeywords {
    pub min: &'static str,
    pub max: &'static str,
}

pub(crate) const STRING_LENGTH: LengthKeywords = LengthKeywords {
    min: "minLength",
    max: "maxLength",
};

/// Apply a `min`/`max`/`length` rule. Returns `false` for any other rule.
pub(crate) fn apply_length(
    out: &mut OutputSchema,
    type_name: &str,
    rule: &Rule,
    keywords: LengthKeywords,
) -> ConvertResult<bool> {
    match rule.name.as_str() {
        "min" => {
            out.insert(keywords.min, number_arg(type_name, rule)?);
        }
        "max" => {
            out.insert(keywords.max, number_arg(type_name, rule)?);
        }
        "length" => {
            let limit = number_arg(type_name, rule)?;
            out.insert(keywords.min, limit.clone());
            out.insert(keywords.max, limit);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// The rule argument as a literal number.
///
/// References to other values cannot be expressed as a JSON Schema limit.
pub(crate) fn number_arg(type_name: &str, rule: &Rule) -> ConvertResult<Value> {
    match &rule.arg {
        Value::Number(_) => Ok(rule.arg.clone()),
        other => Err(ConvertError::unsupported(format!(
            "{type_name}.{}({other})",
            rule.name
        ))),
    }
}

/// Skip a rule the handler does not recognise, or fail.
pub(crate) fn unknown_rule(converter: &Converter, type_name: &str, rule: &Rule) -> ConvertResult<()> {
    if converter.options().ignore_unknown_rules {
        tracing::debug!(type_name = %type_name, rule = %rule.name, "Skipping unknown rule");
        Ok(())
    } else {
        Err(ConvertError::unknown_rule(type_name, &rule.name))
    }
}

/// Convert child nodes, leaving out those that convert to nothing.
pub(crate) fn convert_each<'a>(
    converter: &mut Converter,
    nodes: impl IntoIterator<Item = &'a SchemaNode>,
) -> ConvertResult<Vec<Value>> {
    let mut converted = Vec::new();
    for node in nodes {
        if let Some(value) = converter.convert_node(node)? {
            converted.push(value);
        }
    }
    Ok(converted)
}
