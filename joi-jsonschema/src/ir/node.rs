//! Schema description IR.
//!
//! A [`SchemaNode`] is the normalized description of one validation
//! constraint as produced by the Describer: a type tag, an ordered list of
//! rules, option flags, allowed values, metadata, and type-specific children.
//! Field names follow the Describer's JSON output so a description can be
//! decoded with `serde_json::from_value`.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One node of a schema description tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Type discriminant (`string`, `object`, ...). Selects the handler.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Rules in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,

    /// Option flags.
    #[serde(default)]
    pub flags: Flags,

    /// Allowed literal values, possibly including `null`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valids: Vec<Value>,

    /// Metadata fragments, merged left to right.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Vec<Map<String, Value>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Example wrappers of the form `{"value": ...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Array item types (any position).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SchemaNode>>,

    /// Array item types by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_items: Option<Vec<SchemaNode>>,

    /// Object children in declaration order.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "ordered_children"
    )]
    pub children: Option<Vec<(String, SchemaNode)>>,

    /// Object children keyed by pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternRule>>,

    /// Object key dependencies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<Dependency>>,

    /// Alternation branches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<Alternative>>,

    /// Values coerced to `true` by a boolean schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truthy: Option<Vec<Value>>,

    /// Values coerced to `false` by a boolean schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub falsy: Option<Vec<Value>>,
}

impl SchemaNode {
    /// Create a bare node of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Append a rule.
    pub fn with_rule(mut self, name: impl Into<String>, arg: Value) -> Self {
        self.rules.push(Rule::new(name, arg));
        self
    }

    /// Set the flags.
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Add allowed values.
    pub fn with_valids(mut self, valids: impl IntoIterator<Item = Value>) -> Self {
        self.valids.extend(valids);
        self
    }

    /// Append a metadata fragment.
    pub fn with_meta(mut self, fragment: Map<String, Value>) -> Self {
        self.meta.get_or_insert_with(Vec::new).push(fragment);
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append an array item type.
    pub fn with_item(mut self, item: SchemaNode) -> Self {
        self.items.get_or_insert_with(Vec::new).push(item);
        self
    }

    /// Append a positional array item type.
    pub fn with_ordered_item(mut self, item: SchemaNode) -> Self {
        self.ordered_items.get_or_insert_with(Vec::new).push(item);
        self
    }

    /// Append an object child.
    pub fn with_child(mut self, key: impl Into<String>, child: SchemaNode) -> Self {
        self.children
            .get_or_insert_with(Vec::new)
            .push((key.into(), child));
        self
    }

    /// Append an alternation branch.
    pub fn with_alternative(mut self, branch: SchemaNode) -> Self {
        self.alternatives
            .get_or_insert_with(Vec::new)
            .push(Alternative::Schema(branch));
        self
    }

    /// Presence of this node when it is an object child.
    pub fn presence(&self) -> Presence {
        self.flags.presence.unwrap_or_default()
    }
}

/// A named rule with its argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub arg: Value,
}

impl Rule {
    /// Create a rule.
    pub fn new(name: impl Into<String>, arg: Value) -> Self {
        Self {
            name: name.into(),
            arg,
        }
    }

    /// Look up a member of an object-shaped argument.
    pub fn arg_field(&self, key: &str) -> Option<&Value> {
        self.arg.get(key)
    }

    /// Whether a member of an object-shaped argument is truthy.
    pub fn arg_flag(&self, key: &str) -> bool {
        self.arg_field(key).is_some_and(truthy)
    }
}

/// Option flags of a node.
///
/// Flags the converter inspects are typed; everything else is kept in
/// [`Flags::other`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<Presence>,

    /// Restrict the node to its `valids`.
    #[serde(default, alias = "only", deserialize_with = "lenient_bool")]
    pub allow_only: bool,

    /// Default value. `Some(Value::Null)` is an explicit `null` default.
    #[serde(
        default,
        deserialize_with = "explicit_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    /// Whether undeclared object keys are accepted.
    #[serde(default, alias = "unknown", skip_serializing_if = "Option::is_none")]
    pub allow_unknown: Option<bool>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub sparse: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub timestamp: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub truncate: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub trim: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub normalize: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub insensitive: bool,

    /// Letter case restriction (`lower` or `upper`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub byte_aligned: bool,

    /// Flags the converter does not interpret.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Flags {
    /// Set the presence flag.
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Restrict the node to its `valids`.
    pub fn with_allow_only(mut self, allow_only: bool) -> Self {
        self.allow_only = allow_only;
        self
    }
}

/// Presence of an object child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Required,
    Forbidden,
    #[default]
    #[serde(other)]
    Optional,
}

/// A pattern-keyed object child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Key pattern as a regex literal, e.g. `/\d+/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Key constrained by a schema instead of a regex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<SchemaNode>>,

    /// Schema for values under matching keys.
    pub rule: SchemaNode,
}

/// A dependency between object keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Relation kind: `and`, `with`, `or`, `xor`, ...
    #[serde(rename = "type", alias = "rel")]
    pub relation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default)]
    pub peers: Vec<String>,
}

/// One branch of an alternation.
///
/// A branch carrying `type` is always decoded as a schema, so a malformed
/// schema branch reports its own decode error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Alternative {
    /// A plain schema branch.
    Schema(SchemaNode),
    /// A conditional `when` branch.
    Conditional(Conditional),
}

/// Conditional branch (`ref`/`is`/`then`/`otherwise`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<Value>,
}

impl<'de> Deserialize<'de> for Alternative {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Some(fields) = value.as_object() else {
            return Err(de::Error::custom("alternative must be an object"));
        };

        if fields.contains_key("type") {
            return SchemaNode::deserialize(value)
                .map(Alternative::Schema)
                .map_err(de::Error::custom);
        }

        if CONDITIONAL_KEYS.iter().any(|key| fields.contains_key(*key)) {
            return Conditional::deserialize(value)
                .map(Alternative::Conditional)
                .map_err(de::Error::custom);
        }

        Err(de::Error::custom(
            "alternative must carry `type` or one of `ref`, `is`, `then`, `otherwise`",
        ))
    }
}

const CONDITIONAL_KEYS: [&str; 4] = ["ref", "is", "then", "otherwise"];

/// JavaScript-style truthiness of a described value.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| truthy(&v))
}

fn explicit_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

mod ordered_children {
    use super::*;

    type Children = Option<Vec<(String, SchemaNode)>>;

    pub fn serialize<S>(children: &Children, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match children {
            Some(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Children, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(ChildrenVisitor)
    }

    struct ChildrenVisitor;

    impl<'de> Visitor<'de> for ChildrenVisitor {
        type Value = Children;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of child keys to schema descriptions")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut children = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, child)) = access.next_entry::<String, SchemaNode>()? {
                children.push((key, child));
            }
            Ok(Some(children))
        }
    }
}
