//! `object` handler.

use serde_json::{Map, Value};

use super::{apply_length, unknown_rule, LengthKeywords};
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::{Dependency, OutputSchema, PatternRule, Presence, SchemaNode};
use crate::patterns::{strip_regex_delimiters, ANY_KEY};

const TYPE_NAME: &str = "object";

const PROPERTY_COUNT: LengthKeywords = LengthKeywords {
    min: "minProperties",
    max: "maxProperties",
};

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    out.insert("type", TYPE_NAME);

    if let Some(allow_unknown) = node.flags.allow_unknown {
        out.insert("additionalProperties", allow_unknown);
    }

    for rule in &node.rules {
        if !apply_length(&mut out, TYPE_NAME, rule, PROPERTY_COUNT)? {
            unknown_rule(converter, TYPE_NAME, rule)?;
        }
    }

    let mut required = Vec::new();

    if let Some(children) = &node.children {
        let mut properties = Map::new();

        for (key, child) in children {
            let presence = child.presence();
            if presence == Presence::Forbidden {
                continue;
            }

            let Some(converted) = converter.convert_node(child)? else {
                continue;
            };

            if presence == Presence::Required {
                required.push(Value::String(key.clone()));
            }
            properties.insert(key.clone(), converted);
        }

        out.insert("properties", properties);
    }

    if let Some(patterns) = &node.patterns {
        let mut properties = Map::new();

        for pattern in patterns {
            let key = pattern_key(pattern)?;
            if let Some(converted) = converter.convert_node(&pattern.rule)? {
                properties.insert(key, converted);
            }
        }

        out.insert("patternProperties", properties);
    }

    if let Some(dependencies) = &node.dependencies {
        out.insert("dependencies", dependency_map(dependencies)?);
    }

    if !required.is_empty() {
        out.insert("required", required);
    }

    Ok(Some(out))
}

/// The `patternProperties` key for a pattern child.
fn pattern_key(pattern: &PatternRule) -> ConvertResult<String> {
    match (&pattern.schema, &pattern.regex) {
        (Some(schema), _) if is_any_string(schema) => Ok(ANY_KEY.to_string()),
        (Some(_), _) => Err(ConvertError::unsupported("object.pattern(schema)")),
        (None, Some(regex)) => Ok(strip_regex_delimiters(regex).to_string()),
        (None, None) => Err(ConvertError::not_a_schema(
            "object pattern needs a regex or a key schema",
        )),
    }
}

/// A key schema accepting every string.
fn is_any_string(schema: &SchemaNode) -> bool {
    let flags = &schema.flags;
    schema.type_name == "string"
        && schema.rules.is_empty()
        && schema.valids.is_empty()
        && !flags.allow_only
        && !flags.insensitive
        && !flags.trim
        && !flags.truncate
        && !flags.normalize
        && flags.case.is_none()
}

fn dependency_map(dependencies: &[Dependency]) -> ConvertResult<Map<String, Value>> {
    let mut map = Map::new();

    for dependency in dependencies {
        match dependency.relation.as_str() {
            "and" => {
                for peer in &dependency.peers {
                    let others: Vec<Value> = dependency
                        .peers
                        .iter()
                        .filter(|other| *other != peer)
                        .cloned()
                        .map(Value::String)
                        .collect();
                    map.insert(peer.clone(), Value::Array(others));
                }
            }
            "with" => {
                let key = dependency.key.as_ref().ok_or_else(|| {
                    ConvertError::not_a_schema("object dependency:with needs a key")
                })?;
                map.insert(key.clone(), dependency.peers.clone().into());
            }
            other => {
                return Err(ConvertError::unsupported(format!(
                    "object dependency:{other}"
                )))
            }
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionOptions;
    use crate::ir::Flags;
    use serde_json::json;

    fn run(node: &SchemaNode, options: ConversionOptions) -> ConvertResult<Value> {
        let mut converter = Converter::new(options).unwrap();
        let out = convert(node, OutputSchema::new(), &mut converter)?;
        Ok(out.map(OutputSchema::into_value).unwrap_or_default())
    }

    fn child(presence: Presence) -> SchemaNode {
        SchemaNode::new("string").with_flags(Flags::default().with_presence(presence))
    }

    #[test]
    fn test_presence() {
        let node = SchemaNode::new("object")
            .with_child("a", child(Presence::Required))
            .with_child("b", child(Presence::Forbidden))
            .with_child("c", child(Presence::Optional))
            .with_child("d", child(Presence::Required));

        let out = run(&node, ConversionOptions::new()).unwrap();
        assert_eq!(out["required"], json!(["a", "d"]));
        assert!(out["properties"].get("b").is_none());
        assert_eq!(out["properties"]["c"], json!({"type": "string"}));
    }

    #[test]
    fn test_forbidden_child_is_never_visited() {
        let node = SchemaNode::new("object").with_child(
            "gone",
            SchemaNode::new("symbol").with_flags(Flags::default().with_presence(Presence::Forbidden)),
        );

        let out = run(&node, ConversionOptions::new()).unwrap();
        assert_eq!(out, json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn test_unknown_and_counts() {
        let mut node = SchemaNode::new("object").with_rule("length", json!(2));
        node.flags.allow_unknown = Some(false);

        assert_eq!(
            run(&node, ConversionOptions::new()).unwrap(),
            json!({
                "type": "object",
                "additionalProperties": false,
                "minProperties": 2,
                "maxProperties": 2
            })
        );
    }

    #[test]
    fn test_pattern_properties() {
        let mut node = SchemaNode::new("object");
        node.patterns = Some(vec![
            PatternRule {
                regex: Some("/^x-/".to_string()),
                schema: None,
                rule: SchemaNode::new("number"),
            },
            PatternRule {
                regex: None,
                schema: Some(Box::new(SchemaNode::new("string"))),
                rule: SchemaNode::new("boolean"),
            },
        ]);

        assert_eq!(
            run(&node, ConversionOptions::new()).unwrap()["patternProperties"],
            json!({"^x-": {"type": "number"}, "^.*$": {"type": "boolean"}})
        );
    }

    #[test]
    fn test_constrained_key_schema_is_rejected() {
        let mut node = SchemaNode::new("object");
        node.patterns = Some(vec![PatternRule {
            regex: None,
            schema: Some(Box::new(SchemaNode::new("string").with_rule("min", json!(2)))),
            rule: SchemaNode::new("boolean"),
        }]);

        let err = run(&node, ConversionOptions::new()).unwrap_err();
        assert_eq!(err.to_string(), "object.pattern(schema) is not supported by JSON Schema");
    }

    #[test]
    fn test_dependencies() {
        let mut node = SchemaNode::new("object");
        node.dependencies = Some(vec![
            Dependency {
                relation: "and".to_string(),
                key: None,
                peers: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            },
            Dependency {
                relation: "with".to_string(),
                key: Some("d".to_string()),
                peers: vec!["e".to_string()],
            },
        ]);

        assert_eq!(
            run(&node, ConversionOptions::new()).unwrap()["dependencies"],
            json!({
                "a": ["b", "c"],
                "b": ["a", "c"],
                "c": ["a", "b"],
                "d": ["e"]
            })
        );
    }

    #[test]
    fn test_other_relations_are_rejected() {
        for relation in ["or", "xor", "nand", "without", "oxor"] {
            let mut node = SchemaNode::new("object");
            node.dependencies = Some(vec![Dependency {
                relation: relation.to_string(),
                key: None,
                peers: vec!["a".to_string(), "b".to_string()],
            }]);

            let err = run(&node, ConversionOptions::new().ignore_unknown_rules(true)).unwrap_err();
            assert!(matches!(err, ConvertError::Unsupported { .. }), "{relation}");
        }
    }
}
