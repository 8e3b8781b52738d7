//! `number` handler.
//!
//! `positive()`, `negative()` and `port()` only ever tighten a bound set by
//! an earlier rule: the stricter of the existing value and the implied edge
//! wins, and the winning value is kept as written.

use super::{number_arg, unknown_rule};
use crate::converter::Converter;
use crate::error::ConvertResult;
use crate::ir::{OutputSchema, SchemaNode};

const TYPE_NAME: &str = "number";

/// Largest TCP/UDP port.
const MAX_PORT: i64 = 65535;

#[derive(Debug, Clone, Copy)]
enum Edge {
    Lower,
    Upper,
}

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    out.insert("type", TYPE_NAME);

    for rule in &node.rules {
        match rule.name.as_str() {
            "integer" => {
                out.insert("type", "integer");
            }
            "precision" => {
                out.insert("type", TYPE_NAME);
                out.insert("format", "double");
            }
            "greater" => {
                out.insert("exclusiveMinimum", number_arg(TYPE_NAME, rule)?);
            }
            "less" => {
                out.insert("exclusiveMaximum", number_arg(TYPE_NAME, rule)?);
            }
            "min" => {
                out.insert("minimum", number_arg(TYPE_NAME, rule)?);
            }
            "max" => {
                out.insert("maximum", number_arg(TYPE_NAME, rule)?);
            }
            "multiple" => {
                out.insert("multipleOf", number_arg(TYPE_NAME, rule)?);
            }
            "positive" => tighten(&mut out, "exclusiveMinimum", 0, Edge::Lower),
            "negative" => tighten(&mut out, "exclusiveMaximum", 0, Edge::Upper),
            "port" => {
                out.insert("type", "integer");
                tighten(&mut out, "minimum", 0, Edge::Lower);
                tighten(&mut out, "maximum", MAX_PORT, Edge::Upper);
            }
            _ => unknown_rule(converter, TYPE_NAME, rule)?,
        }
    }

    Ok(Some(out))
}

/// Set `keyword` to `edge` unless it already holds a stricter bound.
fn tighten(out: &mut OutputSchema, keyword: &str, bound: i64, edge: Edge) {
    let stricter = out
        .get(keyword)
        .and_then(|existing| existing.as_f64())
        .is_some_and(|existing| match edge {
            Edge::Lower => existing > bound as f64,
            Edge::Upper => existing < bound as f64,
        });

    if !stricter {
        out.insert(keyword, bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionOptions;
    use crate::error::ConvertError;
    use crate::ir::Rule;
    use serde_json::{json, Value};

    fn run(rules: &[(&str, Value)]) -> ConvertResult<Value> {
        let mut node = SchemaNode::new("number");
        node.rules = rules
            .iter()
            .map(|(name, arg)| Rule::new(*name, arg.clone()))
            .collect();

        let mut converter = Converter::new(ConversionOptions::new()).unwrap();
        let out = convert(&node, OutputSchema::new(), &mut converter)?;
        Ok(out.map(OutputSchema::into_value).unwrap_or_default())
    }

    #[test]
    fn test_bounds() {
        let out = run(&[
            ("min", json!(1)),
            ("max", json!(10.5)),
            ("greater", json!(0)),
            ("less", json!(11)),
            ("multiple", json!(0.5)),
        ])
        .unwrap();

        assert_eq!(
            out,
            json!({
                "type": "number",
                "minimum": 1,
                "maximum": 10.5,
                "exclusiveMinimum": 0,
                "exclusiveMaximum": 11,
                "multipleOf": 0.5
            })
        );
    }

    #[test]
    fn test_integer_and_precision() {
        assert_eq!(run(&[("integer", Value::Null)]).unwrap()["type"], "integer");

        let out = run(&[("precision", json!(2))]).unwrap();
        assert_eq!(out, json!({"type": "number", "format": "double"}));
    }

    #[test]
    fn test_positive_keeps_tighter_bound() {
        assert_eq!(run(&[("positive", Value::Null)]).unwrap()["exclusiveMinimum"], 0);
        assert_eq!(
            run(&[("greater", json!(5)), ("positive", Value::Null)]).unwrap()["exclusiveMinimum"],
            5
        );
        assert_eq!(
            run(&[("greater", json!(-5)), ("positive", Value::Null)]).unwrap()["exclusiveMinimum"],
            0
        );
    }

    #[test]
    fn test_negative_keeps_tighter_bound() {
        assert_eq!(run(&[("negative", Value::Null)]).unwrap()["exclusiveMaximum"], 0);
        assert_eq!(
            run(&[("less", json!(-3)), ("negative", Value::Null)]).unwrap()["exclusiveMaximum"],
            -3
        );
    }

    #[test]
    fn test_port_clamps_range() {
        let out = run(&[("port", Value::Null)]).unwrap();
        assert_eq!(out, json!({"type": "integer", "minimum": 0, "maximum": 65535}));

        let out = run(&[("min", json!(1024)), ("max", json!(70000)), ("port", Value::Null)]).unwrap();
        assert_eq!(out["minimum"], 1024);
        assert_eq!(out["maximum"], 65535);
    }

    #[test]
    fn test_reference_limit_is_rejected() {
        let err = run(&[("min", json!({"ref": "other"}))]).unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported { .. }));
    }

    #[test]
    fn test_unknown_rule() {
        let err = run(&[("sign", json!("positive"))]).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownRule { .. }));
    }
}
