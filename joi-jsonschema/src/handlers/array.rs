//! `array` handler.
//!
//! | Declared items | Output |
//! |----------------|--------|
//! | one open type | `items: T` |
//! | several open types | `items: {anyOf: [...]}` |
//! | ordered types | `items: [...]`, open types go to `additionalItems` |

use serde_json::{json, Value};

use super::{apply_length, convert_each, unknown_rule, LengthKeywords};
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::{OutputSchema, SchemaNode};

const TYPE_NAME: &str = "array";

const ITEM_COUNT: LengthKeywords = LengthKeywords {
    min: "minItems",
    max: "maxItems",
};

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    out.insert("type", TYPE_NAME);

    if node.flags.sparse {
        return Err(ConvertError::unsupported("array.sparse()"));
    }

    for rule in &node.rules {
        if apply_length(&mut out, TYPE_NAME, rule, ITEM_COUNT)? {
            continue;
        }

        if rule.name == "unique" {
            if rule.arg_flag("ignoreUndefined") {
                return Err(ConvertError::unsupported(
                    "array.unique(..., {ignoreUndefined: true})",
                ));
            }
            if rule.arg_flag("comparator") {
                return Err(ConvertError::unsupported("array.unique(comparator)"));
            }
            out.insert("uniqueItems", true);
        } else {
            unknown_rule(converter, TYPE_NAME, rule)?;
        }
    }

    let open = convert_each(converter, node.items.iter().flatten())?;
    let ordered = convert_each(converter, node.ordered_items.iter().flatten())?;
    let open = any_of(open);

    if !ordered.is_empty() {
        out.insert("items", ordered);
        if let Some(open) = open {
            out.insert("additionalItems", open);
        }
    } else if let Some(open) = open {
        out.insert("items", open);
    }

    Ok(Some(out))
}

fn any_of(mut schemas: Vec<Value>) -> Option<Value> {
    match schemas.len() {
        0 => None,
        1 => schemas.pop(),
        _ => Some(json!({ "anyOf": schemas })),
    }
}
