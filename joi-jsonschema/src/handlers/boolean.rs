//! `boolean` handler.

use super::unknown_rule;
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::{OutputSchema, SchemaNode};

const TYPE_NAME: &str = "boolean";

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    // The literal itself is always listed; any extra entry is a coerced alias.
    let coercions = [
        (&node.truthy, "boolean.truthy()"),
        (&node.falsy, "boolean.falsy()"),
    ];
    for (aliases, construct) in coercions {
        if aliases.as_ref().is_some_and(|aliases| aliases.len() > 1) {
            return Err(ConvertError::unsupported(construct));
        }
    }

    for rule in &node.rules {
        unknown_rule(converter, TYPE_NAME, rule)?;
    }

    out.insert("type", TYPE_NAME);
    Ok(Some(out))
}
