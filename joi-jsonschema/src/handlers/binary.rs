//! `binary` handler.

use super::{apply_length, unknown_rule, STRING_LENGTH};
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::{OutputSchema, SchemaNode};

const TYPE_NAME: &str = "binary";

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    let format = match node.flags.encoding.as_deref() {
        None => "binary",
        Some("base64") => "byte",
        Some(other) => {
            return Err(ConvertError::unsupported(format!(
                "binary.encoding('{other}')"
            )))
        }
    };

    out.insert("type", "string");
    out.insert("format", format);

    for rule in &node.rules {
        if !apply_length(&mut out, TYPE_NAME, rule, STRING_LENGTH)? {
            unknown_rule(converter, TYPE_NAME, rule)?;
        }
    }

    Ok(Some(out))
}
