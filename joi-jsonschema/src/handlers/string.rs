//! `string` handler.

use serde_json::Value;

use super::{apply_length, unknown_rule, STRING_LENGTH};
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::node::truthy;
use crate::ir::{OutputSchema, Rule, SchemaNode};
use crate::patterns::{
    strip_regex_delimiters, ALPHANUM, BASE64, BASE64_UNPADDED, DATA_URI, HEX, HEX_BYTES, TOKEN,
};

const TYPE_NAME: &str = "string";

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    out.insert("type", TYPE_NAME);

    let flags = &node.flags;
    let rejected = [
        (flags.truncate, "string.truncate()"),
        (flags.trim, "string.trim()"),
        (flags.normalize, "string.normalize()"),
        (flags.insensitive, "string.insensitive()"),
    ];
    if let Some((_, construct)) = rejected.into_iter().find(|(set, _)| *set) {
        return Err(ConvertError::unsupported(construct));
    }

    for rule in &node.rules {
        if apply_length(&mut out, TYPE_NAME, rule, STRING_LENGTH)? {
            continue;
        }

        let (keyword, value): (&str, Value) = match rule.name.as_str() {
            "alphanum" => ("pattern", ALPHANUM.for_case(flags.case.as_deref()).into()),
            "token" => ("pattern", TOKEN.for_case(flags.case.as_deref()).into()),
            "hex" => {
                let bytes = flags.byte_aligned || rule.arg_flag("byteAligned");
                ("pattern", Value::from(if bytes { HEX_BYTES } else { HEX }))
            }
            "base64" => {
                let padded = rule.arg_field("paddingRequired").map_or(true, truthy);
                ("pattern", Value::from(if padded { BASE64 } else { BASE64_UNPADDED }))
            }
            "dataUri" => ("pattern", DATA_URI.into()),
            "ip" => ("format", converter.options().ip_format.as_str().into()),
            "uri" => ("format", "uri".into()),
            "guid" | "uuid" => ("format", "uuid".into()),
            "hostname" => ("format", "hostname".into()),
            "email" => ("format", "email".into()),
            "isoDate" => ("format", "date-time".into()),
            "regex" | "pattern" => ("pattern", regex_source(rule)?.into()),
            _ => {
                unknown_rule(converter, TYPE_NAME, rule)?;
                continue;
            }
        };
        out.insert(keyword, value);
    }

    Ok(Some(out))
}

/// Pattern text of a `regex` rule: either `{"pattern": "/.../"}` or the
/// literal itself.
fn regex_source(rule: &Rule) -> ConvertResult<&str> {
    if rule.arg_flag("invert") {
        return Err(ConvertError::unsupported("string.regex(..., {invert: true})"));
    }

    rule.arg_field("pattern")
        .unwrap_or(&rule.arg)
        .as_str()
        .map(strip_regex_delimiters)
        .ok_or_else(|| {
            ConvertError::not_a_schema(format!("string rule:{} has no pattern", rule.name))
        })
}
