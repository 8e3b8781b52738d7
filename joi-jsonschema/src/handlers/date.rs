//! `date` handler.
//!
//! Date limits become the `format*` keywords, rendered as UTC ISO-8601
//! timestamps with millisecond precision (`1988-05-30T00:00:00.000Z`).
//! A limit may be an RFC 3339 string, a `YYYY-MM-DD` date, or epoch
//! milliseconds.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

use super::unknown_rule;
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::{OutputSchema, Rule, SchemaNode};

const TYPE_NAME: &str = "date";

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    out.insert("type", "string");
    out.insert("format", "date-time");

    if node.flags.timestamp {
        return Err(ConvertError::unsupported("date.timestamp()"));
    }

    for rule in &node.rules {
        let keyword = match rule.name.as_str() {
            "min" => "formatMinimum",
            "max" => "formatMaximum",
            "greater" => "formatExclusiveMinimum",
            "less" => "formatExclusiveMaximum",
            _ => {
                unknown_rule(converter, TYPE_NAME, rule)?;
                continue;
            }
        };
        out.insert(keyword, iso_timestamp(rule)?);
    }

    Ok(Some(out))
}

fn iso_timestamp(rule: &Rule) -> ConvertResult<String> {
    let instant = match &rule.arg {
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(text) if text == "now" => None,
        Value::String(text) => parse_date(text),
        _ => None,
    };

    instant
        .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| ConvertError::unsupported(format!("date.{}({})", rule.name, rule.arg)))
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
