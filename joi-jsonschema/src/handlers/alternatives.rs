//! `alternatives` handler.
//!
//! Branches are collected under a combinator keyword instead of `type`.
//! The combinator is `anyOf` unless the node's meta names another one
//! under the `term` key.

use super::unknown_rule;
use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::{Alternative, OutputSchema, SchemaNode};

const TYPE_NAME: &str = "alternatives";

/// Combinator used when none is named.
pub const DEFAULT_COMBINATOR: &str = "anyOf";

pub fn convert(
    node: &SchemaNode,
    mut out: OutputSchema,
    converter: &mut Converter,
) -> ConvertResult<Option<OutputSchema>> {
    let combinator = out
        .take_term()
        .unwrap_or_else(|| DEFAULT_COMBINATOR.to_string());

    for rule in &node.rules {
        unknown_rule(converter, TYPE_NAME, rule)?;
    }

    let mut branches = Vec::new();
    for alternative in node.alternatives.iter().flatten() {
        let branch = match alternative {
            Alternative::Schema(branch) => branch,
            Alternative::Conditional(_) => {
                return Err(ConvertError::unsupported("alternatives.when()"))
            }
        };

        if let Some(converted) = converter.convert_node(branch)? {
            branches.push(converted);
        }
    }

    out.insert(combinator, branches);
    Ok(Some(out))
}
