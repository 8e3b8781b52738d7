//! Intermediate representation.
//!
//! [`node`] holds the input side (schema descriptions produced by the
//! Describer), [`output`] the JSON Schema fragments built from them.

pub mod node;
pub mod output;

pub use node::{
    Alternative, Conditional, Dependency, Flags, PatternRule, Presence, Rule, SchemaNode,
};
pub use output::{reference, Meta, OutputSchema, EXTRACT_KEY, TERM_KEY};
