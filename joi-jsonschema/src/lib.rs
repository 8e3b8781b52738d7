//! # joi-jsonschema
//!
//! Convert [Joi](https://joi.dev/) schema descriptions into JSON Schema.
//!
//! The converter never sees Joi chains directly. It works on the tree a
//! schema's `describe()` produces, either as the JSON that call returns or as
//! a [`SchemaNode`] built in Rust. Anything JSON Schema cannot express fails
//! loudly instead of being approximated.
//!
//! ## Quick Start
//!
//! ```rust
//! use joi_jsonschema::{ConversionOptions, Converter};
//! use serde_json::json;
//!
//! let mut converter = Converter::new(
//!     ConversionOptions::new()
//!         .with_extract(true)
//!         .with_extract_path("/components/schemas/"),
//! )?;
//!
//! let schema = converter.convert(&json!({
//!     "type": "object",
//!     "meta": [{"extract": "Foo"}],
//!     "children": {
//!         "bar": {"type": "string", "flags": {"presence": "required"}}
//!     }
//! }))?;
//!
//! assert_eq!(schema, Some(json!({"$ref": "#/components/schemas/Foo"})));
//! assert_eq!(
//!     converter.schemas().get("/components/schemas/Foo"),
//!     Some(&json!({
//!         "type": "object",
//!         "properties": {"bar": {"type": "string"}},
//!         "required": ["bar"]
//!     }))
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Options
//!
//! | Option | Description | Default |
//! |--------|-------------|---------|
//! | `types` | Handlers overriding or adding node types | none |
//! | `ipFormat` | `format` for `ip()` strings | `ipv4` |
//! | `extract` | Move sub-schemas named by `extract` meta into the registry | `false` |
//! | `extractPath` | Prefix for relative extraction names | `/` |
//! | `ignoreUnknownRules` | Skip unrecognised rules | `false` |
//! | `ignoreUnknownTypes` | Omit nodes of unrecognised types | `false` |
//!
//! ## Metadata Keys
//!
//! | Key | Effect |
//! |-----|--------|
//! | `extract` | Registers the node under this name and emits a `$ref` |
//! | `term` | Combinator for `alternatives` (`anyOf`, `oneOf`, `allOf`) |
//!
//! Every other meta key is copied into the output's `meta` object.

pub mod config;
pub mod converter;
pub mod describe;
pub mod error;
pub mod handlers;
pub mod ir;
pub mod patterns;
pub mod registry;

pub use config::{ConversionOptions, IpFormat};
pub use converter::Converter;
pub use describe::Describe;
pub use error::{ConfigError, ConfigResult, ConvertError, ConvertResult, ErrorKind};
pub use handlers::{NodeType, TypeHandler};
pub use ir::{OutputSchema, SchemaNode};
pub use registry::SchemaRegistry;
