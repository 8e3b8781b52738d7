//! The Describer contract.
//!
//! The converter never walks user-authored validation chains itself. It asks
//! the value for its description: a [`SchemaNode`] tree. Anything that can
//! answer that question implements [`Describe`].
//!
//! ## Provided Implementations
//!
//! - [`SchemaNode`]: already a description, always convertible.
//! - [`serde_json::Value`]: the Describer's JSON output. A value is
//!   recognised as a schema when it is an object carrying a string `type`.
//!
//! ## Manual Implementation
//!
//! ```rust
//! use joi_jsonschema::{ConvertResult, Describe, SchemaNode};
//!
//! struct Port;
//!
//! impl Describe for Port {
//!     fn is_schema(&self) -> bool {
//!         true
//!     }
//!
//!     fn describe(&self) -> ConvertResult<SchemaNode> {
//!         Ok(SchemaNode::new("number").with_rule("port", serde_json::Value::Null))
//!     }
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConvertError, ConvertResult};
use crate::ir::SchemaNode;

/// A value that can describe itself as a schema tree.
pub trait Describe {
    /// Marker identifying the value as a convertible schema.
    ///
    /// The converter refuses values for which this is `false` before asking
    /// for a description.
    fn is_schema(&self) -> bool;

    /// Produce the normalized description tree.
    fn describe(&self) -> ConvertResult<SchemaNode>;
}

impl Describe for SchemaNode {
    fn is_schema(&self) -> bool {
        true
    }

    fn describe(&self) -> ConvertResult<SchemaNode> {
        Ok(self.clone())
    }
}

impl Describe for Value {
    fn is_schema(&self) -> bool {
        self.get("type").is_some_and(Value::is_string)
    }

    fn describe(&self) -> ConvertResult<SchemaNode> {
        SchemaNode::deserialize_description(self)
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn is_schema(&self) -> bool {
        (**self).is_schema()
    }

    fn describe(&self) -> ConvertResult<SchemaNode> {
        (**self).describe()
    }
}

impl SchemaNode {
    /// Decode a description from the Describer's JSON output.
    pub fn deserialize_description(value: &Value) -> ConvertResult<SchemaNode> {
        SchemaNode::deserialize(value).map_err(|e| ConvertError::not_a_schema(e.to_string()))
    }
}
