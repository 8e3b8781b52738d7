//! Error types for conversion and configuration.
//!
//! Conversion fails in exactly two ways: the input is not a convertible
//! schema at all ([`ErrorKind::InputShape`]), or it contains something JSON
//! Schema cannot express ([`ErrorKind::UnsupportedConstruct`]). There is no
//! partial output in either case.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type alias for building a converter.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The value handed to the converter is not a schema description.
    InputShape,
    /// An unknown type, an unknown rule, or a construct with no JSON Schema
    /// equivalent.
    UnsupportedConstruct,
}

/// Error raised while converting a schema description.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The value does not identify itself as a schema, or its description
    /// could not be decoded.
    #[error("schema must be a Joi object: {reason}")]
    NotASchema { reason: String },

    /// No handler is registered for the node type.
    #[error("unknown type for Joi object: {type_name}")]
    UnknownType { type_name: String },

    /// The handler for `type_name` does not recognise the rule.
    #[error("{type_name} rule:{rule} is not supported by JSON Schema")]
    UnknownRule { type_name: String, rule: String },

    /// A recognised construct that has no faithful JSON Schema translation.
    #[error("{construct} is not supported by JSON Schema")]
    Unsupported { construct: String },
}

impl ConvertError {
    /// Create an input-shape error.
    pub fn not_a_schema(reason: impl Into<String>) -> Self {
        Self::NotASchema {
            reason: reason.into(),
        }
    }

    /// Create an unknown-type error.
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Create an unknown-rule error.
    pub fn unknown_rule(type_name: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::UnknownRule {
            type_name: type_name.into(),
            rule: rule.into(),
        }
    }

    /// Create an error for a construct JSON Schema cannot represent.
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
        }
    }

    /// Which of the two error kinds this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotASchema { .. } => ErrorKind::InputShape,
            Self::UnknownType { .. } | Self::UnknownRule { .. } | Self::Unsupported { .. } => {
                ErrorKind::UnsupportedConstruct
            }
        }
    }
}

/// Error raised while building conversion options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `extractPath` must be absolute.
    #[error("extractPath must start with '/', got '{path}'")]
    InvalidExtractPath { path: String },

    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML.
    #[error("invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Config document is not valid JSON.
    #[error("invalid JSON configuration: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Config file extension is neither `.toml` nor `.json`.
    #[error("unsupported configuration format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path: path.into(),
            message: message.into(),
        }
    }
}
