//! Conversion options.
//!
//! Options are fixed for the lifetime of a [`Converter`](crate::Converter)
//! and validated when it is built. They can be assembled with the `with_*`
//! builders or loaded from a `.toml` / `.json` file:
//!
//! ```toml
//! ipFormat = "ipv6"
//! extract = true
//! extractPath = "/components/schemas/"
//! ignoreUnknownRules = false
//! ignoreUnknownTypes = true
//! ```
//!
//! Handler overrides are code, so they can only be set with
//! [`ConversionOptions::with_type`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::handlers::TypeHandler;

/// Default prefix for non-absolute extraction names.
pub const DEFAULT_EXTRACT_PATH: &str = "/";

/// Separator between extraction path segments.
pub const PATH_SEPARATOR: char = '/';

/// JSON Schema `format` used for IP address strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFormat {
    #[default]
    Ipv4,
    Ipv6,
}

impl IpFormat {
    /// The `format` keyword value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
        }
    }
}

impl fmt::Display for IpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling a conversion session.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Handlers overriding or adding node types. Checked before built-ins.
    #[serde(skip)]
    pub types: HashMap<String, TypeHandler>,

    /// Format for `ip()` strings.
    pub ip_format: IpFormat,

    /// Whether `extract` meta names pull sub-schemas into the registry.
    pub extract: bool,

    /// Prefix for extraction names not starting with `/`.
    pub extract_path: String,

    /// Skip unrecognised rules instead of failing.
    pub ignore_unknown_rules: bool,

    /// Omit nodes of unrecognised types instead of failing.
    pub ignore_unknown_types: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            types: HashMap::new(),
            ip_format: IpFormat::default(),
            extract: false,
            extract_path: DEFAULT_EXTRACT_PATH.to_string(),
            ignore_unknown_rules: false,
            ignore_unknown_types: false,
        }
    }
}

impl fmt::Debug for ConversionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.types.keys().collect();
        types.sort();
        f.debug_struct("ConversionOptions")
            .field("types", &types)
            .field("ip_format", &self.ip_format)
            .field("extract", &self.extract)
            .field("extract_path", &self.extract_path)
            .field("ignore_unknown_rules", &self.ignore_unknown_rules)
            .field("ignore_unknown_types", &self.ignore_unknown_types)
            .finish()
    }
}

impl ConversionOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a node type, replacing any built-in.
    pub fn with_type(mut self, type_name: impl Into<String>, handler: TypeHandler) -> Self {
        self.types.insert(type_name.into(), handler);
        self
    }

    pub fn with_ip_format(mut self, ip_format: IpFormat) -> Self {
        self.ip_format = ip_format;
        self
    }

    pub fn with_extract(mut self, extract: bool) -> Self {
        self.extract = extract;
        self
    }

    pub fn with_extract_path(mut self, extract_path: impl Into<String>) -> Self {
        self.extract_path = extract_path.into();
        self
    }

    pub fn ignore_unknown_rules(mut self, ignore: bool) -> Self {
        self.ignore_unknown_rules = ignore;
        self
    }

    pub fn ignore_unknown_types(mut self, ignore: bool) -> Self {
        self.ignore_unknown_types = ignore;
        self
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::invalid_toml("<inline>", e.to_string()))
    }

    /// Parse options from JSON text.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load options from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| ConfigError::invalid_toml(path, e.to_string())),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Check the options and fill in defaults for empty values.
    pub fn validate(mut self) -> ConfigResult<Self> {
        if self.extract_path.is_empty() {
            self.extract_path = DEFAULT_EXTRACT_PATH.to_string();
        } else if !self.extract_path.starts_with(PATH_SEPARATOR) {
            return Err(ConfigError::InvalidExtractPath {
                path: self.extract_path,
            });
        }

        Ok(self)
    }

    /// Full registry path for an extraction name.
    ///
    /// Names starting with `/` are absolute; others are appended to
    /// `extract_path` verbatim.
    pub fn extraction_path(&self, name: &str) -> String {
        if name.starts_with(PATH_SEPARATOR) {
            name.to_string()
        } else {
            format!("{}{}", self.extract_path, name)
        }
    }
}
