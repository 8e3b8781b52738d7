//! Shared `pattern` values for string rules.
//!
//! | rule | pattern |
//! |------|---------|
//! | `alphanum` | [`ALPHANUM`], picked by letter case |
//! | `token` | [`TOKEN`], picked by letter case |
//! | `hex` | [`HEX`] or [`HEX_BYTES`] |
//! | `base64` | [`BASE64`] or [`BASE64_UNPADDED`] |
//! | `dataUri` | [`DATA_URI`] |

use std::sync::OnceLock;

use regex::Regex;

/// Patterns for one character class, by letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasePatterns {
    pub insensitive: &'static str,
    pub lower: &'static str,
    pub upper: &'static str,
}

impl CasePatterns {
    /// Pick the pattern for a `case` flag. Anything but `lower`/`upper`
    /// matches both cases.
    pub fn for_case(&self, case: Option<&str>) -> &'static str {
        match case {
            Some("lower") => self.lower,
            Some("upper") => self.upper,
            _ => self.insensitive,
        }
    }
}

pub const ALPHANUM: CasePatterns = CasePatterns {
    insensitive: "^[a-zA-Z0-9]+$",
    lower: "^[a-z0-9]+$",
    upper: "^[A-Z0-9]+$",
};

pub const TOKEN: CasePatterns = CasePatterns {
    insensitive: "^[a-zA-Z0-9_]+$",
    lower: "^[a-z0-9_]+$",
    upper: "^[A-Z0-9_]+$",
};

pub const HEX: &str = "^[a-fA-F0-9]+$";

/// Hex in whole bytes.
pub const HEX_BYTES: &str = "^([a-fA-F0-9]{2})+$";

pub const BASE64: &str =
    "^([A-Za-z0-9+/]{4})*([A-Za-z0-9+/]{4}|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{2}==)$";

/// Base64 with optional padding.
pub const BASE64_UNPADDED: &str =
    r"^(?:[A-Za-z0-9+\/]{2}[A-Za-z0-9+\/]{2})*(?:[A-Za-z0-9+\/]{2}(==)?|[A-Za-z0-9+\/]{3}=?)?$";

pub const DATA_URI: &str = r"^data:[\w+.-]+/[\w+.-]+;((charset=[\w-]+|base64),)?(.*)$";

/// Pattern matching any object key.
pub const ANY_KEY: &str = "^.*$";

fn regex_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^/(?P<body>.*)/(?P<flags>[a-z]*)$")
            .expect("regex literal pattern must compile")
    })
}

/// Strip slash delimiters and trailing flags from a regex literal.
///
/// `/\d+/i` becomes `\d+`. Text that is not a slash-delimited literal is
/// already a bare pattern and is returned unchanged.
pub fn strip_regex_delimiters(literal: &str) -> &str {
    regex_literal_re()
        .captures(literal)
        .and_then(|caps| caps.name("body"))
        .map_or(literal, |body| body.as_str())
}
