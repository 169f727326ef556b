//! Opaque id shape and the id-or-alias identifier.
//!
//! Catalog ids are base64-encoded global ids (`gid://<app>/<Type>/<n>`).
//! Anything that does not decode to that shape is treated as an alias.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use std::fmt;

const GID_PREFIX: &[u8] = b"gid://";

/// Whether a string has the catalog's opaque-id shape.
pub fn is_id(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
        .iter()
        .filter_map(|engine| engine.decode(value).ok())
        .any(|decoded| decoded.starts_with(GID_PREFIX))
}

/// Encode a global id for an entity type and number.
pub fn encode_id(app: &str, type_name: &str, number: u64) -> String {
    URL_SAFE_NO_PAD.encode(format!("gid://{app}/{type_name}/{number}"))
}

/// A user-supplied identifier, classified once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Opaque server-assigned id
    ById(String),
    /// Human-friendly alias
    ByAlias(String),
}

impl Identifier {
    /// Classify a string by its lexical shape.
    pub fn parse(value: &str) -> Self {
        if is_id(value) {
            Self::ById(value.to_string())
        } else {
            Self::ByAlias(value.to_string())
        }
    }

    /// The raw identifier string
    pub fn as_str(&self) -> &str {
        match self {
            Self::ById(s) | Self::ByAlias(s) => s,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Self::ById(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "id {id}"),
            Self::ByAlias(alias) => write!(f, "alias {alias}"),
        }
    }
}
