//! Entity identifiers
//!
//! # ID Convention
//!
//! All entity references cross the API boundary as strings and are parsed
//! into [`Id`] exactly once, at that boundary. Internal code passes `Id`
//! around and never re-validates or assumes a particular representation.
//!
//! Generated ids are uuid-v4 in simple (32 hex chars) form. Parsing accepts
//! any reasonable external spelling (hyphenated uuids, hex object ids) as
//! long as it stays within the charset and length limits below.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted identifier length
pub const MAX_ID_LEN: usize = 64;

/// Opaque entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Id(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Parse and validate an externally supplied identifier
    ///
    /// `field` names the offending field in the error message.
    pub fn parse(value: &str, field: &str) -> Result<Self, crate::error::AppError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(crate::error::AppError::validation(format!(
                "Missing required field: {field}"
            )));
        }
        if trimmed.len() > MAX_ID_LEN {
            return Err(crate::error::AppError::validation(format!(
                "Invalid identifier for field {field}: too long ({} chars, max {MAX_ID_LEN})",
                trimmed.len()
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(crate::error::AppError::validation(format!(
                "Invalid identifier for field {field}: illegal characters"
            )));
        }
        Ok(Id(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
