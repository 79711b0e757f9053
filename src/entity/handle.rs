//! Entity handles
//!
//! A handle is the `<collection>/<key>` string that addresses one entity.
//! Handles are never validated client-side: the request builder forwards
//! whatever it is given and the server decides (400/404).

use std::fmt;

/// Collection and key pair addressing one entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    raw: String,
}

impl Handle {
    /// Build a handle from its parts
    pub fn new(collection: &str, key: &str) -> Self {
        Self {
            raw: format!("{}/{}", collection, key),
        }
    }

    /// Returns the collection part, if the handle has one
    pub fn collection(&self) -> Option<&str> {
        self.raw.split_once('/').map(|(collection, _)| collection)
    }

    /// Returns the key part, if the handle has one
    pub fn key(&self) -> Option<&str> {
        self.raw.split_once('/').map(|(_, key)| key)
    }

    /// Returns the full handle string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<&str> for Handle {
    fn from(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }
}

impl From<String> for Handle {
    fn from(raw: String) -> Self {
        Self { raw }
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
