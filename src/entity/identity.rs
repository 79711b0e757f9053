//! Versioned identity
//!
//! The reserved `_id`, `_key`, `_rev` fields shared by every stored entity.
//! Identities are assigned by the server on create and echoed back into the
//! caller's value. Only the revision changes afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque revision token.
///
/// Changes on every successful mutation. Never interpreted client-side,
/// only compared for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Create a revision from its wire form
    pub fn new(rev: impl Into<String>) -> Self {
        Self(rev.into())
    }

    /// Returns the wire form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True before the server has assigned a revision
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Revision {
    fn from(rev: &str) -> Self {
        Self(rev.to_string())
    }
}

impl From<String> for Revision {
    fn from(rev: String) -> Self {
        Self(rev)
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a stored entity: `<collection>/<key>`, key, revision.
///
/// Empty fields are omitted on the wire so a fresh value can be posted
/// without identity and the server assigns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    id: String,

    #[serde(rename = "_key", default, skip_serializing_if = "String::is_empty")]
    key: String,

    #[serde(rename = "_rev", default, skip_serializing_if = "Revision::is_empty")]
    rev: Revision,
}

impl Identity {
    /// Create a fully populated identity
    pub fn new(id: impl Into<String>, key: impl Into<String>, rev: impl Into<Revision>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            rev: rev.into(),
        }
    }

    /// Identity with only a caller-chosen key, for creates
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Returns the collection-qualified id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the revision
    pub fn rev(&self) -> &Revision {
        &self.rev
    }

    /// Returns the collection segment of the id, if assigned
    pub fn collection(&self) -> Option<&str> {
        self.id.split_once('/').map(|(collection, _)| collection)
    }

    /// True once the server has assigned an id
    pub fn is_assigned(&self) -> bool {
        !self.id.is_empty()
    }

    /// Take over the identity the server assigned on create
    pub fn assign(&mut self, assigned: Identity) {
        *self = assigned;
    }

    /// Record the revision produced by a successful write
    pub fn set_rev(&mut self, rev: Revision) {
        self.rev = rev;
    }
}

/// Capability of carrying a versioned identity.
///
/// Implement it by embedding an [`Identity`] with `#[serde(flatten)]` and
/// returning it from the two accessors.
pub trait Versioned {
    /// Returns the identity
    fn identity(&self) -> &Identity;

    /// Returns the identity for in-place update
    fn identity_mut(&mut self) -> &mut Identity;

    /// Returns the collection-qualified id
    fn id(&self) -> &str {
        self.identity().id()
    }

    /// Returns the key
    fn key(&self) -> &str {
        self.identity().key()
    }

    /// Returns the revision
    fn rev(&self) -> &Revision {
        self.identity().rev()
    }
}

impl Versioned for Identity {
    fn identity(&self) -> &Identity {
        self
    }

    fn identity_mut(&mut self) -> &mut Identity {
        self
    }
}
