//! Document wrapper

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identity::{Identity, Versioned};

/// A document with caller-defined attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    /// Reserved identity fields
    #[serde(flatten)]
    pub identity: Identity,

    /// Caller-defined attributes
    #[serde(flatten)]
    pub body: T,
}

/// A document whose attributes are kept as an untyped JSON object
pub type RawDocument = Document<Map<String, Value>>;

impl<T> Document<T> {
    /// Wrap attributes in a document without identity
    pub fn new(body: T) -> Self {
        Self {
            identity: Identity::default(),
            body,
        }
    }

    /// Wrap attributes in a document with a caller-chosen key
    pub fn with_key(key: impl Into<String>, body: T) -> Self {
        Self {
            identity: Identity::with_key(key),
            body,
        }
    }
}

impl<T> Versioned for Document<T> {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
}
