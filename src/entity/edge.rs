//! Edge endpoints
//!
//! Edges compose a versioned identity with a `_from`/`_to` pair, each a
//! handle into some collection.

use serde::{Deserialize, Serialize};

use super::identity::{Identity, Versioned};

/// The `_from` and `_to` references of an edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(rename = "_from", default, skip_serializing_if = "String::is_empty")]
    from: String,

    #[serde(rename = "_to", default, skip_serializing_if = "String::is_empty")]
    to: String,
}

impl Endpoints {
    /// Create an endpoint pair
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns the source handle
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Returns the target handle
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Replace both references
    pub fn set(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.from = from.into();
        self.to = to.into();
    }
}

/// Capability of carrying edge endpoints
pub trait Connects {
    /// Returns the endpoints
    fn endpoints(&self) -> &Endpoints;

    /// Returns the endpoints for in-place update
    fn endpoints_mut(&mut self) -> &mut Endpoints;
}

impl Connects for Endpoints {
    fn endpoints(&self) -> &Endpoints {
        self
    }

    fn endpoints_mut(&mut self) -> &mut Endpoints {
        self
    }
}

/// An edge with caller-defined attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// Reserved identity fields
    #[serde(flatten)]
    pub identity: Identity,

    /// Reserved endpoint fields
    #[serde(flatten)]
    pub endpoints: Endpoints,

    /// Caller-defined attributes
    #[serde(flatten)]
    pub body: T,
}

impl<T> Edge<T> {
    /// Wrap attributes in an edge without identity or endpoints
    pub fn new(body: T) -> Self {
        Self {
            identity: Identity::default(),
            endpoints: Endpoints::default(),
            body,
        }
    }
}

impl<T> Versioned for Edge<T> {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
}

impl<T> Connects for Edge<T> {
    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn endpoints_mut(&mut self) -> &mut Endpoints {
        &mut self.endpoints
    }
}
