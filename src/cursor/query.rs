//! Cursor-creating request bodies

use serde::Serialize;
use serde_json::{Map, Value};

/// Query text plus bind parameters, sent to `POST /_api/cursor`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AqlQuery {
    query: String,

    #[serde(rename = "bindVars", skip_serializing_if = "Map::is_empty")]
    bind_vars: Map<String, Value>,

    #[serde(rename = "batchSize", skip_serializing_if = "Option::is_none")]
    batch_size: Option<u32>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    count: bool,
}

impl AqlQuery {
    /// Query with no bind parameters and the server's batch size
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Bind `@name` to `value`
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind_vars.insert(name.into(), value.into());
        self
    }

    /// Items per batch
    pub fn batch_size(mut self, size: u32) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Ask the server for the total result count
    pub fn count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// Returns the query text
    pub fn text(&self) -> &str {
        &self.query
    }
}

/// Paging for a by-example query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByExampleOptions {
    /// Matches to skip
    pub skip: Option<u64>,
    /// Maximum matches to return
    pub limit: Option<u64>,
    /// Items per batch
    pub batch_size: Option<u32>,
}

/// Body of `PUT /_api/simple/by-example`
#[derive(Debug, Serialize)]
pub(crate) struct ByExampleBody<'a, X: Serialize> {
    collection: &'a str,
    example: &'a X,

    #[serde(skip_serializing_if = "Option::is_none")]
    skip: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,

    #[serde(rename = "batchSize", skip_serializing_if = "Option::is_none")]
    batch_size: Option<u32>,
}

impl<'a, X: Serialize> ByExampleBody<'a, X> {
    pub(crate) fn new(collection: &'a str, example: &'a X, options: &ByExampleOptions) -> Self {
        Self {
            collection,
            example,
            skip: options.skip,
            limit: options.limit,
            batch_size: options.batch_size,
        }
    }
}
