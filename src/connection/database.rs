//! Database handle

use std::fmt;
use std::sync::Arc;

use http::Method;
use serde::Serialize;
use tracing::info;

use super::config::ConnectionConfig;
use crate::cursor::{AqlQuery, ByExampleBody, ByExampleOptions, Cursor};
use crate::endpoint::{DocumentEndpoint, EdgeEndpoint};
use crate::errors::ClientResult;
use crate::transport::{HttpRequest, HttpTransport, Transport};

/// One database on one server, reached through a shared transport.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Database {
    transport: Arc<dyn Transport>,
    name: String,
    api: String,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").field("name", &self.name).finish()
    }
}

impl Database {
    /// Handle for database `name` over `transport`
    pub fn new(transport: Arc<dyn Transport>, name: impl Into<String>) -> Self {
        let name = name.into();
        let api = format!("/_db/{}/_api", name);
        Self {
            transport,
            name,
            api,
        }
    }

    /// Validate `config` and open an HTTP transport for it
    pub fn connect(config: &ConnectionConfig) -> ClientResult<Self> {
        config.validate()?;
        let transport = HttpTransport::from_config(config)?;

        info!(
            endpoint = config.base_url(),
            database = %config.database,
            accept_invalid_certs = config.accept_invalid_certs,
            "ARANGO_CONNECT"
        );

        Ok(Self::new(Arc::new(transport), config.database.clone()))
    }

    /// Returns the database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `/_db/{name}/_api` prefix
    pub fn api(&self) -> &str {
        &self.api
    }

    /// Document operations
    pub fn documents(&self) -> DocumentEndpoint {
        DocumentEndpoint::new(Arc::clone(&self.transport), self.api.clone())
    }

    /// Edge operations
    pub fn edges(&self) -> EdgeEndpoint {
        EdgeEndpoint::new(Arc::clone(&self.transport), self.api.clone())
    }

    /// Run a query and return a cursor over its result
    pub fn query(&self, query: &AqlQuery) -> ClientResult<Cursor> {
        let request =
            HttpRequest::new(Method::POST, format!("{}/cursor", self.api)).with_json(query)?;
        Cursor::open(Arc::clone(&self.transport), &self.api, request)
    }

    /// Return every document of `collection` matching `example`
    pub fn by_example<X: Serialize>(
        &self,
        collection: &str,
        example: &X,
        options: &ByExampleOptions,
    ) -> ClientResult<Cursor> {
        let body = ByExampleBody::new(collection, example, options);
        let request = HttpRequest::new(Method::PUT, format!("{}/simple/by-example", self.api))
            .with_json(&body)?;
        Cursor::open(Arc::clone(&self.transport), &self.api, request)
    }
}
