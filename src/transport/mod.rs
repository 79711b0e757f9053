//! Transport collaborator
//!
//! The client never opens sockets itself. It hands a fully-shaped
//! [`HttpRequest`] to a [`Transport`] and classifies whatever comes back.
//! TLS, pooling, timeouts and cancellation all belong to the transport and
//! are passed through unexamined.
//!
//! [`HttpTransport`] is the default implementation, built on a blocking
//! `reqwest` client from a [`ConnectionConfig`](crate::connection::ConnectionConfig).

mod blocking;
mod message;

#[cfg(test)]
pub(crate) mod scripted;

pub use blocking::HttpTransport;
pub use message::{HttpRequest, HttpResponse};

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

use crate::errors::{classify, Classified, ClientResult};

/// No response could be obtained for a request.
///
/// Always terminal for the call that produced it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    /// Create a transport error without an underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping its cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Sends one request and returns the server's response.
///
/// Implementations must be shareable: independent operations issued by
/// different callers run concurrently over the same transport.
pub trait Transport: Send + Sync {
    /// Execute a single request/response exchange
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Execute `request` and classify the outcome
pub(crate) fn send(transport: &dyn Transport, request: HttpRequest) -> ClientResult<Classified> {
    let response = transport.execute(request)?;
    classify(response)
}
