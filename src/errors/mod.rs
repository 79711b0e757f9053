//! Error taxonomy for the client
//!
//! Every call returns either its result or exactly one `ClientError`:
//!
//! - `Transport`: no response was obtained; terminal, never retried here
//! - `Server`: any non-success status, carrying the server's error body
//! - `Conflict`: 409/412, carrying the authoritative current revision
//! - `EndOfCursor`: sentinel from the cursor protocol, not server-origin
//!
//! Errors are surfaced verbatim. This layer performs no recovery.

mod classify;
mod server;

pub use classify::{classify, revision_from_etag, Classified};
pub use server::{error_num, ServerError};

use std::fmt;

use thiserror::Error;

use crate::entity::Revision;
use crate::transport::TransportError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Stable error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response received
    Transport,
    /// Non-success status from the server
    Server,
    /// Revision precondition failed or write conflict
    Conflict,
    /// Cursor permanently exhausted
    EndOfCursor,
    /// Response body did not match the receiver
    Decode,
    /// Request body could not be serialized
    Encode,
    /// Invalid connection configuration
    Config,
}

impl ErrorKind {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "ARANGO_TRANSPORT",
            ErrorKind::Server => "ARANGO_SERVER",
            ErrorKind::Conflict => "ARANGO_CONFLICT",
            ErrorKind::EndOfCursor => "ARANGO_END_OF_CURSOR",
            ErrorKind::Decode => "ARANGO_DECODE",
            ErrorKind::Encode => "ARANGO_ENCODE",
            ErrorKind::Config => "ARANGO_CONFIG",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a conditional write or read was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// 412: supplied revision does not match the current one
    PreconditionFailed,
    /// 409: duplicate key on create, or concurrent write conflict
    Conflict,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::PreconditionFailed => write!(f, "precondition failed"),
            ConflictReason::Conflict => write!(f, "conflict"),
        }
    }
}

/// A 409/412 failure together with the entity's current revision.
///
/// The current revision is what a caller needs to retry deterministically.
/// It is `None` only when the server reported neither a `_rev` field nor
/// an `ETag` header (typical for duplicate-key 409s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictError {
    reason: ConflictReason,
    current_revision: Option<Revision>,
    server: ServerError,
}

impl ConflictError {
    /// Create a conflict error
    pub fn new(
        reason: ConflictReason,
        current_revision: Option<Revision>,
        server: ServerError,
    ) -> Self {
        Self {
            reason,
            current_revision,
            server,
        }
    }

    /// Returns why the request was refused
    pub fn reason(&self) -> ConflictReason {
        self.reason
    }

    /// Returns the revision the entity currently has on the server
    pub fn current_revision(&self) -> Option<&Revision> {
        self.current_revision.as_ref()
    }

    /// Returns the underlying server error body
    pub fn server(&self) -> &ServerError {
        &self.server
    }

    /// True when this is a duplicate key on create rather than a revision mismatch
    pub fn is_duplicate_key(&self) -> bool {
        self.server.is_duplicate_key()
    }
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.current_revision {
            Some(rev) => write!(
                f,
                "{} (current revision {}): {}",
                self.reason, rev, self.server
            ),
            None => write!(f, "{}: {}", self.reason, self.server),
        }
    }
}

impl std::error::Error for ConflictError {}

/// Client error
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response obtained from the transport
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Server answered with a non-success status
    #[error("server error: {0}")]
    Server(ServerError),

    /// Server refused the request on revision grounds
    #[error("{0}")]
    Conflict(ConflictError),

    /// Cursor has no local data and nothing left on the server
    #[error("cursor has no more results")]
    EndOfCursor,

    /// Response body could not be decoded into the receiver
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request payload could not be serialized
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connection configuration rejected
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ClientError::Config(msg.into())
    }

    /// Returns the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Server(_) => ErrorKind::Server,
            ClientError::Conflict(_) => ErrorKind::Conflict,
            ClientError::EndOfCursor => ErrorKind::EndOfCursor,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::Encode(_) => ErrorKind::Encode,
            ClientError::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Returns the server error body for server-origin failures
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            ClientError::Server(e) => Some(e),
            ClientError::Conflict(c) => Some(c.server()),
            _ => None,
        }
    }

    /// Returns the conflict details for 409/412 failures
    pub fn conflict(&self) -> Option<&ConflictError> {
        match self {
            ClientError::Conflict(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the HTTP status for server-origin failures
    pub fn status(&self) -> Option<u16> {
        self.server_error().map(ServerError::code)
    }

    /// Returns the current revision carried by a conflict
    pub fn current_revision(&self) -> Option<&Revision> {
        self.conflict().and_then(ConflictError::current_revision)
    }

    /// True for 404 responses
    pub fn is_not_found(&self) -> bool {
        self.server_error().is_some_and(ServerError::is_not_found)
    }

    /// True for 409/412 responses
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict(_))
    }

    /// True for the cursor exhaustion sentinel
    pub fn is_end_of_cursor(&self) -> bool {
        matches!(self, ClientError::EndOfCursor)
    }
}
