//! Server error body
//!
//! Every non-success response from the server carries a JSON object of the
//! form `{"error": true, "code": 412, "errorNum": 1200, "errorMessage": "..."}`.
//! Document-scoped failures (409/412) additionally echo `_id`, `_rev` and
//! `_key` of the entity as it currently exists on the server.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Well-known server error numbers.
pub mod error_num {
    /// Write-write conflict / revision precondition failed
    pub const CONFLICT: i64 = 1200;
    /// Document handle did not resolve
    pub const DOCUMENT_NOT_FOUND: i64 = 1202;
    /// Collection did not resolve
    pub const COLLECTION_NOT_FOUND: i64 = 1203;
    /// Handle is syntactically invalid
    pub const DOCUMENT_HANDLE_BAD: i64 = 1205;
    /// Unique constraint violated (duplicate `_key` on create)
    pub const UNIQUE_CONSTRAINT_VIOLATED: i64 = 1210;
    /// Cursor id unknown or already released
    pub const CURSOR_NOT_FOUND: i64 = 1600;
}

/// Typed view of a server-side failure.
///
/// This is the uniform error surface shared by all endpoints: error flag,
/// HTTP code, server error number, message and the optional identity fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    #[serde(rename = "error", default)]
    is_error: bool,

    #[serde(default)]
    code: u16,

    #[serde(rename = "errorNum", default)]
    error_num: i64,

    #[serde(rename = "errorMessage", default)]
    message: String,

    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    rev: Option<String>,

    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
}

impl ServerError {
    /// Create an error from explicit parts
    pub fn new(code: u16, error_num: i64, message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            code,
            error_num,
            message: message.into(),
            id: None,
            rev: None,
            key: None,
        }
    }

    /// Synthesize an error for a response that carried no usable body.
    ///
    /// The error number mirrors the HTTP code since the server supplied none.
    pub fn from_status(status: StatusCode) -> Self {
        let message = status
            .canonical_reason()
            .unwrap_or("Unknown response from server");
        Self::new(status.as_u16(), i64::from(status.as_u16()), message)
    }

    /// Attach the document identity reported alongside the failure
    pub fn with_identity(
        mut self,
        id: impl Into<String>,
        key: impl Into<String>,
        rev: impl Into<String>,
    ) -> Self {
        self.id = Some(id.into());
        self.key = Some(key.into());
        self.rev = Some(rev.into());
        self
    }

    /// Normalize a per-item error from a batch response.
    ///
    /// Batch items report only `errorNum`; the HTTP code is implied by it.
    pub(crate) fn normalize_item(self) -> Self {
        let status = match self.error_num {
            error_num::DOCUMENT_NOT_FOUND
            | error_num::COLLECTION_NOT_FOUND
            | error_num::CURSOR_NOT_FOUND => StatusCode::NOT_FOUND,
            error_num::CONFLICT => StatusCode::PRECONDITION_FAILED,
            error_num::UNIQUE_CONSTRAINT_VIOLATED => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        self.normalize(status)
    }

    /// Fill gaps left by a partial body with what the status line says
    pub(crate) fn normalize(mut self, status: StatusCode) -> Self {
        self.is_error = true;
        if self.code == 0 {
            self.code = status.as_u16();
        }
        if self.message.is_empty() {
            self.message = status
                .canonical_reason()
                .unwrap_or("Unknown response from server")
                .to_string();
        }
        self
    }

    /// Returns the error flag as reported by the server
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Returns the HTTP status code
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Returns the server-specific error number
    pub fn error_num(&self) -> i64 {
        self.error_num
    }

    /// Returns the server's error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `_id` echoed with the error, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the `_rev` echoed with the error, if any
    pub fn rev(&self) -> Option<&str> {
        self.rev.as_deref()
    }

    /// Returns the `_key` echoed with the error, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// True for 404 responses (missing entity, collection or cursor)
    pub fn is_not_found(&self) -> bool {
        self.code == StatusCode::NOT_FOUND.as_u16()
    }

    /// True when a create collided with an existing `_key`
    pub fn is_duplicate_key(&self) -> bool {
        self.error_num == error_num::UNIQUE_CONSTRAINT_VIOLATED
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code {} (errorNum {}): {}",
            self.code, self.error_num, self.message
        )
    }
}

impl std::error::Error for ServerError {}
