//! Response classification
//!
//! Pure mapping from an HTTP exchange outcome to success or a typed error.
//! No I/O, no retries, no side effects.

use http::header::ETAG;
use http::{HeaderMap, StatusCode};
use tracing::warn;

use super::{ClientError, ClientResult, ConflictError, ConflictReason, ServerError};
use crate::entity::Revision;
use crate::transport::HttpResponse;

/// A response the server considered successful
#[derive(Debug)]
pub enum Classified {
    /// 2xx with its (possibly empty) body
    Success(HttpResponse),
    /// 304 on a conditional read: nothing to materialize
    NotModified {
        /// Revision from the `ETag` header, when present
        revision: Option<Revision>,
    },
}

impl Classified {
    /// Returns the response for a 2xx, `None` for 304
    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            Classified::Success(response) => Some(response),
            Classified::NotModified { .. } => None,
        }
    }
}

/// Classify a received response.
///
/// - 2xx: success with body
/// - 304: success with no body
/// - 409/412: `Conflict`, carrying the current revision from the body's
///   `_rev` field or, failing that, the `ETag` header
/// - anything else: `Server`, built from the JSON error body when it parses,
///   otherwise synthesized from the status line
pub fn classify(response: HttpResponse) -> ClientResult<Classified> {
    let status = response.status;

    if status == StatusCode::NOT_MODIFIED {
        return Ok(Classified::NotModified {
            revision: revision_from_etag(&response.headers),
        });
    }

    if status.is_success() {
        return Ok(Classified::Success(response));
    }

    let server = parse_error_body(status, &response.body);

    let reason = match status {
        StatusCode::PRECONDITION_FAILED => Some(ConflictReason::PreconditionFailed),
        StatusCode::CONFLICT => Some(ConflictReason::Conflict),
        _ => None,
    };

    match reason {
        Some(reason) => {
            let current = server
                .rev()
                .filter(|rev| !rev.is_empty())
                .map(Revision::from)
                .or_else(|| revision_from_etag(&response.headers));

            warn!(
                code = server.code(),
                error_num = server.error_num(),
                current_rev = current.as_ref().map(Revision::as_str).unwrap_or(""),
                "ARANGO_CONFLICT"
            );

            Err(ClientError::Conflict(ConflictError::new(
                reason, current, server,
            )))
        }
        None => {
            warn!(
                code = server.code(),
                error_num = server.error_num(),
                message = server.message(),
                "ARANGO_SERVER_ERROR"
            );
            Err(ClientError::Server(server))
        }
    }
}

/// Extract a revision from an `ETag` header, stripping quotes and the weak prefix
pub fn revision_from_etag(headers: &HeaderMap) -> Option<Revision> {
    let raw = headers.get(ETAG)?.to_str().ok()?;
    let raw = raw.strip_prefix("W/").unwrap_or(raw);
    let trimmed = raw.trim_matches('"');
    if trimmed.is_empty() {
        None
    } else {
        Some(Revision::from(trimmed))
    }
}

fn parse_error_body(status: StatusCode, body: &[u8]) -> ServerError {
    if body.is_empty() {
        return ServerError::from_status(status);
    }
    match serde_json::from_slice::<ServerError>(body) {
        Ok(server) => server.normalize(status),
        Err(_) => ServerError::from_status(status),
    }
}
