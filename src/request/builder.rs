//! Options to wire mapping
//!
//! Pure functions: no I/O, no handle validation. Whatever handle text the
//! caller supplies is appended to the path verbatim.

use http::header::{IF_MATCH, IF_NONE_MATCH};

use super::options::{Operation, Options, PostOptions};
use crate::transport::HttpRequest;

/// Build the request for `options` against an already resolved `path`.
///
/// Headers: `If-Match`, `If-None-Match` carrying the raw revision.
/// Query: `rev` when set, `policy` on guarded writes, `waitForSync` on every
/// write, `keepNull`/`mergeObjects` on patches, and the return and
/// create flags only when enabled.
pub fn build<K: Operation>(path: impl Into<String>, options: &Options<K>) -> HttpRequest {
    let kind = options.kind();
    let mut request = HttpRequest::new(kind.method(), path);

    if let Some(rev) = options.if_match_rev() {
        request = request.with_header(IF_MATCH, rev.as_str());
    }
    if let Some(rev) = options.if_none_match_rev() {
        request = request.with_header(IF_NONE_MATCH, rev.as_str());
    }

    if let Some(rev) = options.rev() {
        request = request.with_query("rev", rev.as_str());
    }
    if kind.is_guarded() {
        request = request.with_query("policy", options.conflict_policy().as_str());
    }
    if kind.is_write() {
        request = request.with_query("waitForSync", flag(options.waits_for_sync()));
    }
    if kind.is_merge() {
        request = request
            .with_query("keepNull", flag(options.keeps_null()))
            .with_query("mergeObjects", flag(options.merges_objects()));
    }
    if options.returns_old() {
        request = request.with_query("returnOld", "true");
    }
    if options.returns_new() {
        request = request.with_query("returnNew", "true");
    }
    if options.creates_collection() {
        request = request.with_query("createCollection", "true");
    }

    request
}

/// Request addressing one entity: `{base}/{handle}`
pub fn conditional<K: Operation>(base: &str, handle: &str, options: &Options<K>) -> HttpRequest {
    build(format!("{}/{}", base, handle), options)
}

/// Create request: `{base}?collection={collection}`
pub fn create(base: &str, collection: &str, options: &PostOptions) -> HttpRequest {
    build(base, options).with_query("collection", collection)
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
