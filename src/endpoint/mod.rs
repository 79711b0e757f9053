//! Document/Edge Operations
//!
//! Single- and multi-entity CRUD built on the request builder and the
//! error classifier. Every call is one synchronous round trip; nothing is
//! retried and no state is shared between calls, so one endpoint may be
//! used from several threads at once.
//!
//! Revision handling:
//! - Get: `If-None-Match` hit leaves the receiver untouched (304)
//! - Put/Patch: the caller's entity gets the new revision
//! - Stale `If-Match` with `policy=error`: `Conflict` carrying the current revision
//! - Stale `If-Match` with `policy=last`: the write proceeds

mod batch;
mod entity;
mod listing;

pub use batch::BatchOutcome;
pub use entity::{
    DocumentEndpoint, Documents, EdgeEndpoint, Edges, EntityEndpoint, Flavor, ReadOutcome,
};
pub use listing::ListType;
