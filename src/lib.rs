//! arango-client - HTTP client layer for a document database
//!
//! Versioned document and edge operations with optimistic concurrency,
//! and pull-based cursors over paged query results.

pub mod cli;
pub mod connection;
pub mod cursor;
pub mod endpoint;
pub mod entity;
pub mod errors;
pub mod request;
pub mod transport;

pub use connection::{ConnectionConfig, Database};
pub use cursor::{Advance, AqlQuery, ByExampleOptions, Cursor};
pub use endpoint::{BatchOutcome, DocumentEndpoint, EdgeEndpoint, ListType, ReadOutcome};
pub use entity::{Connects, Document, Edge, Handle, Identity, Revision, Versioned};
pub use errors::{ClientError, ClientResult, ServerError};
pub use request::{DeleteOptions, GetOptions, HeadOptions, PatchOptions, Policy, PostOptions, PutOptions};
