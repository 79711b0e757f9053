//! Cursor Protocol
//!
//! Forward-only, pull-based iteration over paged query results:
//! - Open: the creating request returns the first batch, a more-flag, the
//!   total count and, for multi-batch results, a server cursor id
//! - Next: pop locally; on an empty batch issue `PUT cursor/{id}`
//! - Close: `DELETE cursor/{id}` if one was assigned, idempotent
//!
//! A cursor is exclusively owned by one consumer.

#[allow(clippy::module_inception)]
mod cursor;
mod query;
mod state;

pub use cursor::{Advance, Cursor, Items};
pub use query::{AqlQuery, ByExampleOptions};
pub(crate) use query::ByExampleBody;
pub use state::CursorState;
