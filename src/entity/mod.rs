//! Entity identity model
//!
//! Documents and edges are plain caller structs that compose capabilities:
//!
//! - [`Versioned`]: carries `_id`, `_key`, `_rev` (embed an [`Identity`])
//! - [`Connects`]: additionally carries `_from`, `_to` (embed [`Endpoints`])
//!
//! [`Document`] and [`Edge`] are ready-made wrappers for callers that do not
//! want to implement the traits themselves.

mod document;
mod edge;
mod handle;
mod identity;

pub use document::{Document, RawDocument};
pub use edge::{Connects, Edge, Endpoints};
pub use handle::Handle;
pub use identity::{Identity, Revision, Versioned};
