//! Cursor state machine
//!
//! ```text
//! Materialized { batch }             -- whole result arrived at once
//! Remote { id, batch, more, released }
//!     batch empty, more, !released   -> continuation fetch replaces batch
//!     close                          -> released, more = false
//! ```
//! Exhausted: batch empty and (Materialized, or Remote with `more == false`).

use std::collections::VecDeque;

use serde::Deserialize;
use serde_json::Value;

/// One page of a cursor response as sent by the server
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CursorPage {
    #[serde(default)]
    pub(crate) result: Vec<Value>,

    #[serde(rename = "hasMore", default)]
    pub(crate) has_more: bool,

    #[serde(default)]
    pub(crate) count: Option<u64>,

    #[serde(default)]
    pub(crate) id: Option<String>,
}

/// Where a cursor's remaining items live
#[derive(Debug, Clone, PartialEq)]
pub enum CursorState {
    /// Every item is in the local batch
    Materialized {
        /// Items not yet consumed
        batch: VecDeque<Value>,
    },
    /// More items may be fetched from a server-side cursor
    Remote {
        /// Server cursor id
        id: String,
        /// Items not yet consumed
        batch: VecDeque<Value>,
        /// Server's last more-flag
        more: bool,
        /// Server-side resources have been released
        released: bool,
    },
}

impl CursorState {
    /// State for the first page of a result
    pub(crate) fn from_page(page: CursorPage) -> Self {
        let batch = VecDeque::from(page.result);
        match page.id.filter(|id| !id.is_empty()) {
            Some(id) => CursorState::Remote {
                id,
                batch,
                more: page.has_more,
                released: false,
            },
            None => CursorState::Materialized { batch },
        }
    }

    /// Take the next local item
    pub(crate) fn pop(&mut self) -> Option<Value> {
        self.batch_mut().pop_front()
    }

    /// Number of items held locally
    pub fn buffered(&self) -> usize {
        match self {
            CursorState::Materialized { batch } | CursorState::Remote { batch, .. } => batch.len(),
        }
    }

    /// Local items remain or the server reported more
    pub fn has_more(&self) -> bool {
        match self {
            CursorState::Materialized { batch } => !batch.is_empty(),
            CursorState::Remote { batch, more, .. } => !batch.is_empty() || *more,
        }
    }

    /// Local batch drained while the server still holds items
    pub(crate) fn needs_fetch(&self) -> bool {
        match self {
            CursorState::Materialized { .. } => false,
            CursorState::Remote {
                batch,
                more,
                released,
                ..
            } => batch.is_empty() && *more && !*released,
        }
    }

    /// Server cursor id, for remote cursors
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            CursorState::Materialized { .. } => None,
            CursorState::Remote { id, .. } => Some(id.as_str()),
        }
    }

    /// Server cursor id, unless already released
    pub(crate) fn releasable_id(&self) -> Option<&str> {
        match self {
            CursorState::Remote {
                id,
                released: false,
                ..
            } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Replace the local batch with a continuation page
    pub(crate) fn refill(&mut self, page: CursorPage) {
        if let CursorState::Remote { batch, more, .. } = self {
            *batch = VecDeque::from(page.result);
            *more = page.has_more;
        }
    }

    /// Record that the server cursor is gone
    pub(crate) fn mark_released(&mut self) {
        if let CursorState::Remote { more, released, .. } = self {
            *more = false;
            *released = true;
        }
    }

    fn batch_mut(&mut self) -> &mut VecDeque<Value> {
        match self {
            CursorState::Materialized { batch } | CursorState::Remote { batch, .. } => batch,
        }
    }
}
