//! Pull-based cursor over a paged result

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::state::{CursorPage, CursorState};
use crate::errors::{Classified, ClientError, ClientResult};
use crate::transport::{self, HttpRequest, Transport};

/// Result of one [`Cursor::next`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The target was populated with the next item
    Item,
    /// A continuation fetch returned no items although the server still
    /// reports more; the target was not touched
    Empty,
}

/// Forward-only view over a query result.
///
/// Owned by one consumer; `next` and `close` take `&mut self`.
/// Dropping a cursor does not release the server-side cursor: call
/// [`Cursor::close`] when abandoning a result early.
pub struct Cursor {
    transport: Arc<dyn Transport>,
    base: String,
    state: CursorState,
    count: Option<u64>,
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("base", &self.base)
            .field("state", &self.state)
            .field("count", &self.count)
            .finish()
    }
}

impl Cursor {
    /// Send a cursor-creating request and wrap its first page.
    ///
    /// `api` is the database's `/_db/{name}/_api` prefix.
    pub(crate) fn open(
        transport: Arc<dyn Transport>,
        api: &str,
        request: HttpRequest,
    ) -> ClientResult<Self> {
        let page: CursorPage = body(transport::send(transport.as_ref(), request)?)?;
        let count = page.count;
        let state = CursorState::from_page(page);

        debug!(
            remote_id = state.remote_id().unwrap_or(""),
            buffered = state.buffered(),
            "ARANGO_CURSOR_OPEN"
        );

        Ok(Self {
            transport,
            base: format!("{}/cursor", api),
            state,
            count,
        })
    }

    /// True while local items remain or the server reported more.
    ///
    /// A true result does not promise the next `next` yields an item, only
    /// that the cursor is not permanently exhausted.
    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// Total number of results, when the query asked for it
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Server cursor id, if the result spans several batches
    pub fn remote_id(&self) -> Option<&str> {
        self.state.remote_id()
    }

    /// Current state
    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Decode the next item into `target`.
    ///
    /// Fetches a continuation batch when the local one is drained and the
    /// server holds more. Fails with [`ClientError::EndOfCursor`] once
    /// nothing is left locally or remotely.
    pub fn next<T: DeserializeOwned>(&mut self, target: &mut T) -> ClientResult<Advance> {
        match self.advance()? {
            Some(item) => {
                *target = serde_json::from_value(item).map_err(ClientError::Decode)?;
                Ok(Advance::Item)
            }
            None => Ok(Advance::Empty),
        }
    }

    /// Iterate the remaining items as `T`, skipping empty continuations
    pub fn items<T: DeserializeOwned>(&mut self) -> Items<'_, T> {
        Items {
            cursor: self,
            done: false,
            item: PhantomData,
        }
    }

    /// Release the server-side cursor.
    ///
    /// No-op for materialized or already released cursors. A 404 means the
    /// server dropped it already and counts as released.
    pub fn close(&mut self) -> ClientResult<()> {
        let id = match self.state.releasable_id() {
            Some(id) => id.to_string(),
            None => return Ok(()),
        };

        let request = HttpRequest::new(Method::DELETE, format!("{}/{}", self.base, id));
        match transport::send(self.transport.as_ref(), request) {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        debug!(remote_id = %id, "ARANGO_CURSOR_CLOSE");
        self.state.mark_released();
        Ok(())
    }

    /// Pop one raw item, fetching a continuation batch if needed.
    ///
    /// `Ok(None)` is the empty-continuation case.
    fn advance(&mut self) -> ClientResult<Option<Value>> {
        if let Some(item) = self.state.pop() {
            return Ok(Some(item));
        }

        if !self.state.needs_fetch() {
            return Err(ClientError::EndOfCursor);
        }

        self.fetch()?;

        match self.state.pop() {
            Some(item) => Ok(Some(item)),
            None if self.state.has_more() => Ok(None),
            None => Err(ClientError::EndOfCursor),
        }
    }

    fn fetch(&mut self) -> ClientResult<()> {
        let id = match self.state.remote_id() {
            Some(id) => id.to_string(),
            None => return Err(ClientError::EndOfCursor),
        };

        let request = HttpRequest::new(Method::PUT, format!("{}/{}", self.base, id));
        let page: CursorPage = body(transport::send(self.transport.as_ref(), request)?)?;

        debug!(
            remote_id = %id,
            items = page.result.len(),
            has_more = page.has_more,
            "ARANGO_CURSOR_FETCH"
        );

        self.state.refill(page);
        Ok(())
    }
}

fn body(classified: Classified) -> ClientResult<CursorPage> {
    match classified.into_response() {
        Some(response) => response.json(),
        None => Ok(CursorPage::default()),
    }
}

/// Iterator returned by [`Cursor::items`].
///
/// Ends at [`ClientError::EndOfCursor`]; any other error is yielded once
/// and ends the iteration.
pub struct Items<'a, T> {
    cursor: &'a mut Cursor,
    done: bool,
    item: PhantomData<T>,
}

impl<T: DeserializeOwned> Iterator for Items<'_, T> {
    type Item = ClientResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.cursor.advance() {
                Ok(Some(item)) => {
                    return Some(serde_json::from_value(item).map_err(ClientError::Decode));
                }
                Ok(None) => continue,
                Err(ClientError::EndOfCursor) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
