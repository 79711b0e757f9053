//! Multi-entity create and delete
//!
//! Both forms send one JSON array to `document/{collection}` and get back
//! one result per position. The request as a whole either fails (and the
//! error is returned) or succeeds with per-item outcomes recorded in a
//! [`BatchOutcome`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::entity::{fill, EntityEndpoint, Flavor, WriteResult};
use crate::entity::Versioned;
use crate::errors::{ClientError, ClientResult, ServerError};
use crate::request::{self, DeleteOptions, PostOptions};

/// Per-item results of a batch request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    total: usize,
    failures: Vec<(usize, ServerError)>,
}

impl BatchOutcome {
    /// Number of items sent
    pub fn total(&self) -> usize {
        self.total
    }

    /// Items the server rejected, by input position
    pub fn failures(&self) -> &[(usize, ServerError)] {
        &self.failures
    }

    /// Number of items the server accepted
    pub fn succeeded(&self) -> usize {
        self.total - self.failures.len()
    }

    /// True when every item was accepted
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failure for the item at `index`, if it failed
    pub fn failure(&self, index: usize) -> Option<&ServerError> {
        self.failures
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, e)| e)
    }
}

/// One position of a batch response
enum ItemResult {
    Written(WriteResult),
    Failed(ServerError),
}

fn parse_items(results: Vec<Value>) -> ClientResult<Vec<ItemResult>> {
    results
        .into_iter()
        .map(|item| {
            let failed = item.get("error").and_then(Value::as_bool).unwrap_or(false);
            if failed {
                let error: ServerError =
                    serde_json::from_value(item).map_err(ClientError::Decode)?;
                Ok(ItemResult::Failed(error.normalize_item()))
            } else {
                let written: WriteResult =
                    serde_json::from_value(item).map_err(ClientError::Decode)?;
                Ok(ItemResult::Written(written))
            }
        })
        .collect()
}

impl<F: Flavor> EntityEndpoint<F> {
    fn batch_path(&self, collection: &str) -> String {
        format!("{}/document/{}", self.api(), collection)
    }

    /// Create every entity in `items` with a single request.
    ///
    /// Accepted items get their server-assigned identity written in place;
    /// rejected items are left unchanged and reported in the outcome.
    pub fn post_many<E: Serialize + Versioned>(
        &self,
        items: &mut [E],
        collection: &str,
        options: &PostOptions,
    ) -> ClientResult<BatchOutcome> {
        let request = request::build(self.batch_path(collection), options).with_json(&*items)?;
        let results: Vec<Value> = self.send_for_body(request)?.json()?;

        let mut outcome = BatchOutcome {
            total: items.len(),
            failures: Vec::new(),
        };

        for (index, result) in parse_items(results)?.into_iter().enumerate() {
            match result {
                ItemResult::Written(written) => {
                    if let Some(item) = items.get_mut(index) {
                        item.identity_mut().assign(written.identity);
                    }
                }
                ItemResult::Failed(error) => outcome.failures.push((index, error)),
            }
        }

        if !outcome.is_complete() {
            warn!(
                collection,
                failed = outcome.failures.len(),
                total = outcome.total,
                "ARANGO_BATCH_PARTIAL"
            );
        }
        Ok(outcome)
    }

    /// Delete every handle in `handles` with a single request.
    ///
    /// When `receivers` is non-empty the server is asked for the deleted
    /// states; the receiver at each position is written only if the server
    /// returned a state for that position.
    pub fn delete_many<H: AsRef<str>, O: DeserializeOwned>(
        &self,
        collection: &str,
        handles: &[H],
        receivers: &mut [O],
        options: &DeleteOptions,
    ) -> ClientResult<BatchOutcome> {
        let options = options.clone().with_returns(!receivers.is_empty(), false);
        let selectors: Vec<&str> = handles.iter().map(AsRef::as_ref).collect();
        let request =
            request::build(self.batch_path(collection), &options).with_json(&selectors)?;
        let results: Vec<Value> = self.send_for_body(request)?.json()?;

        let mut outcome = BatchOutcome {
            total: handles.len(),
            failures: Vec::new(),
        };

        for (index, result) in parse_items(results)?.into_iter().enumerate() {
            match result {
                ItemResult::Written(written) => fill(receivers.get_mut(index), written.old)?,
                ItemResult::Failed(error) => outcome.failures.push((index, error)),
            }
        }

        if !outcome.is_complete() {
            warn!(
                collection,
                failed = outcome.failures.len(),
                total = outcome.total,
                "ARANGO_BATCH_PARTIAL"
            );
        }
        Ok(outcome)
    }
}
