//! Collection listing

use std::fmt;

use http::Method;
use serde::{Deserialize, Serialize};

use super::entity::{EntityEndpoint, Flavor};
use crate::errors::ClientResult;
use crate::transport::HttpRequest;

/// Form in which listed entities are returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Full API paths, e.g. `/_db/_system/_api/document/users/1`
    #[default]
    Path,
    /// Ids, e.g. `users/1`
    Id,
    /// Bare keys, e.g. `1`
    Key,
}

impl ListType {
    /// Returns the wire value of the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Path => "path",
            ListType::Id => "id",
            ListType::Key => "key",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    documents: Vec<String>,
}

impl<F: Flavor> EntityEndpoint<F> {
    /// List every entity of `collection` in the requested form.
    ///
    /// Fails with a 404 server error if the collection does not exist.
    pub fn list(&self, collection: &str, list_type: ListType) -> ClientResult<Vec<String>> {
        let request = HttpRequest::new(Method::GET, self.base())
            .with_query("collection", collection)
            .with_query("type", list_type.as_str());
        let listing: Listing = self.send_for_body(request)?.json()?;
        Ok(listing.documents)
    }
}
