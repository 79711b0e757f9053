//! Single-entity operations
//!
//! Documents and edges share one endpoint type parameterized by a
//! [`Flavor`]; only creation differs (edges carry `from`/`to`).

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::entity::{Connects, Identity, Revision, Versioned};
use crate::errors::{revision_from_etag, Classified, ClientError, ClientResult, ServerError};
use crate::request::{
    self, DeleteOptions, GetOptions, HeadOptions, PatchOptions, PostOptions, PutOptions,
};
use crate::transport::{self, HttpRequest, HttpResponse, Transport};

mod sealed {
    pub trait Sealed {}
}

/// Kind of entity an endpoint serves
pub trait Flavor: sealed::Sealed {
    /// Path segment below `/_api`
    const PATH: &'static str;
}

/// Plain documents, served under `/_api/document`
#[derive(Debug, Clone, Copy)]
pub struct Documents;

/// Graph edges, served under `/_api/edge`
#[derive(Debug, Clone, Copy)]
pub struct Edges;

impl sealed::Sealed for Documents {}
impl sealed::Sealed for Edges {}

impl Flavor for Documents {
    const PATH: &'static str = "document";
}

impl Flavor for Edges {
    const PATH: &'static str = "edge";
}

/// Endpoint for documents
pub type DocumentEndpoint = EntityEndpoint<Documents>;
/// Endpoint for edges
pub type EdgeEndpoint = EntityEndpoint<Edges>;

/// Outcome of a successful get
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The receiver was populated from the response body
    Fetched,
    /// `If-None-Match` held; the receiver was left untouched
    NotModified,
}

impl ReadOutcome {
    /// True when the receiver was written
    pub fn is_fetched(&self) -> bool {
        matches!(self, ReadOutcome::Fetched)
    }
}

/// Server answer to a single write: new identity plus optional states
#[derive(Debug, Deserialize)]
pub(crate) struct WriteResult {
    #[serde(flatten)]
    pub(crate) identity: Identity,

    #[serde(default)]
    pub(crate) old: Option<Value>,

    #[serde(default)]
    pub(crate) new: Option<Value>,
}

/// Decode a returned state into a receiver, if both are present
pub(crate) fn fill<T: DeserializeOwned>(
    receiver: Option<&mut T>,
    state: Option<Value>,
) -> ClientResult<()> {
    if let (Some(receiver), Some(state)) = (receiver, state) {
        *receiver = serde_json::from_value(state).map_err(ClientError::Decode)?;
    }
    Ok(())
}

/// CRUD over one entity kind in one database
pub struct EntityEndpoint<F: Flavor> {
    transport: Arc<dyn Transport>,
    api: String,
    base: String,
    flavor: PhantomData<F>,
}

impl<F: Flavor> Clone for EntityEndpoint<F> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            api: self.api.clone(),
            base: self.base.clone(),
            flavor: PhantomData,
        }
    }
}

impl<F: Flavor> fmt::Debug for EntityEndpoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityEndpoint")
            .field("base", &self.base)
            .finish()
    }
}

impl<F: Flavor> EntityEndpoint<F> {
    /// Endpoint below `api`, the database's `/_db/{name}/_api` prefix
    pub fn new(transport: Arc<dyn Transport>, api: impl Into<String>) -> Self {
        let api = api.into();
        let base = format!("{}/{}", api, F::PATH);
        Self {
            transport,
            api,
            base,
            flavor: PhantomData,
        }
    }

    /// Returns the path every single-entity request is built on
    pub fn base(&self) -> &str {
        &self.base
    }

    pub(crate) fn api(&self) -> &str {
        &self.api
    }

    pub(crate) fn send(&self, request: HttpRequest) -> ClientResult<Classified> {
        debug!(method = %request.method, path = %request.path, "ARANGO_ENTITY_OP");
        transport::send(self.transport.as_ref(), request)
    }

    /// Send and require a body-bearing success
    pub(crate) fn send_for_body(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        match self.send(request)? {
            Classified::Success(response) => Ok(response),
            Classified::NotModified { .. } => Err(ClientError::Server(ServerError::new(
                304,
                304,
                "unexpected Not Modified for an unconditional request",
            ))),
        }
    }

    /// Fetch an entity into `receiver`.
    ///
    /// When `If-None-Match` holds the server answers 304 and `receiver` is
    /// not touched; check the returned [`ReadOutcome`] rather than assuming
    /// the receiver was populated.
    pub fn get<T: DeserializeOwned>(
        &self,
        handle: impl AsRef<str>,
        receiver: &mut T,
        options: &GetOptions,
    ) -> ClientResult<ReadOutcome> {
        let request = request::conditional(&self.base, handle.as_ref(), options);
        match self.send(request)? {
            Classified::Success(response) => {
                *receiver = response.json()?;
                Ok(ReadOutcome::Fetched)
            }
            Classified::NotModified { .. } => Ok(ReadOutcome::NotModified),
        }
    }

    /// Fetch only the current revision, read from the `ETag` header.
    ///
    /// A 304 is a success; if it carries no `ETag` the revision sent in
    /// `If-None-Match` is by definition current.
    pub fn head(&self, handle: impl AsRef<str>, options: &HeadOptions) -> ClientResult<Revision> {
        let request = request::conditional(&self.base, handle.as_ref(), options);
        let (status, revision) = match self.send(request)? {
            Classified::Success(response) => {
                (response.status.as_u16(), revision_from_etag(&response.headers))
            }
            Classified::NotModified { revision } => {
                (304, revision.or_else(|| options.if_none_match_rev().cloned()))
            }
        };
        revision.ok_or_else(|| {
            ClientError::Server(ServerError::new(
                status,
                i64::from(status),
                "response carried no ETag header",
            ))
        })
    }

    /// Replace an entity. On success `entity`'s revision is updated.
    pub fn put<E: Serialize + Versioned>(
        &self,
        handle: impl AsRef<str>,
        entity: &mut E,
        options: &PutOptions,
    ) -> ClientResult<()> {
        let request =
            request::conditional(&self.base, handle.as_ref(), options).with_json(&*entity)?;
        let result: WriteResult = self.send_for_body(request)?.json()?;
        entity.identity_mut().set_rev(result.identity.rev().clone());
        Ok(())
    }

    /// Merge `entity` into the stored one. On success `entity`'s revision
    /// is updated.
    pub fn patch<E: Serialize + Versioned>(
        &self,
        handle: impl AsRef<str>,
        entity: &mut E,
        options: &PatchOptions,
    ) -> ClientResult<()> {
        self.patch_returning::<E, Value>(handle, entity, None, None, options)
    }

    /// Merge `entity` into the stored one, also receiving the states before
    /// and after the update.
    ///
    /// Supplying a receiver asks the server to return that state; each
    /// receiver is written only if the server actually returned it.
    pub fn patch_returning<E: Serialize + Versioned, S: DeserializeOwned>(
        &self,
        handle: impl AsRef<str>,
        entity: &mut E,
        old: Option<&mut S>,
        new: Option<&mut S>,
        options: &PatchOptions,
    ) -> ClientResult<()> {
        let options = options.clone().with_returns(old.is_some(), new.is_some());
        let request =
            request::conditional(&self.base, handle.as_ref(), &options).with_json(&*entity)?;
        let result: WriteResult = self.send_for_body(request)?.json()?;

        entity.identity_mut().set_rev(result.identity.rev().clone());
        fill(old, result.old)?;
        fill(new, result.new)?;
        Ok(())
    }

    /// Remove an entity
    pub fn delete(&self, handle: impl AsRef<str>, options: &DeleteOptions) -> ClientResult<()> {
        let request = request::conditional(&self.base, handle.as_ref(), options);
        self.send_for_body(request)?;
        Ok(())
    }

    /// Remove an entity and receive its last state.
    ///
    /// `old` is written only if the server returned the state.
    pub fn delete_returning<O: DeserializeOwned>(
        &self,
        handle: impl AsRef<str>,
        old: &mut O,
        options: &DeleteOptions,
    ) -> ClientResult<()> {
        let options = options.clone().with_returns(true, false);
        let request = request::conditional(&self.base, handle.as_ref(), &options);
        let result: WriteResult = self.send_for_body(request)?.json()?;
        fill(Some(old), result.old)
    }
}

impl EntityEndpoint<Documents> {
    /// Create a document in `collection`.
    ///
    /// On success the server-assigned id, key and revision are written into
    /// `entity`.
    pub fn post<E: Serialize + Versioned>(
        &self,
        entity: &mut E,
        collection: &str,
        options: &PostOptions,
    ) -> ClientResult<()> {
        let request = request::create(&self.base, collection, options).with_json(&*entity)?;
        let result: WriteResult = self.send_for_body(request)?.json()?;
        entity.identity_mut().assign(result.identity);
        Ok(())
    }
}

impl EntityEndpoint<Edges> {
    /// Create an edge in `collection` between `from` and `to`.
    ///
    /// The server checks that both endpoints exist and answers 404
    /// otherwise. On success the assigned identity and the supplied
    /// endpoints are written into `edge`.
    pub fn post<E: Serialize + Versioned + Connects>(
        &self,
        edge: &mut E,
        collection: &str,
        from: &str,
        to: &str,
        options: &PostOptions,
    ) -> ClientResult<()> {
        let request = request::create(&self.base, collection, options)
            .with_query("from", from)
            .with_query("to", to)
            .with_json(&*edge)?;
        let result: WriteResult = self.send_for_body(request)?.json()?;
        edge.identity_mut().assign(result.identity);
        edge.endpoints_mut().set(from, to);
        Ok(())
    }
}
