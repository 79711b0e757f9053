//! Conditional options
//!
//! One options shape serves every operation. The operation is a type
//! parameter, so each kind keeps its own defaults and only exposes the
//! setters the server understands for it: `if_none_match` exists only on
//! reads, `policy` only on guarded writes, `keep_null` only on patches.

use std::fmt;
use std::marker::PhantomData;

use http::Method;
use serde::{Deserialize, Serialize};

use crate::entity::Revision;

/// How a write behaves when the supplied revision is stale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Refuse the write with a conflict carrying the current revision
    #[default]
    #[serde(rename = "error")]
    Error,
    /// Apply the write regardless of the revision
    #[serde(rename = "last")]
    LastWriteWins,
}

impl Policy {
    /// Returns the wire value of the `policy` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Error => "error",
            Policy::LastWriteWins => "last",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Fetch an entity
    Get,
    /// Fetch only the current revision
    Head,
    /// Create one or more entities
    Post,
    /// Replace an entity
    Put,
    /// Merge into an entity
    Patch,
    /// Remove an entity
    Delete,
}

impl OperationKind {
    /// Returns the HTTP method
    pub fn method(self) -> Method {
        match self {
            OperationKind::Get => Method::GET,
            OperationKind::Head => Method::HEAD,
            OperationKind::Post => Method::POST,
            OperationKind::Put => Method::PUT,
            OperationKind::Patch => Method::PATCH,
            OperationKind::Delete => Method::DELETE,
        }
    }

    /// Returns the operation name used in logs
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Get => "get",
            OperationKind::Head => "head",
            OperationKind::Post => "post",
            OperationKind::Put => "put",
            OperationKind::Patch => "patch",
            OperationKind::Delete => "delete",
        }
    }

    /// Accepts `If-Match` and `rev`
    pub fn is_revisable(self) -> bool {
        !matches!(self, OperationKind::Post)
    }

    /// Accepts `If-None-Match`
    pub fn is_read(self) -> bool {
        matches!(self, OperationKind::Get | OperationKind::Head)
    }

    /// Carries `policy`
    pub fn is_guarded(self) -> bool {
        matches!(
            self,
            OperationKind::Put | OperationKind::Patch | OperationKind::Delete
        )
    }

    /// Carries `waitForSync`
    pub fn is_write(self) -> bool {
        !self.is_read()
    }

    /// Carries `keepNull` and `mergeObjects`
    pub fn is_merge(self) -> bool {
        matches!(self, OperationKind::Patch)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level operation marker
pub trait Operation: sealed::Sealed {
    /// The operation this marker stands for
    const KIND: OperationKind;
}

/// Operations accepting `If-Match` and `rev`
pub trait Revisable: Operation {}

/// Operations accepting `If-None-Match`
pub trait Read: Revisable {}

/// Operations carrying `waitForSync`
pub trait Write: Operation {}

/// Operations carrying a conflict `policy`
pub trait Guarded: Write + Revisable {}

macro_rules! operation {
    ($(#[$doc:meta])* $name:ident => $kind:ident: $($cap:ident),*) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl Operation for $name {
            const KIND: OperationKind = OperationKind::$kind;
        }

        $(impl $cap for $name {})*
    };
}

operation!(/// GET marker
    GetOp => Get: Revisable, Read);
operation!(/// HEAD marker
    HeadOp => Head: Revisable, Read);
operation!(/// POST marker
    PostOp => Post: Write);
operation!(/// PUT marker
    PutOp => Put: Revisable, Write, Guarded);
operation!(/// PATCH marker
    PatchOp => Patch: Revisable, Write, Guarded);
operation!(/// DELETE marker
    DeleteOp => Delete: Revisable, Write, Guarded);

/// Options for a get
pub type GetOptions = Options<GetOp>;
/// Options for a head
pub type HeadOptions = Options<HeadOp>;
/// Options for a create
pub type PostOptions = Options<PostOp>;
/// Options for a replace
pub type PutOptions = Options<PutOp>;
/// Options for a partial update
pub type PatchOptions = Options<PatchOp>;
/// Options for a removal
pub type DeleteOptions = Options<DeleteOp>;

/// Preconditions and flags attached to one request.
///
/// `Options::default()` yields the server defaults for the operation:
/// `policy=error`, `waitForSync=false`, and for patches `keepNull=true`,
/// `mergeObjects=true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options<K: Operation> {
    if_match: Option<Revision>,
    if_none_match: Option<Revision>,
    rev: Option<Revision>,
    policy: Policy,
    wait_for_sync: bool,
    keep_null: bool,
    merge_objects: bool,
    create_collection: bool,
    return_old: bool,
    return_new: bool,
    kind: PhantomData<K>,
}

impl<K: Operation> Default for Options<K> {
    fn default() -> Self {
        Self {
            if_match: None,
            if_none_match: None,
            rev: None,
            policy: Policy::Error,
            wait_for_sync: false,
            keep_null: true,
            merge_objects: true,
            create_collection: false,
            return_old: false,
            return_new: false,
            kind: PhantomData,
        }
    }
}

impl<K: Operation> Options<K> {
    /// Options with the server defaults for this operation
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the operation these options belong to
    pub fn kind(&self) -> OperationKind {
        K::KIND
    }

    /// Returns the `If-Match` revision
    pub fn if_match_rev(&self) -> Option<&Revision> {
        self.if_match.as_ref()
    }

    /// Returns the `If-None-Match` revision
    pub fn if_none_match_rev(&self) -> Option<&Revision> {
        self.if_none_match.as_ref()
    }

    /// Returns the `rev` query revision
    pub fn rev(&self) -> Option<&Revision> {
        self.rev.as_ref()
    }

    /// Returns the conflict policy
    pub fn conflict_policy(&self) -> Policy {
        self.policy
    }

    /// Returns whether the write waits for disk sync
    pub fn waits_for_sync(&self) -> bool {
        self.wait_for_sync
    }

    /// Returns whether null attributes survive a patch
    pub fn keeps_null(&self) -> bool {
        self.keep_null
    }

    /// Returns whether nested objects are deep-merged by a patch
    pub fn merges_objects(&self) -> bool {
        self.merge_objects
    }

    /// Returns whether a missing collection is created on post
    pub fn creates_collection(&self) -> bool {
        self.create_collection
    }

    /// Returns whether the pre-write state is requested back
    pub fn returns_old(&self) -> bool {
        self.return_old
    }

    /// Returns whether the post-write state is requested back
    pub fn returns_new(&self) -> bool {
        self.return_new
    }

    /// Ask the server for the previous and/or resulting entity states
    pub(crate) fn with_returns(mut self, old: bool, new: bool) -> Self {
        self.return_old = old;
        self.return_new = new;
        self
    }
}

impl<K: Revisable> Options<K> {
    /// Proceed only if the current revision equals `rev` (`If-Match`)
    pub fn if_match(mut self, rev: impl Into<Revision>) -> Self {
        self.if_match = Some(rev.into());
        self
    }

    /// Proceed only if the current revision equals `rev` (`rev` query parameter)
    pub fn with_rev(mut self, rev: impl Into<Revision>) -> Self {
        self.rev = Some(rev.into());
        self
    }
}

impl<K: Read> Options<K> {
    /// Skip the body when the current revision equals `rev` (`If-None-Match`)
    pub fn if_none_match(mut self, rev: impl Into<Revision>) -> Self {
        self.if_none_match = Some(rev.into());
        self
    }
}

impl<K: Write> Options<K> {
    /// Wait until the write is synced to disk
    pub fn wait_for_sync(mut self, wait: bool) -> Self {
        self.wait_for_sync = wait;
        self
    }
}

impl<K: Guarded> Options<K> {
    /// Set the conflict policy
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }
}

impl Options<PatchOp> {
    /// When false, null attributes in the payload remove the stored attribute
    pub fn keep_null(mut self, keep: bool) -> Self {
        self.keep_null = keep;
        self
    }

    /// When false, nested objects in the payload replace stored ones wholesale
    pub fn merge_objects(mut self, merge: bool) -> Self {
        self.merge_objects = merge;
        self
    }
}

impl Options<PostOp> {
    /// Create the target collection if it does not exist
    pub fn create_collection(mut self, create: bool) -> Self {
        self.create_collection = create;
        self
    }
}
