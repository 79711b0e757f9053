//! Conditional Request Builder
//!
//! Maps a logical operation and its options to headers and query
//! parameters. Options are a single generic shape, [`Options<K>`],
//! parameterized by an operation marker so per-kind defaults survive
//! without one struct per operation.

mod builder;
mod options;

pub use builder::{build, conditional, create};
pub use options::{
    DeleteOp, DeleteOptions, GetOp, GetOptions, Guarded, HeadOp, HeadOptions, Operation,
    OperationKind, Options, PatchOp, PatchOptions, Policy, PostOp, PostOptions, PutOp,
    PutOptions, Read, Revisable, Write,
};
