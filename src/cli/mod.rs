//! CLI module for arangoctl
//!
//! Provides command-line access to:
//! - get: Fetch an entity, optionally conditional
//! - head: Print an entity's current revision
//! - delete: Remove an entity under a conflict policy
//! - query: Run a query and stream its results

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Kind, PolicyArg};
pub use commands::{build_query, delete, get, head, query, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_error_to, write_response, write_response_to};
