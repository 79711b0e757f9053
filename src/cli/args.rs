//! CLI argument definitions using clap
//!
//! Commands:
//! - arangoctl get <handle> --config <path>
//! - arangoctl head <handle> --config <path>
//! - arangoctl delete <handle> --config <path>
//! - arangoctl query <aql> --config <path>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::request::Policy;

/// arangoctl - document database client
#[derive(Parser, Debug)]
#[command(name = "arangoctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Entity kind addressed by a handle
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    /// Plain document
    #[default]
    Document,
    /// Graph edge
    Edge,
}

/// Conflict policy for writes
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyArg {
    /// Refuse stale writes
    #[default]
    Error,
    /// Overwrite regardless of revision
    Last,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Error => Policy::Error,
            PolicyArg::Last => Policy::LastWriteWins,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch an entity
    Get {
        /// Path to configuration file
        #[arg(long, default_value = "./arango.json")]
        config: PathBuf,

        /// Entity handle, `<collection>/<key>`
        handle: String,

        /// Entity kind
        #[arg(long, value_enum, default_value_t = Kind::Document)]
        kind: Kind,

        /// Fail unless the current revision equals this one
        #[arg(long)]
        if_match: Option<String>,

        /// Skip the body if the current revision equals this one
        #[arg(long)]
        if_none_match: Option<String>,
    },

    /// Print an entity's current revision
    Head {
        /// Path to configuration file
        #[arg(long, default_value = "./arango.json")]
        config: PathBuf,

        /// Entity handle, `<collection>/<key>`
        handle: String,

        /// Entity kind
        #[arg(long, value_enum, default_value_t = Kind::Document)]
        kind: Kind,

        /// Skip if the current revision equals this one
        #[arg(long)]
        if_none_match: Option<String>,
    },

    /// Delete an entity
    Delete {
        /// Path to configuration file
        #[arg(long, default_value = "./arango.json")]
        config: PathBuf,

        /// Entity handle, `<collection>/<key>`
        handle: String,

        /// Entity kind
        #[arg(long, value_enum, default_value_t = Kind::Document)]
        kind: Kind,

        /// Fail unless the current revision equals this one
        #[arg(long)]
        if_match: Option<String>,

        /// Conflict policy
        #[arg(long, value_enum, default_value_t = PolicyArg::Error)]
        policy: PolicyArg,

        /// Wait for the removal to reach disk
        #[arg(long)]
        wait_for_sync: bool,
    },

    /// Run a query and print every result item
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./arango.json")]
        config: PathBuf,

        /// Query text
        query: String,

        /// Bind parameter as `name=<json>`; repeatable
        #[arg(long = "bind", value_name = "NAME=JSON")]
        binds: Vec<String>,

        /// Items per batch
        #[arg(long)]
        batch_size: Option<u32>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
