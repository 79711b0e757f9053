//! CLI command implementations
//!
//! Each command loads the configuration, connects, performs exactly one
//! client call (or drains one cursor) and prints JSON to stdout. Nothing is
//! retried; any failure is reported once and ends the command.

use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::connection::{ConnectionConfig, Database};
use crate::cursor::{AqlQuery, Cursor};
use crate::endpoint::{EntityEndpoint, Flavor, ReadOutcome};
use crate::request::{DeleteOptions, GetOptions, HeadOptions};

use super::args::{Cli, Command, Kind, PolicyArg};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parse arguments, run the command, report failures on stdout
pub fn run() -> CliResult<()> {
    init_logging();
    let cli = Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Install the stderr log subscriber, filtered by `RUST_LOG`
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Get {
            config,
            handle,
            kind,
            if_match,
            if_none_match,
        } => {
            let db = connect(&config)?;
            let mut options = GetOptions::new();
            if let Some(rev) = if_match {
                options = options.if_match(rev);
            }
            if let Some(rev) = if_none_match {
                options = options.if_none_match(rev);
            }
            write_response(get(&db, kind, &handle, &options)?)
        }
        Command::Head {
            config,
            handle,
            kind,
            if_none_match,
        } => {
            let db = connect(&config)?;
            let mut options = HeadOptions::new();
            if let Some(rev) = if_none_match {
                options = options.if_none_match(rev);
            }
            write_response(head(&db, kind, &handle, &options)?)
        }
        Command::Delete {
            config,
            handle,
            kind,
            if_match,
            policy,
            wait_for_sync,
        } => {
            let db = connect(&config)?;
            let options = delete_options(if_match, policy, wait_for_sync);
            write_response(delete(&db, kind, &handle, &options)?)
        }
        Command::Query {
            config,
            query: text,
            binds,
            batch_size,
        } => {
            let db = connect(&config)?;
            let aql = build_query(text, &binds, batch_size)?;
            let emitted = query(&db, &aql, write_response)?;
            info!(items = emitted, "ARANGO_CLI_QUERY_DONE");
            Ok(())
        }
    }
}

/// Load configuration and open the database
fn connect(config_path: &Path) -> CliResult<Database> {
    let config = ConnectionConfig::load(config_path)?;
    Ok(Database::connect(&config)?)
}

fn delete_options(if_match: Option<String>, policy: PolicyArg, wait_for_sync: bool) -> DeleteOptions {
    let mut options = DeleteOptions::new()
        .policy(policy.into())
        .wait_for_sync(wait_for_sync);
    if let Some(rev) = if_match {
        options = options.if_match(rev);
    }
    options
}

/// Fetch an entity; a 304 reports `modified: false` instead of a body
pub fn get(db: &Database, kind: Kind, handle: &str, options: &GetOptions) -> CliResult<Value> {
    match kind {
        Kind::Document => get_entity(&db.documents(), handle, options),
        Kind::Edge => get_entity(&db.edges(), handle, options),
    }
}

fn get_entity<F: Flavor>(
    endpoint: &EntityEndpoint<F>,
    handle: &str,
    options: &GetOptions,
) -> CliResult<Value> {
    let mut entity = Value::Null;
    match endpoint.get(handle, &mut entity, options)? {
        ReadOutcome::Fetched => Ok(entity),
        ReadOutcome::NotModified => Ok(json!({
            "modified": false,
            "_rev": options.if_none_match_rev().map(|rev| rev.as_str()),
        })),
    }
}

/// Fetch an entity's current revision
pub fn head(db: &Database, kind: Kind, handle: &str, options: &HeadOptions) -> CliResult<Value> {
    let rev = match kind {
        Kind::Document => db.documents().head(handle, options)?,
        Kind::Edge => db.edges().head(handle, options)?,
    };
    Ok(json!({ "_rev": rev }))
}

/// Delete an entity, reporting its last state when the server returns it
pub fn delete(
    db: &Database,
    kind: Kind,
    handle: &str,
    options: &DeleteOptions,
) -> CliResult<Value> {
    let mut old = Value::Null;
    match kind {
        Kind::Document => db.documents().delete_returning(handle, &mut old, options)?,
        Kind::Edge => db.edges().delete_returning(handle, &mut old, options)?,
    }
    Ok(json!({ "deleted": handle, "old": old }))
}

/// Build a query from its text and `name=<json>` bind arguments.
///
/// A bind value that is not valid JSON is taken as a string.
pub fn build_query(text: String, binds: &[String], batch_size: Option<u32>) -> CliResult<AqlQuery> {
    let mut vars = Map::new();
    for bind in binds {
        let (name, raw) = bind.split_once('=').ok_or_else(|| {
            CliError::invalid_argument(format!("bind '{}' is not of the form name=value", bind))
        })?;
        if name.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "bind '{}' has an empty name",
                bind
            )));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        vars.insert(name.to_string(), value);
    }

    let mut query = AqlQuery::new(text);
    for (name, value) in vars {
        query = query.bind(name, value);
    }
    if let Some(size) = batch_size {
        query = query.batch_size(size);
    }
    Ok(query)
}

/// Run `aql`, hand every item to `emit`, then release the cursor.
///
/// Returns the number of items emitted.
pub fn query<E>(db: &Database, aql: &AqlQuery, emit: E) -> CliResult<usize>
where
    E: FnMut(Value) -> CliResult<()>,
{
    let mut cursor = db.query(aql)?;
    let drained = drain(&mut cursor, emit);
    let closed = cursor.close();
    let emitted = drained?;
    closed?;
    Ok(emitted)
}

fn drain<E>(cursor: &mut Cursor, mut emit: E) -> CliResult<usize>
where
    E: FnMut(Value) -> CliResult<()>,
{
    let mut emitted = 0;
    for item in cursor.items::<Value>() {
        emit(item?)?;
        emitted += 1;
    }
    Ok(emitted)
}
