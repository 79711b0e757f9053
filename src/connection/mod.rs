//! Connection configuration and database handle
//!
//! [`ConnectionConfig`] carries every transport switch (endpoint,
//! credentials, certificate acceptance, timeout) as an explicit value.
//! [`Database`] scopes endpoints and cursors to one database.

mod config;
mod database;

pub use config::ConnectionConfig;
pub use database::Database;
