//! Connection configuration
//!
//! Loaded from a JSON file or built in code. Every transport-level switch
//! lives here as a plain field so two connections in one process can
//! disagree about certificates or timeouts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server root, e.g. `http://localhost:8529` (required)
    pub endpoint: String,

    /// Database name (optional, default `_system`)
    #[serde(default = "default_database")]
    pub database: String,

    /// Basic auth user (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password (optional)
    #[serde(default)]
    pub password: Option<String>,

    /// Accept self-signed or otherwise invalid TLS certificates (default: false)
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Per-request timeout handed to the transport (default: 60s)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_database() -> String {
    "_system".to_string()
}
fn default_timeout_ms() -> u64 {
    60_000
}

impl ConnectionConfig {
    /// Configuration for `endpoint` with every other field defaulted
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            database: default_database(),
            username: None,
            password: None,
            accept_invalid_certs: false,
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Select the database
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set basic auth credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::config(format!("Failed to read config: {}", e)))?;

        let config: ConnectionConfig = serde_json::from_str(&content)
            .map_err(|e| ClientError::config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ClientResult<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ClientError::config(format!(
                "Invalid endpoint: '{}'. Expected an http:// or https:// URL.",
                self.endpoint
            )));
        }

        if self.database.trim().is_empty() {
            return Err(ClientError::config("database must not be blank"));
        }

        if self.password.is_some() && self.username.is_none() {
            return Err(ClientError::config("password given without username"));
        }

        Ok(())
    }

    /// Returns the endpoint without trailing slashes
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}
