//! Blocking HTTP transport over `reqwest`

use std::time::Duration;

use http::header::{HeaderValue, CONTENT_TYPE};
use reqwest::blocking::Client;
use tracing::debug;

use super::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::connection::ConnectionConfig;

/// Transport sending each request on a shared blocking `reqwest` client.
///
/// Certificate acceptance and timeout come from the configuration value it
/// was built from; nothing is read from process-wide state.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl HttpTransport {
    /// Build a transport from connection configuration
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TransportError::with_source("failed to build HTTP client", e))?;

        let credentials = config
            .username
            .as_ref()
            .map(|user| (user.clone(), config.password.clone()));

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            credentials,
        })
    }

    /// Returns the server root every request path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, url = %url, "ARANGO_REQUEST");

        let mut builder = self.client.request(request.method, url.as_str());

        for (name, value) in request.headers {
            let value = HeaderValue::from_str(&value).map_err(|e| {
                TransportError::with_source(format!("invalid value for header {}", name), e)
            })?;
            builder = builder.header(name, value);
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, password.as_deref());
        }

        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::with_source(format!("request to {} failed", url), e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| TransportError::with_source("failed to read response body", e))?
            .to_vec();

        debug!(status = status.as_u16(), bytes = body.len(), "ARANGO_RESPONSE");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
