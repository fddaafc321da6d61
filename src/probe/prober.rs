//! HTTP prober for mirror backends.
//!
//! # Responsibilities
//! - Issue one GET per (backend, endpoint) pair
//! - Target the backend via the `Backend-Override` header
//! - Extract a freshness timestamp or an availability status code

use std::time::Duration;

use reqwest::header::LAST_MODIFIED;
use reqwest::{Client, RequestBuilder, StatusCode};
use url::Url;

use crate::probe::error::ProbeError;
use crate::probe::http_date::{parse_http_date, HttpDateError};

/// Header telling the mirror front end which backend should answer.
pub const BACKEND_OVERRIDE: &str = "Backend-Override";

/// Issues freshness and availability probes.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Option<Duration>,
}

impl Prober {
    /// Create a prober on top of an existing HTTP client.
    pub fn new(client: Client) -> Self {
        Self { client, timeout: None }
    }

    /// Apply an explicit per-request timeout. `None` keeps the client default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn request(&self, backend: &str, url: &Url) -> RequestBuilder {
        let request = self
            .client
            .get(url.clone())
            .header(BACKEND_OVERRIDE, backend);

        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Fetch the backend's `Last-Modified` time as Unix epoch seconds.
    ///
    /// Anything other than a 200 response is [`ProbeError::UnexpectedStatus`].
    pub async fn fetch_freshness(&self, backend: &str, url: &Url) -> Result<f64, ProbeError> {
        let response = self.request(backend, url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProbeError::UnexpectedStatus(status));
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .ok_or(HttpDateError::Missing)?
            .to_str()
            .map_err(|_| HttpDateError::NotAscii)?;

        let modified = parse_http_date(last_modified)?;

        tracing::debug!(
            backend = %backend,
            url = %url,
            last_modified = %modified,
            "Freshness probe succeeded"
        );

        Ok(modified.timestamp() as f64)
    }

    /// Fetch the status code the backend answers with.
    ///
    /// Every received status, 4xx and 5xx included, is a successful sample.
    pub async fn fetch_availability(&self, backend: &str, url: &Url) -> Result<u16, ProbeError> {
        let response = self.request(backend, url).send().await?;
        let status = response.status();

        tracing::debug!(
            backend = %backend,
            url = %url,
            status = %status,
            "Availability probe succeeded"
        );

        Ok(status.as_u16())
    }
}
