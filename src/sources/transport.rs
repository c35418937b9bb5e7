//! HTTP transport used by the GitHub remote.

use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::sources::RemoteError;

/// A completed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Check if the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking HTTP GET.
pub trait HttpTransport {
    /// Issue a GET request with the given headers.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    fn get(
        &self,
        url: &Url,
        headers: &[(&'static str, String)],
    ) -> Result<HttpResponse, RemoteError>;
}

/// [`HttpTransport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport. `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to create HTTP client")?;
        Ok(ReqwestTransport { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(
        &self,
        url: &Url,
        headers: &[(&'static str, String)],
    ) -> Result<HttpResponse, RemoteError> {
        let mut request = self.client.get(url.as_str());
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().map_err(|e| RemoteError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| RemoteError::Transport {
                url: url.to_string(),
                message: format!("failed to read response body: {}", e),
            })?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}
