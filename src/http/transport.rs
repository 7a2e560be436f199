//! HTTP transport abstraction.
//!
//! The core never performs network I/O itself. It hands a finished
//! [`HttpRequest`] to an injectable [`HttpTransport`] together with the
//! per-request timeout and classifies whatever comes back. `ReqwestTransport`
//! is the default implementation; tests and embedders can provide their own.

use std::time::Duration;

use async_trait::async_trait;

use super::{HttpMethod, HttpRequest, HttpResponse};
use crate::error::AppwriteError;

/// Performs the actual network round-trip.
///
/// Implementations must honour `timeout` and report transport-level failures
/// as [`AppwriteError::Transport`] or [`AppwriteError::Timeout`]; those
/// propagate unchanged to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, AppwriteError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh `reqwest` client.
    ///
    /// `accept_invalid_certs` allows self-signed certificates.
    pub fn new(accept_invalid_certs: bool) -> Result<Self, AppwriteError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| {
                AppwriteError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, AppwriteError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url)
            .timeout(timeout);
        // `header` appends, so repeated names (Cookie) are preserved.
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                AppwriteError::Timeout(timeout)
            } else {
                AppwriteError::Transport(e.to_string())
            }
        };

        let resp = builder.send().await.map_err(map_err)?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = resp.bytes().await.map_err(map_err)?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
