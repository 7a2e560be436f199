//! Client configuration.
//!
//! `ClientConfig` is owned by a single [`Client`](crate::Client). It carries
//! the HTTP endpoint, the realtime endpoint derived from it, the default
//! header set, the upload chunk size, the request timeout and the multipart
//! boundary. Endpoints are validated when they are set, so a client can never
//! start with a bad scheme.

use std::time::Duration;

use crate::defaults;
use crate::error::AppwriteError;
use crate::multipart::Boundary;

/// Configuration for one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    endpoint: String,
    endpoint_realtime: String,
    headers: Vec<(String, String)>,
    chunk_size: usize,
    timeout: Duration,
    boundary: Boundary,
    self_signed: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let endpoint = defaults::http::ENDPOINT.to_string();
        Self {
            endpoint_realtime: realtime_from_http(&endpoint),
            endpoint,
            headers: defaults::http::DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            chunk_size: defaults::upload::CHUNK_SIZE,
            timeout: defaults::http::REQUEST_TIMEOUT,
            boundary: Boundary::random(),
            self_signed: false,
        }
    }
}

impl ClientConfig {
    /// Returns a builder for constructing `ClientConfig`
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Build a configuration from `APPWRITE_*` environment variables.
    ///
    /// Recognized: `APPWRITE_ENDPOINT`, `APPWRITE_ENDPOINT_REALTIME`,
    /// `APPWRITE_PROJECT`, `APPWRITE_LOCALE`, `APPWRITE_CHUNK_SIZE`.
    pub fn from_env() -> Result<Self, AppwriteError> {
        let mut builder = ClientConfigBuilder::new();
        if let Ok(v) = std::env::var("APPWRITE_ENDPOINT") {
            builder = builder.endpoint(v);
        }
        if let Ok(v) = std::env::var("APPWRITE_ENDPOINT_REALTIME") {
            builder = builder.endpoint_realtime(v);
        }
        if let Ok(v) = std::env::var("APPWRITE_PROJECT") {
            builder = builder.project(v);
        }
        if let Ok(v) = std::env::var("APPWRITE_LOCALE") {
            builder = builder.locale(v);
        }
        if let Ok(v) = std::env::var("APPWRITE_CHUNK_SIZE") {
            let size = v.trim().parse::<usize>().map_err(|e| {
                AppwriteError::Configuration(format!("Invalid APPWRITE_CHUNK_SIZE '{v}': {e}"))
            })?;
            builder = builder.chunk_size(size);
        }
        builder.build()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn endpoint_realtime(&self) -> &str {
        &self.endpoint_realtime
    }

    /// Default headers, in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn self_signed(&self) -> bool {
        self.self_signed
    }

    /// Set the HTTP endpoint. The realtime endpoint is reset to the same URL
    /// with `ws`/`wss` substituted, replacing any earlier override.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> Result<(), AppwriteError> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(AppwriteError::Configuration(format!(
                "Invalid endpoint URL: {endpoint}"
            )));
        }
        self.endpoint_realtime = realtime_from_http(&endpoint);
        self.endpoint = endpoint;
        Ok(())
    }

    /// Override the realtime endpoint until the next [`set_endpoint`](Self::set_endpoint).
    pub fn set_endpoint_realtime(
        &mut self,
        endpoint: impl Into<String>,
    ) -> Result<(), AppwriteError> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("ws://") && !endpoint.starts_with("wss://") {
            return Err(AppwriteError::Configuration(format!(
                "Invalid realtime endpoint URL: {endpoint}"
            )));
        }
        self.endpoint_realtime = endpoint;
        Ok(())
    }

    /// Set a default header, replacing any existing value (case-insensitive).
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }
}

fn realtime_from_http(endpoint: &str) -> String {
    if let Some(rest) = endpoint.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = endpoint.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        endpoint.to_string()
    }
}

/// Builder for `ClientConfig`
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<String>,
    endpoint_realtime: Option<String>,
    headers: Vec<(String, String)>,
    chunk_size: Option<usize>,
    timeout: Option<Duration>,
    boundary: Option<Boundary>,
    self_signed: bool,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn endpoint_realtime<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint_realtime = Some(endpoint.into());
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Your project ID
    pub fn project<S: Into<String>>(self, value: S) -> Self {
        self.header(defaults::headers::PROJECT, value)
    }

    /// Your secret JSON Web Token
    pub fn jwt<S: Into<String>>(self, value: S) -> Self {
        self.header(defaults::headers::JWT, value)
    }

    pub fn locale<S: Into<String>>(self, value: S) -> Self {
        self.header(defaults::headers::LOCALE, value)
    }

    /// The user session to authenticate with
    pub fn session<S: Into<String>>(self, value: S) -> Self {
        self.header(defaults::headers::SESSION, value)
    }

    /// Your secret dev API key
    pub fn dev_key<S: Into<String>>(self, value: S) -> Self {
        self.header(defaults::headers::DEV_KEY, value)
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Pin the multipart boundary instead of generating one.
    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Accept self-signed TLS certificates in the default transport.
    pub fn self_signed(mut self, val: bool) -> Self {
        self.self_signed = val;
        self
    }

    /// Build the configuration, validating endpoints and sizes.
    pub fn build(self) -> Result<ClientConfig, AppwriteError> {
        let mut config = ClientConfig::default();
        if let Some(endpoint) = self.endpoint {
            config.set_endpoint(endpoint)?;
        }
        if let Some(realtime) = self.endpoint_realtime {
            config.set_endpoint_realtime(realtime)?;
        }
        for (k, v) in self.headers {
            config.add_header(k, v);
        }
        if let Some(size) = self.chunk_size {
            if size == 0 {
                return Err(AppwriteError::Configuration(
                    "chunk size must be greater than zero".into(),
                ));
            }
            config.chunk_size = size;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(boundary) = self.boundary {
            config.boundary = boundary;
        }
        config.self_signed = self.self_signed;
        Ok(config)
    }
}
