//! Request execution.
//!
//! `Client` turns a logical call (method, path, parameters, headers) into an
//! [`HttpRequest`], dispatches it through the injected transport with the
//! configured timeout and classifies the [`HttpResponse`].
//!
//! Body selection:
//! - `GET` requests carry parameters in the query string and never a body
//! - a `multipart/form-data` content type routes to [`MultipartBuilder`]
//! - everything else is encoded as a JSON object

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::cookies::{CookieStore, MemoryCookieStore};
use crate::defaults::headers as hdr;
use crate::error::AppwriteError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, merge_headers};
use crate::multipart::MultipartBuilder;
use crate::params::{self, ParamValue, Params};
use crate::response::{self, FromResponse};

/// REST client core. Cheap to share behind an `Arc`; holds no per-call state.
pub struct Client {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    cookies: Arc<dyn CookieStore>,
    multipart: MultipartBuilder,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client using the reqwest transport and an in-memory cookie store.
    pub fn new(config: ClientConfig) -> Result<Self, AppwriteError> {
        let transport = ReqwestTransport::new(config.self_signed())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let multipart = MultipartBuilder::new(config.boundary().clone());
        Self {
            config,
            transport,
            cookies: Arc::new(MemoryCookieStore::new()),
            multipart,
        }
    }

    /// Replace the cookie store.
    pub fn with_cookie_store(mut self, cookies: Arc<dyn CookieStore>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mutable access for endpoint and header changes.
    ///
    /// The multipart boundary stays fixed for the client's lifetime.
    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// Send a `GET /ping` to check connectivity.
    pub async fn ping(&self) -> Result<String, AppwriteError> {
        let api_headers = [(hdr::CONTENT_TYPE.to_string(), "application/json".to_string())];
        self.call(HttpMethod::Get, "/ping", &api_headers, Params::new())
            .await
    }

    /// Make an API call and convert the result according to `T`.
    pub async fn call<T: FromResponse>(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(String, String)],
        params: Params,
    ) -> Result<T, AppwriteError> {
        let request = self.build_request(method, path, headers, params).await?;
        let response = self.execute(request).await?;
        response::classify(response)
    }

    /// Make an API call and pass the JSON object result through `converter`.
    pub async fn call_with<T, F>(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(String, String)],
        params: Params,
        converter: F,
    ) -> Result<T, AppwriteError>
    where
        F: FnOnce(Map<String, Value>) -> Result<T, AppwriteError>,
    {
        let request = self.build_request(method, path, headers, params).await?;
        let response = self.execute(request).await?;
        response::classify_with(response, converter)
    }

    /// Build the request for a call without sending it.
    pub async fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(String, String)],
        params: Params,
    ) -> Result<HttpRequest, AppwriteError> {
        let query = if method == HttpMethod::Get && !params.is_empty() {
            format!("?{}", params::to_query_string(&params)?)
        } else {
            String::new()
        };

        let mut request = HttpRequest::new(
            method,
            format!("{}{}{}", self.config.endpoint(), path, query),
        );
        request.headers = merge_headers(self.config.headers(), headers);
        self.attach_cookies(&mut request);

        if method == HttpMethod::Get {
            return Ok(request);
        }

        let is_multipart = request
            .header(hdr::CONTENT_TYPE)
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));
        if is_multipart {
            let chunked = request.header(hdr::CONTENT_RANGE).is_some();
            let params = materialize_files(params).await?;
            self.multipart.apply(&mut request, &params, chunked)?;
        } else {
            request.body = params::encode_json(&params)?;
        }
        Ok(request)
    }

    /// Dispatch a finished request and apply response side effects.
    ///
    /// Returns the raw response; status classification is left to the caller.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, AppwriteError> {
        let host = request.host();
        let timeout = self.config.timeout();
        tracing::debug!(target: "appwrite::http", method=%request.method, url=%request.url, "sending request");

        let response = self
            .transport
            .execute(request, timeout)
            .await
            .inspect_err(|e| {
                tracing::debug!(target: "appwrite::http", err=%e, "transport error");
            })?;
        tracing::debug!(target: "appwrite::http", status=%response.status, "response received");

        for warning in response.headers_matching(hdr::WARNING) {
            for segment in warning.split(';') {
                tracing::warn!(target: "appwrite::http", "Warning: {}", segment.trim());
            }
        }

        if response.is_success()
            && let Some(host) = host
        {
            let cookies: Vec<String> = response
                .headers_matching(hdr::SET_COOKIE)
                .into_iter()
                .map(str::to_string)
                .collect();
            if !cookies.is_empty() {
                self.cookies.set(&host, cookies);
            }
        }

        Ok(response)
    }

    fn attach_cookies(&self, request: &mut HttpRequest) {
        let Some(host) = request.host() else {
            return;
        };
        for cookie in self.cookies.get(&host) {
            request.add_header(hdr::COOKIE, cookie);
        }
    }
}

/// Read path-sourced files so the multipart encoder only sees bytes.
async fn materialize_files(params: Params) -> Result<Params, AppwriteError> {
    let mut out = Params::new();
    for (name, value) in params {
        let value = match value {
            Some(ParamValue::File(file)) => Some(ParamValue::File(file.materialize().await?)),
            other => other,
        };
        out.insert_opt(name, value);
    }
    Ok(out)
}
