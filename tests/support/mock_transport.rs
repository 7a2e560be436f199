//! Scripted transport: records every request and answers through a handler closure
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use appwrite_core::{AppwriteError, HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse, AppwriteError> + Send + Sync;

pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<(HttpRequest, Duration)>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, AppwriteError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests seen so far, in dispatch order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(r, _)| r.clone())
            .collect()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.requests.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, AppwriteError> {
        let response = (self.handler)(&request);
        self.requests.lock().unwrap().push((request, timeout));
        response
    }
}

/// Count non-overlapping occurrences of `needle` in `haystack`
pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// JSON response helper
pub fn json_response(status: u16, value: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, value.to_string()).with_header("content-type", "application/json")
}
