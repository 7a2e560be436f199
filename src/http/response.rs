//! HTTP response described as plain data, produced by the transport.

/// An HTTP response. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// All values of headers named `name` (case-insensitive), in order.
    pub fn headers_matching(&self, name: &str) -> Vec<&str> {
        super::values_matching(&self.headers, name)
    }

    /// Status codes below 400 count as success.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}
