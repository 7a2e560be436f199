//! Default Configuration Values
//!
//! This module centralizes the default values used by the request-execution core.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default API endpoint
    pub const ENDPOINT: &str = "https://cloud.appwrite.io/v1";

    /// Fixed timeout applied to every underlying request
    ///
    /// Chunked uploads apply it per chunk, not to the whole transfer.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default headers sent with every request, in insertion order
    pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
        ("content-type", "application/json"),
        ("x-sdk-name", "Rust"),
        ("x-sdk-platform", "client"),
        ("x-sdk-language", "rust"),
        ("x-sdk-version", env!("CARGO_PKG_VERSION")),
        ("x-appwrite-response-format", "1.8.0"),
    ];
}

/// Chunked upload defaults
pub mod upload {
    /// Default chunk size (5 MiB)
    pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;
}

/// Multipart body defaults
pub mod multipart {
    /// Alphabet the boundary token is drawn from
    pub const BOUNDARY_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz1234567890";

    /// Number of characters in a boundary token
    pub const BOUNDARY_LEN: usize = 16;
}

/// Header names used by the wire protocol
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CONTENT_LENGTH: &str = "Content-Length";
    pub const CONTENT_RANGE: &str = "content-range";
    pub const COOKIE: &str = "Cookie";
    pub const SET_COOKIE: &str = "Set-Cookie";
    pub const UPLOAD_ID: &str = "x-appwrite-id";
    pub const WARNING: &str = "x-appwrite-warning";
    pub const PROJECT: &str = "X-Appwrite-Project";
    pub const JWT: &str = "X-Appwrite-JWT";
    pub const LOCALE: &str = "X-Appwrite-Locale";
    pub const SESSION: &str = "X-Appwrite-Session";
    pub const DEV_KEY: &str = "X-Appwrite-Dev-Key";
}
