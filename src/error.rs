//! Error Handling Module
//!
//! A single error type covers every failure the request-execution core can
//! surface to its caller:
//! - transport failures (network, TLS, timeout) passed through unchanged
//! - API errors for responses with status >= 400
//! - malformed success payloads
//! - configuration-time validation failures
//!
//! # Example
//!
//! ```rust,ignore
//! use appwrite_core::error::{AppwriteError, ErrorCategory};
//!
//! let error = AppwriteError::api(404, "Not Found", "not_found", "");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert!(error.is_not_found());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppwriteError>;

/// Errors returned by the request-execution core.
#[derive(Error, Debug)]
pub enum AppwriteError {
    /// Network or TLS failure reported by the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The transport gave up after the request timeout elapsed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a status code >= 400.
    #[error("API error {code}: {message}")]
    Api {
        message: String,
        code: u16,
        error_type: String,
        response: String,
    },

    /// A success response whose body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid client configuration (endpoint scheme, header names, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A file parameter could not be read from disk.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A call was made with a missing or mistyped parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A parameter could not be converted to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of an [`AppwriteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 4xx responses and caller mistakes
    Client,
    /// 5xx responses
    Server,
    /// Transport and timeout failures
    Network,
    /// Configuration-time failures
    Configuration,
    /// Unexpected payloads
    Parse,
}

impl AppwriteError {
    /// Build an API error from its parts.
    pub fn api(
        code: u16,
        message: impl Into<String>,
        error_type: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            code,
            error_type: error_type.into(),
            response: response.into(),
        }
    }

    /// HTTP status code carried by API errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this is an API error reporting a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) | Self::Timeout(_) => ErrorCategory::Network,
            Self::Api { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::Api { .. } | Self::InvalidParameter(_) | Self::Io { .. } => {
                ErrorCategory::Client
            }
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::UnexpectedResponse(_) | Self::Serialization(_) => ErrorCategory::Parse,
        }
    }

    /// Whether re-invoking the same call could plausibly succeed.
    ///
    /// Informational only: the core never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Api { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
