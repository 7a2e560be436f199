//! appwrite-core
//!
//! Request-execution core of the Appwrite REST client: parameter encoding,
//! multipart bodies, resumable chunked uploads and response classification,
//! on top of an injectable HTTP transport.
//!
//! # Example
//!
//! ```rust,no_run
//! use appwrite_core::{Client, ClientConfig, HttpMethod, Params};
//!
//! # async fn example() -> Result<(), appwrite_core::AppwriteError> {
//! let config = ClientConfig::builder()
//!     .endpoint("https://cloud.appwrite.io/v1")
//!     .project("my-project")
//!     .build()?;
//! let client = Client::new(config)?;
//!
//! let pong = client.ping().await?;
//! let docs: serde_json::Value = client
//!     .call(
//!         HttpMethod::Get,
//!         "/databases/main/collections/books/documents",
//!         &[],
//!         Params::new().with("queries", vec!["limit(10)"]),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod cookies;
pub mod defaults;
pub mod error;
pub mod http;
pub mod input_file;
pub mod multipart;
pub mod params;
pub mod response;
pub mod upload;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use cookies::{CookieStore, MemoryCookieStore};
pub use error::{AppwriteError, ErrorCategory};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use input_file::InputFile;
pub use multipart::{Boundary, MultipartBuilder};
pub use params::{ParamValue, Params, ToJson};
pub use response::FromResponse;
pub use upload::{ProgressCallback, UploadProgress, UploadRequest};
