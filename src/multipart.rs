//! `multipart/form-data` body encoding.
//!
//! Each field becomes one part:
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<name>"[; filename="<file>"]\r\n
//! Content-Length: <n>\r\n
//! \r\n
//! <bytes>\r\n
//! ```
//!
//! followed by a closing `--<boundary>--\r\n`. For file parts `<n>` is the
//! length of the body buffer at the moment the header is written, not the
//! length of the part content. Servers in the wild accept this, and the byte
//! layout is kept stable for them. Scalar parts declare the byte length of
//! their value.

use std::fmt;

use rand::Rng;

use crate::defaults;
use crate::error::AppwriteError;
use crate::http::HttpRequest;
use crate::input_file::InputFile;
use crate::params::{ParamValue, Params};

const DASHDASH: &[u8] = b"--";
const CRLF: &[u8] = b"\r\n";

/// Field name that is never expanded into `name[]` parts.
const FILE_FIELD: &str = "file";

/// Random delimiter between multipart parts.
///
/// Fixed for the lifetime of the client that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Generate a random boundary of lowercase alphanumeric characters.
    pub fn random() -> Self {
        let chars = defaults::multipart::BOUNDARY_CHARS;
        let mut rng = rand::thread_rng();
        let token = (0..defaults::multipart::BOUNDARY_LEN)
            .map(|_| chars[rng.gen_range(0..chars.len())] as char)
            .collect();
        Self(token)
    }

    /// Use a caller-chosen token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::random()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes parameters into a multipart body with a fixed boundary.
#[derive(Debug, Clone)]
pub struct MultipartBuilder {
    boundary: Boundary,
}

impl MultipartBuilder {
    pub fn new(boundary: Boundary) -> Self {
        Self { boundary }
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Value of the `Content-Type` header announcing this boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data;boundary=\"{}\"", self.boundary)
    }

    /// Encode `params` into multipart bytes.
    pub fn encode(&self, params: &Params) -> Result<Vec<u8>, AppwriteError> {
        let mut buf = Vec::new();
        for (name, value) in params.iter() {
            match value {
                ParamValue::Array(items) if name != FILE_FIELD => {
                    let part_name = format!("{name}[]");
                    for item in items {
                        self.write_part(&mut buf, &part_name, item)?;
                    }
                }
                other => self.write_part(&mut buf, name, other)?,
            }
        }
        buf.extend_from_slice(DASHDASH);
        buf.extend_from_slice(self.boundary.as_str().as_bytes());
        buf.extend_from_slice(DASHDASH);
        buf.extend_from_slice(CRLF);
        Ok(buf)
    }

    /// Encode `params` into `request`'s body and set its content headers.
    ///
    /// `Content-Length` is omitted for chunked uploads, where every request
    /// carries a partial `Content-Range` instead.
    pub fn apply(
        &self,
        request: &mut HttpRequest,
        params: &Params,
        chunked: bool,
    ) -> Result<(), AppwriteError> {
        let body = self.encode(params)?;
        request.remove_header(defaults::headers::CONTENT_TYPE);
        if !chunked {
            request.add_header(defaults::headers::CONTENT_LENGTH, body.len().to_string());
        }
        request.add_header("Content-Type", self.content_type());
        request.body = body;
        Ok(())
    }

    fn write_part(
        &self,
        buf: &mut Vec<u8>,
        name: &str,
        value: &ParamValue,
    ) -> Result<(), AppwriteError> {
        buf.extend_from_slice(DASHDASH);
        buf.extend_from_slice(self.boundary.as_str().as_bytes());
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"").as_bytes());

        if let ParamValue::File(file) = value {
            write_file_part(buf, file)?;
            return Ok(());
        }

        let text = value.to_param_string()?;
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(format!("Content-Length: {}", text.len()).as_bytes());
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(text.as_bytes());
        buf.extend_from_slice(CRLF);
        Ok(())
    }
}

fn write_file_part(buf: &mut Vec<u8>, file: &InputFile) -> Result<(), AppwriteError> {
    let content = file.read_bytes()?;
    buf.extend_from_slice(format!("; filename=\"{}\"", file.filename()).as_bytes());
    buf.extend_from_slice(CRLF);
    let declared = buf.len();
    buf.extend_from_slice(format!("Content-Length: {declared}").as_bytes());
    buf.extend_from_slice(CRLF);
    buf.extend_from_slice(CRLF);
    buf.extend_from_slice(&content);
    buf.extend_from_slice(CRLF);
    Ok(())
}
