//! Resumable chunked uploads.
//!
//! Files smaller than the configured chunk size go out as one ordinary
//! multipart request. Larger files are sliced and sent strictly in order,
//! each slice with a `Content-Range` header. The `x-appwrite-id` returned by
//! the first chunk ties the rest to the same resource.
//!
//! When the call names an identifier parameter, the server is asked first how
//! many chunks it already holds (`GET <path>/<id>`), and the upload resumes
//! from there. That lookup is the only failure the engine swallows; every
//! other error propagates immediately and the caller can resume by invoking
//! the upload again with the same identifier.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::Client;
use crate::defaults::headers as hdr;
use crate::error::AppwriteError;
use crate::http::{HttpMethod, set_header};
use crate::input_file::InputFile;
use crate::params::{ParamValue, Params};

/// Progress reported after each chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    /// Server-assigned resource id (`$id`), empty if not reported
    pub id: String,
    /// Percentage in `0.0..=100.0`
    pub progress: f64,
    pub size_uploaded: usize,
    /// `-1` when the server did not report it
    pub chunks_total: i64,
    /// `-1` when the server did not report it
    pub chunks_uploaded: i64,
}

/// Callback invoked with each [`UploadProgress`].
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// A file upload call.
#[derive(Clone)]
pub struct UploadRequest {
    path: String,
    headers: Vec<(String, String)>,
    params: Params,
    param_name: String,
    id_param_name: Option<String>,
    on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("path", &self.path)
            .field("headers", &self.headers)
            .field("param_name", &self.param_name)
            .field("id_param_name", &self.id_param_name)
            .finish_non_exhaustive()
    }
}

impl UploadRequest {
    /// `params[param_name]` must hold an [`InputFile`].
    pub fn new(path: impl Into<String>, params: Params, param_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: vec![(hdr::CONTENT_TYPE.to_string(), "multipart/form-data".to_string())],
            params,
            param_name: param_name.into(),
            id_param_name: None,
            on_progress: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, &name.into(), &value.into());
        self
    }

    /// Name of the parameter holding the resource id, enabling resumption.
    pub fn id_param(mut self, name: impl Into<String>) -> Self {
        self.id_param_name = Some(name.into());
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(UploadProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }
}

impl Client {
    /// Upload a file, chunking it when it exceeds the configured chunk size.
    ///
    /// `converter` receives the JSON object of the last response.
    pub async fn chunked_upload<T, F>(
        &self,
        request: UploadRequest,
        converter: F,
    ) -> Result<T, AppwriteError>
    where
        F: FnOnce(Map<String, Value>) -> Result<T, AppwriteError>,
    {
        let UploadRequest {
            path,
            mut headers,
            mut params,
            param_name,
            id_param_name,
            on_progress,
        } = request;

        let file = match params.take(&param_name) {
            Some(ParamValue::File(file)) => file.materialize().await?,
            _ => {
                return Err(AppwriteError::InvalidParameter(format!(
                    "parameter '{param_name}' must be a file"
                )));
            }
        };
        let InputFile::Data {
            data,
            filename,
            mime_type,
        } = file
        else {
            return Err(AppwriteError::InvalidParameter(format!(
                "parameter '{param_name}' could not be loaded"
            )));
        };

        let size = data.len();
        let chunk_size = self.config().chunk_size();

        if size < chunk_size {
            params.insert(param_name, InputFile::from_bytes(data, filename, mime_type));
            return self
                .call_with(HttpMethod::Post, &path, &headers, params, converter)
                .await;
        }

        let mut offset = 0usize;
        if let Some(id_param) = &id_param_name {
            let id = params
                .get(id_param)
                .and_then(ParamValue::as_str)
                .ok_or_else(|| {
                    AppwriteError::InvalidParameter(format!(
                        "parameter '{id_param}' must be a string id"
                    ))
                })?
                .to_string();
            offset = self
                .resume_offset(&format!("{path}/{id}"), &headers, chunk_size)
                .await;
        }

        let mut result = Map::new();
        while offset < size {
            let end = (offset + chunk_size).min(size);
            let mut chunk_params = params.clone();
            chunk_params.insert(
                param_name.clone(),
                InputFile::from_bytes(data[offset..end].to_vec(), filename.clone(), mime_type.clone()),
            );
            set_header(
                &mut headers,
                hdr::CONTENT_RANGE,
                &format!("bytes {}-{}/{}", offset, end - 1, size),
            );
            tracing::debug!(target: "appwrite::upload", start = offset, end = end - 1, total = size, "sending chunk");

            result = self
                .call_with(HttpMethod::Post, &path, &headers, chunk_params, Ok)
                .await?;

            // The final slice may be shorter; the next loop check terminates.
            offset += chunk_size;
            let id = result.get("$id").and_then(Value::as_str).map(str::to_string);
            if let Some(id) = &id {
                set_header(&mut headers, hdr::UPLOAD_ID, id);
            }

            let uploaded = offset.min(size);
            let progress = UploadProgress {
                id: id.unwrap_or_default(),
                progress: uploaded as f64 / size as f64 * 100.0,
                size_uploaded: uploaded,
                chunks_total: result.get("chunksTotal").and_then(Value::as_i64).unwrap_or(-1),
                chunks_uploaded: result
                    .get("chunksUploaded")
                    .and_then(Value::as_i64)
                    .unwrap_or(-1),
            };
            if let Some(cb) = &on_progress {
                cb(progress);
            }
        }

        converter(result)
    }

    /// Offset to resume from, or 0 when the resource does not exist yet.
    async fn resume_offset(&self, path: &str, headers: &[(String, String)], chunk_size: usize) -> usize {
        match self
            .call_with(HttpMethod::Get, path, headers, Params::new(), Ok)
            .await
        {
            Ok(existing) => {
                let uploaded = existing
                    .get("chunksUploaded")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                usize::try_from(uploaded)
                    .unwrap_or(0)
                    .saturating_mul(chunk_size)
            }
            Err(e) => {
                tracing::debug!(target: "appwrite::upload", err = %e, "no prior upload, starting at offset 0");
                0
            }
        }
    }
}
