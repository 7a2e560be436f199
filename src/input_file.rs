//! File parameters.
//!
//! An [`InputFile`] is either a path on disk or an in-memory buffer. Path
//! sources are only read when the request body is encoded, and a read
//! failure aborts the call before anything is sent.

use std::path::{Path, PathBuf};

use crate::error::AppwriteError;

/// A file passed as a request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFile {
    /// Read lazily from the file system.
    Path {
        path: PathBuf,
        filename: String,
        mime_type: String,
    },
    /// Already in memory.
    Data {
        data: Vec<u8>,
        filename: String,
        mime_type: String,
    },
}

impl InputFile {
    /// Reference a file on disk. Filename and MIME type are derived from the path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = guess_mime_from_path(&path);
        Self::Path {
            path,
            filename,
            mime_type,
        }
    }

    /// Wrap an in-memory buffer.
    pub fn from_bytes(
        data: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self::Data {
            data: data.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }

    /// `"path"` or `"data"`.
    pub fn source_type(&self) -> &'static str {
        match self {
            Self::Path { .. } => "path",
            Self::Data { .. } => "data",
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::Path { filename, .. } | Self::Data { filename, .. } => filename,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Self::Path { mime_type, .. } | Self::Data { mime_type, .. } => mime_type,
        }
    }

    /// In-memory bytes, if this file has been materialized.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Path { .. } => None,
            Self::Data { data, .. } => Some(data),
        }
    }

    /// Load path-sourced content, returning a `Data` file.
    pub async fn materialize(self) -> Result<Self, AppwriteError> {
        match self {
            Self::Path {
                path,
                filename,
                mime_type,
            } => {
                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|source| AppwriteError::Io {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Self::Data {
                    data,
                    filename,
                    mime_type,
                })
            }
            data @ Self::Data { .. } => Ok(data),
        }
    }

    /// Blocking read of the file content, used when encoding outside a runtime.
    pub(crate) fn read_bytes(&self) -> Result<std::borrow::Cow<'_, [u8]>, AppwriteError> {
        match self {
            Self::Path { path, .. } => std::fs::read(path)
                .map(std::borrow::Cow::Owned)
                .map_err(|source| AppwriteError::Io {
                    path: path.clone(),
                    source,
                }),
            Self::Data { data, .. } => Ok(std::borrow::Cow::Borrowed(data)),
        }
    }
}

/// Guess MIME by file extension, falling back to octet-stream.
fn guess_mime_from_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_path_derives_filename_and_mime() {
        let file = InputFile::from_path("/tmp/photos/cat.png");
        assert_eq!(file.source_type(), "path");
        assert_eq!(file.filename(), "cat.png");
        assert_eq!(file.mime_type(), "image/png");
        assert!(file.data().is_none());

        let unknown = InputFile::from_path("blob.unknownext");
        assert_eq!(unknown.mime_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn materialize_reads_path_content() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello file").unwrap();

        let file = InputFile::from_path(tmp.path()).materialize().await.unwrap();
        assert_eq!(file.source_type(), "data");
        assert_eq!(file.data(), Some(&b"hello file"[..]));
    }

    #[tokio::test]
    async fn materialize_missing_file_is_io_error() {
        let err = InputFile::from_path("/definitely/not/here.bin")
            .materialize()
            .await
            .unwrap_err();
        assert!(matches!(err, AppwriteError::Io { .. }));
    }

    #[test]
    fn data_files_pass_through_unchanged() {
        let file = InputFile::from_bytes(vec![1, 2, 3], "x.bin", "application/octet-stream");
        assert_eq!(file.read_bytes().unwrap().as_ref(), &[1, 2, 3]);

        let same = tokio_test::block_on(file.clone().materialize()).unwrap();
        assert_eq!(same.data(), Some(&[1u8, 2, 3][..]));
    }
}
