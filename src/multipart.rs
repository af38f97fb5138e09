//! `multipart/form-data` request bodies.
//!
//! A [`MultipartForm`] only records its parts. Files are read, and the
//! reqwest form with its boundary is produced, when the request is sent.

use crate::error::{Error, Result};
use log::trace;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// MIME type used for binary parts when none is given.
pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PartSource {
    Text(String),
    Bytes(Vec<u8>),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    name: String,
    source: PartSource,
    mime: Option<String>,
    filename: Option<String>,
}

/// A multipart form, built with chainable calls.
///
/// Parts keep insertion order and duplicate names are allowed.
///
/// ```
/// use please::MultipartForm;
///
/// let form = MultipartForm::new()
///     .field("x", "y")
///     .data("bytes", b"The Talos Mistake".to_vec())
///     .file("file", "notes.txt");
/// assert_eq!(form.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    /// A form with no parts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field. The value is formatted with `Display`.
    pub fn field(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.parts.push(Part {
            name: name.into(),
            source: PartSource::Text(value.to_string()),
            mime: None,
            filename: None,
        });
        self
    }

    /// Adds a binary part sent as `application/octet-stream`, with the
    /// field name as its filename.
    pub fn data(self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let filename = name.clone();
        self.data_with(name, bytes, OCTET_STREAM, filename)
    }

    /// Adds a binary part with an explicit MIME type and filename.
    pub fn data_with(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        mime: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            source: PartSource::Bytes(bytes.into()),
            mime: Some(mime.into()),
            filename: Some(filename.into()),
        });
        self
    }

    /// Adds a file part sent as `application/octet-stream`, named after the
    /// file. The file is read when the request is sent.
    pub fn file(mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned());
        self.parts.push(Part {
            name: name.into(),
            source: PartSource::File(path),
            mime: Some(OCTET_STREAM.to_string()),
            filename,
        });
        self
    }

    /// Adds a file part with an explicit MIME type and filename.
    pub fn file_with(
        mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
        mime: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            source: PartSource::File(path.as_ref().to_path_buf()),
            mime: Some(mime.into()),
            filename: Some(filename.into()),
        });
        self
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Names of the parts, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Reads any file parts and builds the reqwest form.
    pub(crate) async fn into_reqwest(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();

        for part in self.parts {
            let Part {
                name,
                source,
                mime,
                filename,
            } = part;

            let bytes = match source {
                PartSource::Text(text) => {
                    form = form.text(name, text);
                    continue;
                }
                PartSource::Bytes(bytes) => bytes,
                PartSource::File(path) => {
                    trace!("reading multipart file {}", path.display());
                    tokio::fs::read(&path).await?
                }
            };

            let mut reqwest_part = reqwest::multipart::Part::bytes(bytes);
            if let Some(filename) = filename {
                reqwest_part = reqwest_part.file_name(filename);
            }
            if let Some(mime) = mime {
                reqwest_part = reqwest_part
                    .mime_str(&mime)
                    .map_err(|_| Error::InvalidMime {
                        part: name.clone(),
                        mime: mime.clone(),
                    })?;
            }
            form = form.part(name, reqwest_part);
        }

        Ok(form)
    }
}
