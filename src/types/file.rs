//! File-like values accepted by upload operations.

use std::path::{Path, PathBuf};

use bytes::Bytes;

/// The raw content of a file parameter.
#[derive(Debug)]
pub enum FileValue {
    /// In-memory bytes.
    Bytes(Bytes),
    /// A string. Always sent as bytes, never as a multipart text field.
    Text(String),
    /// A file on disk, streamed when the request is sent.
    File(PathBuf),
    /// An opaque stream with no associated path.
    Stream(reqwest::Body),
}

impl FileValue {
    /// Stream a file from disk.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Wrap an arbitrary request body as an opaque stream.
    pub fn stream(body: impl Into<reqwest::Body>) -> Self {
        Self::Stream(body.into())
    }

    /// Filesystem path backing this value, if it has one.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File(p) => Some(p.as_path()),
            _ => None,
        }
    }

    /// Bytes available without any I/O.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_ref()),
            Self::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

impl From<Bytes> for FileValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for FileValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<&'static [u8]> for FileValue {
    fn from(value: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(value))
    }
}

impl From<String> for FileValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FileValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<PathBuf> for FileValue {
    fn from(value: PathBuf) -> Self {
        Self::File(value)
    }
}

/// Optional metadata attached to a file value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

/// A file value with caller-provided metadata.
#[derive(Debug)]
pub struct FileDescriptor {
    pub value: FileValue,
    pub options: FileOptions,
}

impl FileDescriptor {
    pub fn new(value: impl Into<FileValue>) -> Self {
        Self {
            value: value.into(),
            options: FileOptions::default(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.options.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.options.content_type = Some(content_type.into());
        self
    }
}

/// Either a bare value or a descriptor.
#[derive(Debug)]
pub enum FileData {
    Raw(FileValue),
    Descriptor(FileDescriptor),
}

impl FileData {
    /// The underlying value, unwrapping a descriptor.
    pub fn value(&self) -> &FileValue {
        match self {
            Self::Raw(v) => v,
            Self::Descriptor(d) => &d.value,
        }
    }
}

impl From<FileValue> for FileData {
    fn from(value: FileValue) -> Self {
        Self::Raw(value)
    }
}

impl From<FileDescriptor> for FileData {
    fn from(value: FileDescriptor) -> Self {
        Self::Descriptor(value)
    }
}

/// A file parameter as handed to the multipart builder: the data plus the
/// content type the operation declares for that field, if any.
#[derive(Debug)]
pub struct FileParam {
    pub data: FileData,
    pub content_type: Option<String>,
}

impl FileParam {
    pub fn new(data: impl Into<FileData>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Declare `content_type` unless the caller already declared one.
    pub fn with_default_content_type(mut self, content_type: &str) -> Self {
        if self.content_type.is_none() {
            self.content_type = Some(content_type.to_string());
        }
        self
    }
}

/// A file part whose filename, content type and value have all been resolved.
#[derive(Debug)]
pub struct ResolvedFile {
    /// Never `FileValue::Text`: strings are converted to bytes during resolution.
    pub value: FileValue,
    pub filename: Option<String>,
    pub content_type: String,
}
