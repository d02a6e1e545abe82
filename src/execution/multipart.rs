//! Multipart form construction.
//!
//! File parameters arrive in several shapes (bytes, text, file-backed
//! streams, opaque streams, or descriptors carrying explicit metadata).
//! [`build_file`] normalizes any of them into a [`ResolvedFile`] with a
//! filename (when one can be derived), a content type, and a byte or stream
//! value ready to become a `reqwest::multipart::Part`.

use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::error::WatsonError;
use crate::types::{FileData, FileParam, FileValue, ResolvedFile};
use crate::utils::mime::{DEFAULT_CONTENT_TYPE, detect_content_type};
use crate::utils::query::scalar_to_string;

/// A single multipart field.
#[derive(Debug)]
pub enum FormField {
    /// Plain text field.
    Text(String),
    /// Structured field; objects and arrays are sent as their JSON text, `null` is dropped.
    Json(Value),
    /// File field, normalized through [`build_file`] when the form is built.
    File(FileParam),
}

impl FormField {
    pub(crate) fn is_supplied(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Json(v) => crate::params::is_supplied_value(v),
            Self::File(_) => true,
        }
    }
}

impl From<FileParam> for FormField {
    fn from(value: FileParam) -> Self {
        Self::File(value)
    }
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Normalize a file parameter.
///
/// - filename: the descriptor's filename, else the base name of a
///   file-backed value, else `None`
/// - content type: the descriptor's content type, else the declared one,
///   else sniffed from the value, else `application/octet-stream`
/// - value: text becomes bytes
///
/// Never fails; missing information degrades to the defaults above.
pub fn build_file(param: FileParam) -> ResolvedFile {
    let FileParam { data, content_type } = param;

    let (value, explicit_filename, explicit_type) = match data {
        FileData::Raw(value) => (value, None, None),
        FileData::Descriptor(d) => (d.value, d.options.filename, d.options.content_type),
    };

    let filename = explicit_filename.or_else(|| value.file_path().and_then(base_name));

    let content_type = explicit_type
        .or(content_type)
        .or_else(|| detect_content_type(&value))
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let value = match value {
        FileValue::Text(s) => FileValue::Bytes(Bytes::from(s)),
        other => other,
    };

    ResolvedFile {
        value,
        filename,
        content_type,
    }
}

impl ResolvedFile {
    /// Convert into a multipart part, opening file-backed values for streaming.
    pub async fn into_part(self) -> Result<Part, WatsonError> {
        let ResolvedFile {
            value,
            filename,
            content_type,
        } = self;

        let part = match value {
            FileValue::Bytes(b) => Part::bytes(b.to_vec()),
            FileValue::Text(s) => Part::bytes(s.into_bytes()),
            FileValue::File(path) => {
                let file = tokio::fs::File::open(&path).await.map_err(|e| {
                    WatsonError::Io(format!("Failed to open {}: {e}", path.display()))
                })?;
                let stream = tokio_util::io::ReaderStream::new(file);
                Part::stream(reqwest::Body::wrap_stream(stream))
            }
            FileValue::Stream(body) => Part::stream(body),
        };

        let part = match filename {
            Some(name) => part.file_name(name),
            None => part,
        };

        part.mime_str(&content_type).map_err(|e| {
            WatsonError::InvalidInput(format!("Invalid content type '{content_type}': {e}"))
        })
    }
}

/// Build a multipart form from named fields, in order.
pub async fn build_form(fields: Vec<(String, FormField)>) -> Result<Form, WatsonError> {
    let mut form = Form::new();
    for (name, field) in fields {
        form = match field {
            FormField::Text(text) => form.text(name, text),
            FormField::Json(value) => match scalar_to_string(&value) {
                Some(text) => form.text(name, text),
                None => form,
            },
            FormField::File(param) => form.part(name, build_file(param).into_part().await?),
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileDescriptor;
    use std::io::Write;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn unrecognized_bytes_fall_back_to_octet_stream() {
        let resolved = build_file(FileParam::new(FileValue::from(vec![1u8, 2, 3])));
        assert_eq!(resolved.content_type, "application/octet-stream");
        assert_eq!(resolved.filename, None);
    }

    #[test]
    fn descriptor_metadata_wins_over_everything() {
        let data = FileDescriptor::new(FileValue::from(PNG))
            .with_filename("custom.bin")
            .with_content_type("application/x-custom");
        let resolved = build_file(FileParam::new(data).with_content_type("text/csv"));
        assert_eq!(resolved.filename.as_deref(), Some("custom.bin"));
        assert_eq!(resolved.content_type, "application/x-custom");
    }

    #[test]
    fn declared_type_beats_sniffing() {
        let resolved = build_file(FileParam::new(FileValue::from(PNG)).with_content_type("text/csv"));
        assert_eq!(resolved.content_type, "text/csv");
    }

    #[test]
    fn sniffs_descriptor_value_when_nothing_is_declared() {
        let resolved = build_file(FileParam::new(FileDescriptor::new(FileValue::from(PNG))));
        assert_eq!(resolved.content_type, "image/png");
        assert_eq!(resolved.filename, None);
    }

    #[test]
    fn file_backed_values_provide_base_name_and_extension_type() {
        let resolved = build_file(FileParam::new(FileValue::path("/data/train/fruit.zip")));
        assert_eq!(resolved.filename.as_deref(), Some("fruit.zip"));
        assert_eq!(resolved.content_type, "application/zip");

        let wrapped = FileDescriptor::new(FileValue::path("/data/meta.json"));
        let resolved = build_file(FileParam::new(wrapped));
        assert_eq!(resolved.filename.as_deref(), Some("meta.json"));
        assert_eq!(resolved.content_type, "application/json");
    }

    #[test]
    fn text_is_converted_to_bytes() {
        let resolved = build_file(FileParam::new(FileValue::from("a,b\n1,2")));
        match resolved.value {
            FileValue::Bytes(b) => assert_eq!(b.as_ref(), b"a,b\n1,2"),
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_parts_open_the_file() {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(tmp, "hello,world").unwrap();
        let resolved = build_file(FileParam::new(FileValue::path(tmp.path())));
        assert_eq!(resolved.content_type, "text/csv");
        assert!(resolved.into_part().await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_surfaces_io_error() {
        let resolved = build_file(FileParam::new(FileValue::path("/definitely/not/here.csv")));
        assert!(matches!(
            resolved.into_part().await,
            Err(WatsonError::Io(_))
        ));
    }

    #[tokio::test]
    async fn form_drops_null_json_fields() {
        let form = build_form(vec![
            ("name".into(), FormField::Text("x".into())),
            ("skip".into(), FormField::Json(Value::Null)),
            (
                "config".into(),
                FormField::Json(serde_json::json!({"a": 1})),
            ),
        ])
        .await;
        assert!(form.is_ok());
    }
}
