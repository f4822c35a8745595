//! Request payload model
//!
//! A payload is what the caller hands to a verb as `data`. Structured
//! payloads carry arbitrary JSON and are re-encoded during body synthesis;
//! multipart payloads are already in their wire shape and pass through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied request data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    /// A pre-built multipart form, sent as-is
    Multipart(MultipartForm),
    /// Structured data, re-encoded according to method and content type
    Data(Value),
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<MultipartForm> for Payload {
    fn from(form: MultipartForm) -> Self {
        Self::Multipart(form)
    }
}

/// An ordered multipart form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<MultipartPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    /// Append a file field
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            value: PartValue::File(file),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }
}

/// One named field of a multipart form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultipartPart {
    pub name: String,
    pub value: PartValue,
}

/// Field value: plain text or an attached file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PartValue {
    Text(String),
    File(FilePart),
}

/// File attachment within a multipart form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilePart {
    pub file_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_builder_preserves_order() {
        let form = MultipartForm::new()
            .text("first", "1")
            .file("second", FilePart::new("report.pdf", vec![0x25, 0x50]))
            .text("third", "3");

        assert_eq!(form.len(), 3);
        assert_eq!(form.parts[0].name, "first");
        assert_eq!(form.parts[1].name, "second");
        assert_eq!(form.parts[2].name, "third");
    }

    #[test]
    fn test_payload_from_value() {
        let payload = Payload::from(json!({"id": 7}));
        assert!(matches!(payload, Payload::Data(_)));
    }

    #[test]
    fn test_file_part_content_type() {
        let file = FilePart::new("a.png", vec![1, 2, 3]).content_type("image/png");
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
    }
}
