//! Response envelope
//!
//! Every call resolves to an envelope: timing plus either the unwrapped
//! response value or a classified failure. Failures live inside the
//! envelope rather than in a `Result`, so a caller always gets timing and
//! never needs a second error path.
//!
//! Envelopes serialize flat. A JSON-object payload spreads its keys at the
//! top level next to `time`, and a payload key named `time`, `error`, or
//! `errorText` wins over the scaffold's.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::timing::Timing;

/// Unwrapped response representation, tagged by the declared response type
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
    Form(BTreeMap<String, String>),
}

impl ResponseValue {
    /// Serialization key for the non-object single-key shape
    fn key(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Form(_) => "form",
        }
    }
}

/// What one dispatched request resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Wall-clock timing around the dispatch
    pub time: Timing,

    /// Stringified failure, present only on failure
    pub error: Option<String>,

    /// Classified failure category, present only on failure
    pub error_text: Option<String>,

    /// Unwrapped response value, present only on success
    pub value: Option<ResponseValue>,
}

impl ResponseEnvelope {
    pub fn success(time: Timing, value: ResponseValue) -> Self {
        Self {
            time,
            error: None,
            error_text: None,
            value: Some(value),
        }
    }

    pub fn failure(time: Timing, error: String, category: &str) -> Self {
        Self {
            time,
            error: Some(error),
            error_text: Some(category.to_string()),
            value: None,
        }
    }

    /// A call succeeded when no failure category was recorded
    pub fn is_success(&self) -> bool {
        self.error_text.is_none()
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.value {
            Some(ResponseValue::Json(value)) => Some(value),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(ResponseValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.value {
            Some(ResponseValue::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&BTreeMap<String, String>> {
        match &self.value {
            Some(ResponseValue::Form(form)) => Some(form),
            _ => None,
        }
    }
}

impl Serialize for ResponseEnvelope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let spread = match &self.value {
            Some(ResponseValue::Json(Value::Object(fields))) => Some(fields),
            _ => None,
        };
        let shadowed = |key: &str| spread.map(|fields| fields.contains_key(key)).unwrap_or(false);

        let mut map = serializer.serialize_map(None)?;
        if !shadowed("time") {
            map.serialize_entry("time", &self.time)?;
        }
        if let Some(error) = &self.error {
            if !shadowed("error") {
                map.serialize_entry("error", error)?;
            }
        }
        if let Some(error_text) = &self.error_text {
            if !shadowed("errorText") {
                map.serialize_entry("errorText", error_text)?;
            }
        }
        match &self.value {
            Some(ResponseValue::Json(Value::Object(fields))) => {
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
            }
            Some(other) => match other {
                ResponseValue::Json(value) => map.serialize_entry(other.key(), value)?,
                ResponseValue::Text(text) => map.serialize_entry(other.key(), text)?,
                ResponseValue::Bytes(bytes) => map.serialize_entry(other.key(), bytes)?,
                ResponseValue::Form(form) => map.serialize_entry(other.key(), form)?,
            },
            None => {}
        }
        map.end()
    }
}
