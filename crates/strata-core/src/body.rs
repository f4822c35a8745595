//! Method-dependent body synthesis
//!
//! After layering settles a configuration, synthesis turns `data` into its
//! wire form. A GET folds `data` into the query string and never grows a
//! body. Anything else dispatches on the declared content type: JSON when
//! the header says json, an urlencoded form when it says form, and a
//! multipart form when no content type is declared at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Method, RequestConfig};
use crate::error::BodyError;
use crate::payload::{MultipartForm, Payload};
use crate::query::{encode_pairs, flatten_pairs};

/// Wire-level request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RequestBody {
    /// Serialized JSON text
    Json(String),
    /// Urlencoded `a=1&b=2` text
    Form(String),
    /// Raw bytes, sent untouched
    Raw(Vec<u8>),
    /// Multipart form, encoded by the transport
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Textual view of the body, when it has one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(text) | Self::Form(text) => Some(text),
            Self::Raw(_) | Self::Multipart(_) => None,
        }
    }
}

/// Header names probed for a declared content type, most common spelling
/// first. Lookup is byte for byte; no other casing counts.
const CONTENT_TYPE_KEYS: [&str; 4] = [
    "Content-Type",
    "Content-type",
    "content-Type",
    "content-type",
];

/// First non-empty content type among the probed spellings
pub fn declared_content_type(headers: Option<&BTreeMap<String, String>>) -> Option<&str> {
    let headers = headers?;
    CONTENT_TYPE_KEYS.iter().find_map(|name| {
        headers
            .get(*name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    })
}

/// Fill in the wire body (or query string) of a merged configuration
///
/// Runs once per dispatch, after layering and url resolution. A
/// configuration with no `data`, or with an explicit `body` already set,
/// comes through unchanged. A pre-built multipart payload passes through
/// whatever the headers declare.
pub fn synthesize_body(config: &mut RequestConfig) -> Result<(), BodyError> {
    if config.data.is_none() || config.body.is_some() {
        return Ok(());
    }

    if config.method == Some(Method::Get) {
        synthesize_query(config)?;
        return Ok(());
    }

    let payload = match config.data.clone() {
        Some(payload) => payload,
        None => return Ok(()),
    };

    let data = match payload {
        Payload::Multipart(form) => {
            config.body = Some(RequestBody::Multipart(form));
            return Ok(());
        }
        Payload::Data(value) => value,
    };

    match declared_content_type(config.headers.as_ref()) {
        Some(content_type) if content_type.contains("application/json") => {
            config.body = Some(RequestBody::Json(serde_json::to_string(&data)?));
        }
        Some(content_type) if content_type.contains("application/x-www-form-urlencoded") => {
            config.body = Some(RequestBody::Form(encode_pairs(&flatten_pairs(&data))?));
        }
        _ => {
            let mut form = MultipartForm::new();
            for (key, value) in flatten_pairs(&data) {
                form = form.text(key, value);
            }
            config.body = Some(RequestBody::Multipart(form));
        }
    }
    Ok(())
}

/// Fold `data` into the url as a bracket-notation query string
fn synthesize_query(config: &mut RequestConfig) -> Result<(), BodyError> {
    let pairs = match &config.data {
        Some(Payload::Data(value)) => flatten_pairs(value),
        // A multipart payload has no query representation
        Some(Payload::Multipart(_)) | None => return Ok(()),
    };
    if pairs.is_empty() {
        return Ok(());
    }

    let encoded = encode_pairs(&pairs)?;
    let url = config.url.get_or_insert_with(String::new);
    let separator = if url.contains('?') { '&' } else { '?' };
    url.push(separator);
    url.push_str(&encoded);
    Ok(())
}
