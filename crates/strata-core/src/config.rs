//! Request configuration model
//!
//! A [`RequestConfig`] is one layer of request settings. Layers stack:
//! built-in defaults under instance defaults under per-call arguments under
//! override fragments, later layers winning key by key. Unrecognized keys
//! survive in `extra` and ride along to the transport untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::body::RequestBody;
use crate::payload::Payload;

/// Applied when no layer provides a timeout, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// HTTP method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representation to extract from a raw transport response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Json,
    Text,
    Bytes,
    Form,
}

/// One layer of request settings
///
/// Every field is optional: an unset field defers to the layers beneath it.
/// `headers` is the only field merged a level deep when fragments stack;
/// everything else replaces wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,

    /// Header names are matched byte for byte, never case-folded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Milliseconds the dispatched call may take before it is abandoned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Explicit wire body; body synthesis only fills this when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,

    /// Caller-chosen tag for log lines and interceptors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Unrecognized keys, carried through layering untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lowest-precedence layer applied to every request
    pub fn builtin() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT_MS),
            response_type: Some(ResponseType::Json),
            ..Self::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Insert one header, creating the map when absent
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// One override step in a merge chain
///
/// A bare string is shorthand for a configuration that sets only `label`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConfigFragment {
    Label(String),
    Config(RequestConfig),
}

impl ConfigFragment {
    /// Normalize to a partial configuration before merging
    pub fn into_config(self) -> RequestConfig {
        match self {
            Self::Label(label) => RequestConfig {
                label: Some(label),
                ..RequestConfig::default()
            },
            Self::Config(config) => config,
        }
    }
}

impl From<&str> for ConfigFragment {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for ConfigFragment {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<RequestConfig> for ConfigFragment {
    fn from(config: RequestConfig) -> Self {
        Self::Config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builtin_layer() {
        let config = RequestConfig::builtin();
        assert_eq!(config.timeout, Some(5_000));
        assert_eq!(config.response_type, Some(ResponseType::Json));
        assert_eq!(config.method, None);
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(serde_json::to_string(&Method::Get).unwrap(), "\"GET\"");
        assert_eq!(serde_json::to_string(&Method::Delete).unwrap(), "\"DELETE\"");
    }

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let raw = json!({
            "url": "/users",
            "responseType": "text",
            "retryCount": 3,
            "trace": {"id": "abc"}
        });

        let config: RequestConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(config.url.as_deref(), Some("/users"));
        assert_eq!(config.response_type, Some(ResponseType::Text));
        assert_eq!(config.extra["retryCount"], json!(3));
        assert_eq!(config.extra["trace"], json!({"id": "abc"}));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_header_names_keep_exact_case() {
        let config = RequestConfig::new()
            .header("Content-Type", "application/json")
            .header("content-type", "text/plain");

        let headers = config.headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["content-type"], "text/plain");
    }

    #[test]
    fn test_fragment_label_shorthand() {
        let fragment = ConfigFragment::from("user-list");
        let config = fragment.into_config();
        assert_eq!(config.label.as_deref(), Some("user-list"));
        assert_eq!(
            config,
            RequestConfig {
                label: Some("user-list".to_string()),
                ..RequestConfig::default()
            }
        );
    }

    #[test]
    fn test_fragment_deserializes_from_string_or_object() {
        let label: ConfigFragment = serde_json::from_value(json!("audit")).unwrap();
        assert!(matches!(label, ConfigFragment::Label(_)));

        let config: ConfigFragment =
            serde_json::from_value(json!({"timeout": 250})).unwrap();
        match config {
            ConfigFragment::Config(c) => assert_eq!(c.timeout, Some(250)),
            ConfigFragment::Label(_) => panic!("expected a config fragment"),
        }
    }
}
