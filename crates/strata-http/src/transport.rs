//! Pluggable transport layer
//!
//! A transport performs exactly one network call for a fully merged and
//! synthesized configuration, and hands back the raw response. The default
//! backend rides on `reqwest`; tests and embedders swap in their own.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use strata_core::{Method, MultipartForm, PartValue, RequestBody, RequestConfig, ResponseValue};

use crate::error::TransportError;

/// Boxed future returned by a transport override
pub type RequestFuture = Pin<Box<dyn Future<Output = Result<ResponseValue, TransportError>> + Send>>;

/// Caller-supplied replacement for the whole dispatch path
///
/// When installed, the facade hands it the merged configuration and skips
/// body synthesis, the timeout race, and response unwrapping entirely.
pub type RequestFn = Arc<dyn Fn(RequestConfig) -> RequestFuture + Send + Sync>;

/// Raw response produced by a transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
        }
    }

    /// Decode the body as JSON
    pub fn json(&self) -> Result<Value, TransportError> {
        serde_json::from_slice(&self.body).map_err(|err| TransportError::Decode(err.to_string()))
    }

    /// View the body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Copy of the raw body bytes
    pub fn bytes(&self) -> Vec<u8> {
        self.body.clone()
    }

    /// Decode the body as an urlencoded form
    pub fn form(&self) -> Result<BTreeMap<String, String>, TransportError> {
        serde_urlencoded::from_bytes(&self.body)
            .map_err(|err| TransportError::Decode(err.to_string()))
    }
}

/// One network call per invocation
///
/// Implementations treat the cancellation token as a stop request: once it
/// fires, the call's outcome no longer matters and work should cease.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        config: &RequestConfig,
        cancel: CancellationToken,
    ) -> Result<TransportResponse, TransportError>;
}

/// Default transport backed by a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-configured `reqwest` client (proxies, pools, TLS)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        config: &RequestConfig,
        cancel: CancellationToken,
    ) -> Result<TransportResponse, TransportError> {
        let request = build_request(&self.client, config)?;
        tokio::select! {
            outcome = async {
                let response = request.send().await?;
                read_response(response).await
            } => outcome,
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
        }
    }
}

fn build_request(
    client: &reqwest::Client,
    config: &RequestConfig,
) -> Result<reqwest::RequestBuilder, TransportError> {
    let url = config.url.as_deref().unwrap_or_default();
    let mut builder = match config.method.unwrap_or_default() {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Patch => client.patch(url),
        Method::Delete => client.delete(url),
    };

    if let Some(headers) = &config.headers {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
    }

    match &config.body {
        Some(RequestBody::Json(text)) => builder = builder.body(text.clone()),
        Some(RequestBody::Form(text)) => builder = builder.body(text.clone()),
        Some(RequestBody::Raw(bytes)) => builder = builder.body(bytes.clone()),
        Some(RequestBody::Multipart(form)) => {
            builder = builder.multipart(build_multipart(form)?);
        }
        None => {}
    }

    Ok(builder)
}

fn build_multipart(form: &MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
    let mut built = reqwest::multipart::Form::new();
    for part in &form.parts {
        built = match &part.value {
            PartValue::Text(text) => built.text(part.name.clone(), text.clone()),
            PartValue::File(file) => {
                let mut wire = reqwest::multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone());
                if let Some(content_type) = &file.content_type {
                    wire = wire
                        .mime_str(content_type)
                        .map_err(|err| TransportError::Other(err.to_string()))?;
                }
                built.part(part.name.clone(), wire)
            }
        };
    }
    Ok(built)
}

async fn read_response(response: reqwest::Response) -> Result<TransportResponse, TransportError> {
    let status = response.status().as_u16();
    let mut headers = BTreeMap::new();
    for (name, value) in response.headers() {
        if let Ok(text) = value.to_str() {
            headers.insert(name.to_string(), text.to_string());
        }
    }
    let body = response.bytes().await?.to_vec();
    Ok(TransportResponse {
        status,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_decoding() {
        let response = TransportResponse::new(200, br#"{"ok":true}"#.to_vec());
        assert_eq!(response.json().unwrap()["ok"], true);
    }

    #[test]
    fn test_json_decode_failure_reports_decode_error() {
        let response = TransportResponse::new(200, b"<html>".to_vec());
        let err = response.json().unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[test]
    fn test_text_replaces_invalid_utf8() {
        let response = TransportResponse::new(200, vec![0x68, 0x69, 0xff]);
        assert_eq!(response.text(), "hi\u{fffd}");
    }

    #[test]
    fn test_form_decoding() {
        let response = TransportResponse::new(200, b"a=1&b=two".to_vec());
        let form = response.form().unwrap();
        assert_eq!(form["a"], "1");
        assert_eq!(form["b"], "two");
    }
}
