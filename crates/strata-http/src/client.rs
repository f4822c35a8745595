//! The Strata request facade
//!
//! Every verb funnels into one pipeline: stack the layers, resolve the
//! url, run the request interceptor, dispatch under a deadline, classify
//! any failure, and hand the enveloped outcome to the response
//! interceptor. The pipeline resolves an envelope even when the network
//! fails; only a panicking interceptor escapes it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use strata_core::{
    classify_error, layer_defaults, merge_fragments, resolve_url, ConfigFragment, Method, Payload,
    RequestConfig, ResponseEnvelope, Stopwatch,
};

use crate::invoke::dispatch;
use crate::transport::{ReqwestTransport, RequestFn, Transport};

/// Hook that may rewrite the merged configuration before dispatch
pub type RequestInterceptor = Arc<dyn Fn(RequestConfig) -> RequestConfig + Send + Sync>;

/// Hook that may rewrite the envelope before the caller sees it
pub type ResponseInterceptor = Arc<dyn Fn(ResponseEnvelope) -> ResponseEnvelope + Send + Sync>;

/// Construction settings for [`StrataClient`]
///
/// Every field is optional; an empty `ClientConfig` yields a client that
/// sends relative urls as-is over the default transport.
#[derive(Default)]
pub struct ClientConfig {
    /// Scheme and authority prefixed to relative urls
    pub host: String,

    /// Path segment between `host` and a relative url
    pub api_path: String,

    /// Instance defaults, slotted between built-ins and per-call settings
    pub default_config: RequestConfig,

    pub request_interceptor: Option<RequestInterceptor>,
    pub response_interceptor: Option<ResponseInterceptor>,

    /// Replaces the whole dispatch path when present
    pub request_fn: Option<RequestFn>,

    /// Transport used when `request_fn` is absent
    pub transport: Option<Arc<dyn Transport>>,

    /// Unrecognized construction settings, kept on the client verbatim
    pub extra: Map<String, Value>,
}

/// Configuration-driven HTTP client
///
/// # Example
///
/// ```ignore
/// use strata_http::{ClientConfig, StrataClient};
/// use strata_core::RequestConfig;
/// use serde_json::json;
///
/// let client = StrataClient::new(ClientConfig {
///     host: "https://api.example.com".to_string(),
///     api_path: "/v2".to_string(),
///     default_config: RequestConfig::new().header("Accept", "application/json"),
///     ..ClientConfig::default()
/// });
///
/// let res = client.get("/users", Some(json!({"page": 2}).into()), vec![]).await;
/// assert!(res.is_success());
/// ```
pub struct StrataClient {
    /// Fields are plain state: the owner may reassign any of them between
    /// calls, and the next call picks the new values up
    pub host: String,
    pub api_path: String,

    /// Resolved instance defaults, built-ins included
    pub default_config: RequestConfig,

    pub request_interceptor: RequestInterceptor,
    pub response_interceptor: ResponseInterceptor,
    pub request_fn: Option<RequestFn>,
    pub transport: Arc<dyn Transport>,

    /// Unrecognized construction settings
    pub extra: Map<String, Value>,
}

impl StrataClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            host: config.host,
            api_path: config.api_path,
            // Built-ins sit under the instance defaults once, at construction
            default_config: layer_defaults(&RequestConfig::builtin(), config.default_config),
            request_interceptor: config
                .request_interceptor
                .unwrap_or_else(|| Arc::new(|config| config)),
            response_interceptor: config
                .response_interceptor
                .unwrap_or_else(|| Arc::new(|envelope| envelope)),
            request_fn: config.request_fn,
            transport: config
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            extra: config.extra,
        }
    }

    pub async fn get(
        &self,
        url: impl Into<String>,
        data: Option<Payload>,
        overrides: Vec<ConfigFragment>,
    ) -> ResponseEnvelope {
        self.run(verb_base(Method::Get, url.into(), data), overrides)
            .await
    }

    pub async fn post(
        &self,
        url: impl Into<String>,
        data: Option<Payload>,
        overrides: Vec<ConfigFragment>,
    ) -> ResponseEnvelope {
        self.run(verb_base(Method::Post, url.into(), data), overrides)
            .await
    }

    pub async fn put(
        &self,
        url: impl Into<String>,
        data: Option<Payload>,
        overrides: Vec<ConfigFragment>,
    ) -> ResponseEnvelope {
        self.run(verb_base(Method::Put, url.into(), data), overrides)
            .await
    }

    pub async fn patch(
        &self,
        url: impl Into<String>,
        data: Option<Payload>,
        overrides: Vec<ConfigFragment>,
    ) -> ResponseEnvelope {
        self.run(verb_base(Method::Patch, url.into(), data), overrides)
            .await
    }

    pub async fn delete(
        &self,
        url: impl Into<String>,
        data: Option<Payload>,
        overrides: Vec<ConfigFragment>,
    ) -> ResponseEnvelope {
        self.run(verb_base(Method::Delete, url.into(), data), overrides)
            .await
    }

    /// POST seeded with an empty header map
    ///
    /// The empty map replaces the instance default headers wholesale, so
    /// unless an override declares a content type the payload synthesizes
    /// as a multipart form.
    pub async fn upload(
        &self,
        url: impl Into<String>,
        data: Option<Payload>,
        overrides: Vec<ConfigFragment>,
    ) -> ResponseEnvelope {
        let mut base = verb_base(Method::Post, url.into(), data);
        base.headers = Some(BTreeMap::new());
        self.run(base, overrides).await
    }

    async fn run(&self, base: RequestConfig, overrides: Vec<ConfigFragment>) -> ResponseEnvelope {
        self.request(merge_fragments(base, overrides)).await
    }

    /// Run the full pipeline for one call configuration
    ///
    /// Never fails: transport trouble comes back classified inside the
    /// envelope. A panic in an interceptor is the caller's own and
    /// propagates.
    pub async fn request(&self, config: RequestConfig) -> ResponseEnvelope {
        let mut merged = layer_defaults(&self.default_config, config);
        resolve_url(&mut merged, &self.host, &self.api_path);
        let merged = (self.request_interceptor)(merged);

        tracing::debug!(
            method = merged.method.unwrap_or_default().as_str(),
            url = merged.url.as_deref().unwrap_or(""),
            label = merged.label.as_deref(),
            "dispatching request"
        );

        let watch = Stopwatch::start();
        let outcome = match &self.request_fn {
            Some(request_fn) => request_fn(merged).await,
            None => dispatch(self.transport.as_ref(), merged).await,
        };
        let time = watch.stop();

        let envelope = match outcome {
            Ok(value) => ResponseEnvelope::success(time, value),
            Err(err) => {
                let error = err.to_string();
                let category = classify_error(&error);
                tracing::warn!(error = %error, category, "request failed");
                ResponseEnvelope::failure(time, error, category)
            }
        };
        (self.response_interceptor)(envelope)
    }
}

impl Default for StrataClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl fmt::Debug for StrataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrataClient")
            .field("host", &self.host)
            .field("api_path", &self.api_path)
            .field("default_config", &self.default_config)
            .field("request_fn", &self.request_fn.is_some())
            .finish_non_exhaustive()
    }
}

fn verb_base(method: Method, url: String, data: Option<Payload>) -> RequestConfig {
    RequestConfig {
        method: Some(method),
        url: Some(url),
        data,
        ..RequestConfig::default()
    }
}
