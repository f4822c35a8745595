//! Log collaborators for interceptors
//!
//! Small side-effect-only helpers meant to be called from user-supplied
//! interceptors. Neither alters what it is handed; both write through
//! `tracing`, so whatever subscriber the host application installs decides
//! where the lines go.

use strata_core::{RequestConfig, ResponseEnvelope};

/// Record an outgoing request
pub fn request(config: &RequestConfig) {
    tracing::info!(
        target: "strata::request",
        method = config.method.unwrap_or_default().as_str(),
        url = config.url.as_deref().unwrap_or(""),
        label = config.label.as_deref(),
        timeout = config.timeout,
        "request"
    );
}

/// Record a completed call next to the configuration that produced it
pub fn response(envelope: &ResponseEnvelope, config: &RequestConfig, success: bool) {
    if success {
        tracing::info!(
            target: "strata::response",
            url = config.url.as_deref().unwrap_or(""),
            label = config.label.as_deref(),
            total_ms = envelope.time.total,
            "response"
        );
    } else {
        tracing::warn!(
            target: "strata::response",
            url = config.url.as_deref().unwrap_or(""),
            label = config.label.as_deref(),
            total_ms = envelope.time.total,
            error = envelope.error.as_deref().unwrap_or(""),
            category = envelope.error_text.as_deref().unwrap_or(""),
            "response"
        );
    }
}
