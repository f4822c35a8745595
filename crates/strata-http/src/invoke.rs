//! Transport invocation
//!
//! One dispatch does three things in order: synthesize the wire body, race
//! the transport against the configured deadline, and unwrap the raw
//! response into the declared representation. Losing the race cancels the
//! in-flight call through its token.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use strata_core::{synthesize_body, RequestConfig, ResponseType, ResponseValue, DEFAULT_TIMEOUT_MS};

use crate::error::TransportError;
use crate::transport::{Transport, TransportResponse};

/// Perform one transport call for a merged configuration
pub async fn dispatch(
    transport: &dyn Transport,
    mut config: RequestConfig,
) -> Result<ResponseValue, TransportError> {
    synthesize_body(&mut config)?;

    let deadline = Duration::from_millis(config.timeout.unwrap_or(DEFAULT_TIMEOUT_MS));
    let response_type = config.response_type.unwrap_or_default();

    let cancel = CancellationToken::new();
    let raw = match tokio::time::timeout(deadline, transport.send(&config, cancel.clone())).await {
        Ok(outcome) => outcome?,
        Err(_) => {
            cancel.cancel();
            return Err(TransportError::Timeout);
        }
    };

    unwrap_response(&raw, response_type)
}

/// Extract the declared representation from a raw transport response
///
/// Status codes play no part here: a 500 with a JSON body unwraps the same
/// way a 200 does.
pub fn unwrap_response(
    raw: &TransportResponse,
    response_type: ResponseType,
) -> Result<ResponseValue, TransportError> {
    match response_type {
        ResponseType::Json => raw.json().map(ResponseValue::Json),
        ResponseType::Text => Ok(ResponseValue::Text(raw.text())),
        ResponseType::Bytes => Ok(ResponseValue::Bytes(raw.bytes())),
        ResponseType::Form => raw.form().map(ResponseValue::Form),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use strata_core::Method;

    /// Transport that records what it was handed and replies from a script
    struct ScriptedTransport {
        reply: TransportResponse,
        delay: Duration,
        seen: Mutex<Vec<RequestConfig>>,
        tokens: Mutex<Vec<CancellationToken>>,
    }

    impl ScriptedTransport {
        fn replying(reply: TransportResponse) -> Self {
            Self {
                reply,
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
                tokens: Mutex::new(Vec::new()),
            }
        }

        fn delayed(reply: TransportResponse, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::replying(reply)
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            config: &RequestConfig,
            cancel: CancellationToken,
        ) -> Result<TransportResponse, TransportError> {
            self.seen.lock().unwrap().push(config.clone());
            self.tokens.lock().unwrap().push(cancel.clone());
            tokio::time::sleep(self.delay).await;
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_dispatch_synthesizes_before_sending() {
        let transport =
            ScriptedTransport::replying(TransportResponse::new(200, b"{}".to_vec()));
        let config = RequestConfig::new()
            .url("/search")
            .method(Method::Get)
            .data(json!({"q": "rust"}));

        dispatch(&transport, config).await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url.as_deref(), Some("/search?q=rust"));
    }

    #[tokio::test]
    async fn test_dispatch_times_out_and_fires_the_token() {
        let transport = ScriptedTransport::delayed(
            TransportResponse::new(200, b"{}".to_vec()),
            Duration::from_secs(60),
        );
        let config = RequestConfig::new().url("/slow").timeout(20);

        let err = dispatch(&transport, config).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout));

        let tokens = transport.tokens.lock().unwrap();
        assert!(tokens[0].is_cancelled());
    }

    #[tokio::test]
    async fn test_unwrap_follows_declared_type() {
        let raw = TransportResponse::new(200, b"plain text".to_vec());

        let value = unwrap_response(&raw, ResponseType::Text).unwrap();
        assert_eq!(value, ResponseValue::Text("plain text".to_string()));

        let err = unwrap_response(&raw, ResponseType::Json).unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_2xx_status_still_unwraps() {
        let raw = TransportResponse::new(503, br#"{"detail":"down"}"#.to_vec());
        let value = unwrap_response(&raw, ResponseType::Json).unwrap();
        assert_eq!(value, ResponseValue::Json(json!({"detail": "down"})));
    }
}
