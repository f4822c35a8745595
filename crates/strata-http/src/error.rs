//! Transport error types
//!
//! Failures here never escape to callers as errors. The facade stringifies
//! them with `Display` and classifies the text into the response envelope,
//! so the `Display` strings below are part of the classification contract.

use strata_core::BodyError;
use thiserror::Error;

/// Failures raised between body synthesis and response unwrapping
#[derive(Debug, Error)]
pub enum TransportError {
    /// The configured deadline elapsed before the transport finished
    #[error("request timeout")]
    Timeout,

    /// The remote address could not be reached
    #[error("Network Error: {0}")]
    Network(String),

    /// The call was abandoned through its cancellation token
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Body(#[from] BodyError),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Network(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{classify_error, ADDRESS_CATEGORY, OTHER_CATEGORY, TIMEOUT_CATEGORY};

    #[test]
    fn test_timeout_display_classifies_as_timeout() {
        let text = TransportError::Timeout.to_string();
        assert_eq!(classify_error(&text), TIMEOUT_CATEGORY);
    }

    #[test]
    fn test_network_display_classifies_as_address_error() {
        let text = TransportError::Network("connection refused".to_string()).to_string();
        assert_eq!(classify_error(&text), ADDRESS_CATEGORY);
    }

    #[test]
    fn test_decode_display_classifies_as_other() {
        let text = TransportError::Decode("expected value at line 1".to_string()).to_string();
        assert_eq!(classify_error(&text), OTHER_CATEGORY);
    }
}
