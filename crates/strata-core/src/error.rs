//! Error types for strata-core

use thiserror::Error;

/// Errors raised while synthesizing a wire body from a request configuration
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("JSON body encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("form body encoding failed: {0}")]
    UrlEncode(#[from] serde_urlencoded::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_error_display() {
        let err = serde_urlencoded::to_string([("k", vec![1, 2])]).unwrap_err();
        let err = BodyError::from(err);
        assert!(err.to_string().starts_with("form body encoding failed"));
    }
}
