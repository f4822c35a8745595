//! Failure classification
//!
//! Transport failures reach callers as prose inside the response envelope.
//! Classification maps a stringified failure onto one of three fixed
//! categories by scanning an ordered pattern table and taking the first
//! hit. Unrecognized failures land in the catch-all category, so every
//! failure classifies.

use std::sync::LazyLock;

use regex::Regex;

/// Category for failures whose text mentions a timeout
pub const TIMEOUT_CATEGORY: &str = "network connection timeout";

/// Category for unreachable or refusing addresses
pub const ADDRESS_CATEGORY: &str = "request address error";

/// Catch-all category
pub const OTHER_CATEGORY: &str = "other error";

/// Ordered pattern table; earlier rows shadow later ones
static PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("timeout", TIMEOUT_CATEGORY),
        ("Network Error", ADDRESS_CATEGORY),
        ("Failed to fetch", ADDRESS_CATEGORY),
        ("request:fail", ADDRESS_CATEGORY),
    ]
    .into_iter()
    .map(|(pattern, category)| {
        let regex = Regex::new(pattern).expect("classifier pattern is a valid regex");
        (regex, category)
    })
    .collect()
});

/// Map a stringified failure onto its category
pub fn classify_error(message: &str) -> &'static str {
    for (pattern, category) in PATTERNS.iter() {
        if pattern.is_match(message) {
            return category;
        }
    }
    OTHER_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_text_classifies_as_timeout() {
        assert_eq!(classify_error("request timeout"), TIMEOUT_CATEGORY);
        assert_eq!(classify_error("operation timeout after 5000ms"), TIMEOUT_CATEGORY);
    }

    #[test]
    fn test_address_failures_classify_as_address_error() {
        assert_eq!(classify_error("Network Error: dns failure"), ADDRESS_CATEGORY);
        assert_eq!(classify_error("TypeError: Failed to fetch"), ADDRESS_CATEGORY);
        assert_eq!(classify_error("request:fail ssl handshake"), ADDRESS_CATEGORY);
    }

    #[test]
    fn test_unrecognized_text_classifies_as_other() {
        assert_eq!(classify_error("status 500"), OTHER_CATEGORY);
        assert_eq!(classify_error(""), OTHER_CATEGORY);
    }

    #[test]
    fn test_earlier_rows_shadow_later_ones() {
        // Matches both the timeout and address rows; the timeout row is first
        assert_eq!(classify_error("Network Error: timeout"), TIMEOUT_CATEGORY);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(classify_error("TIMEOUT"), OTHER_CATEGORY);
        assert_eq!(classify_error("network error"), OTHER_CATEGORY);
    }
}
