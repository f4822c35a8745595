//! Configuration layering
//!
//! Two stacking rules live here. Override fragments stack with
//! [`merge_fragments`], where `headers` merges one level deep so a
//! fragment can add a header without erasing earlier ones. Instance
//! defaults go underneath a call with [`layer_defaults`], where `headers`
//! behaves like any other key: a call-provided map replaces the default
//! map wholesale. Both rules are last-write-wins for every other key.

use std::collections::BTreeMap;

use crate::config::{ConfigFragment, RequestConfig};

/// Fold override fragments over a base configuration, in order
pub fn merge_fragments(base: RequestConfig, fragments: Vec<ConfigFragment>) -> RequestConfig {
    fragments
        .into_iter()
        .fold(base, |acc, fragment| overlay(acc, fragment.into_config()))
}

/// Apply one fragment on top of an accumulated configuration
///
/// Set keys in `over` win; `headers` merges key by key with the incoming
/// side winning collisions.
pub fn overlay(mut base: RequestConfig, over: RequestConfig) -> RequestConfig {
    let over_headers = overlay_scalars(&mut base, over);
    base.headers = match (base.headers.take(), over_headers) {
        (Some(mut kept), Some(incoming)) => {
            kept.extend(incoming);
            Some(kept)
        }
        (None, Some(incoming)) => Some(incoming),
        (kept, None) => kept,
    };
    base
}

/// Slot instance defaults underneath a call configuration
///
/// Keys set by the call win. Unlike fragment stacking, a call-provided
/// `headers` map replaces the default map wholesale, so a call that seeds
/// an empty map really does start from no headers.
pub fn layer_defaults(defaults: &RequestConfig, call: RequestConfig) -> RequestConfig {
    let mut merged = defaults.clone();
    let call_headers = overlay_scalars(&mut merged, call);
    if call_headers.is_some() {
        merged.headers = call_headers;
    }
    merged
}

/// Copy every set non-header key of `over` into `base`; hand back
/// `over.headers` for the caller's header rule
fn overlay_scalars(
    base: &mut RequestConfig,
    over: RequestConfig,
) -> Option<BTreeMap<String, String>> {
    if over.mode.is_some() {
        base.mode = over.mode;
    }
    if over.method.is_some() {
        base.method = over.method;
    }
    if over.cache.is_some() {
        base.cache = over.cache;
    }
    if over.credentials.is_some() {
        base.credentials = over.credentials;
    }
    if over.response_type.is_some() {
        base.response_type = over.response_type;
    }
    if over.timeout.is_some() {
        base.timeout = over.timeout;
    }
    if over.body.is_some() {
        base.body = over.body;
    }
    if over.url.is_some() {
        base.url = over.url;
    }
    if over.data.is_some() {
        base.data = over.data;
    }
    if over.label.is_some() {
        base.label = over.label;
    }
    for (key, value) in over.extra {
        base.extra.insert(key, value);
    }
    over.headers
}

/// Prefix a relative url with `host` and `api_path`, after all layering
///
/// A url already starting with `http` is passed through untouched, so the
/// prefix applies exactly once no matter how many layers touched the url.
pub fn resolve_url(config: &mut RequestConfig, host: &str, api_path: &str) {
    let url = config.url.get_or_insert_with(String::new);
    if !url.starts_with("http") {
        *url = format!("{host}{api_path}{url}");
    }
}
