//! Bracket-notation flattening and form encoding
//!
//! Nested payloads flatten to `parent[child]=value` pairs: objects recurse
//! by key, arrays by index. The same pairs feed the query string of a GET
//! and the form body of an urlencoded write.

use serde_json::Value;

use crate::error::BodyError;

/// Flatten a payload into ordered `(key, value)` pairs
///
/// Scalars render their bare text: strings without quotes, `null` as the
/// empty string. A non-object root flattens to nothing.
pub fn flatten_pairs(data: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = data {
        for (key, value) in map {
            flatten_into(&mut pairs, key.clone(), value);
        }
    }
    pairs
}

fn flatten_into(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (name, nested) in map {
                flatten_into(pairs, format!("{key}[{name}]"), nested);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_into(pairs, format!("{key}[{index}]"), nested);
            }
        }
        Value::Null => pairs.push((key, String::new())),
        Value::String(text) => pairs.push((key, text.clone())),
        other => pairs.push((key, other.to_string())),
    }
}

/// Percent-encode flattened pairs as `a=1&b=2`
///
/// Bracket characters in keys are percent-encoded along with everything
/// else. An empty slice encodes to an empty string.
pub fn encode_pairs(pairs: &[(String, String)]) -> Result<String, BodyError> {
    Ok(serde_urlencoded::to_string(pairs)?)
}

/// Flatten and encode in one step
pub fn to_urlencoded(data: &Value) -> Result<String, BodyError> {
    encode_pairs(&flatten_pairs(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pairs(data: Value) -> Vec<(String, String)> {
        flatten_pairs(&data)
    }

    #[test]
    fn test_flat_object() {
        assert_eq!(
            pairs(json!({"a": 1, "b": "two"})),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_objects_use_bracket_paths() {
        assert_eq!(
            pairs(json!({"filter": {"age": {"min": 18}}})),
            vec![("filter[age][min]".to_string(), "18".to_string())]
        );
    }

    #[test]
    fn test_arrays_index_by_position() {
        assert_eq!(
            pairs(json!({"ids": [3, 5], "tags": ["a"]})),
            vec![
                ("ids[0]".to_string(), "3".to_string()),
                ("ids[1]".to_string(), "5".to_string()),
                ("tags[0]".to_string(), "a".to_string()),
            ]
        );
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(
            pairs(json!({"n": 2.5, "s": "x", "t": true, "z": null})),
            vec![
                ("n".to_string(), "2.5".to_string()),
                ("s".to_string(), "x".to_string()),
                ("t".to_string(), "true".to_string()),
                ("z".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_non_object_root_flattens_to_nothing() {
        assert_eq!(pairs(json!("bare")), vec![]);
        assert_eq!(pairs(json!([1, 2])), vec![]);
        assert_eq!(pairs(json!(null)), vec![]);
    }

    #[test]
    fn test_encoding_escapes_brackets_and_reserved_chars() {
        let encoded = to_urlencoded(&json!({"page": {"size": 10}, "q": "a&b"})).unwrap();
        assert_eq!(encoded, "page%5Bsize%5D=10&q=a%26b");
    }

    #[test]
    fn test_empty_object_encodes_to_empty_string() {
        assert_eq!(to_urlencoded(&json!({})).unwrap(), "");
    }
}
