use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{FetchError, Result};

/// Follows a dot-separated path through a JSON tree.
///
/// Object segments are keys, array segments must parse as `usize`.
/// Empty segments are ignored, so `""` returns `value` itself.
///
/// ```rust
/// use serde_json::json;
/// use resilient_get::json::lookup;
///
/// let ticker = json!({ "quotes": { "USD": { "price": 64000.5 } } });
/// assert_eq!(lookup(&ticker, "quotes.USD.price"), Some(&json!(64000.5)));
/// assert_eq!(lookup(&ticker, "quotes.EUR"), None);
/// ```
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Returns the paths from `required` that do not resolve in `value`,
/// in the order given.
pub fn missing_fields(value: &Value, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|path| lookup(value, path).is_none())
        .map(|path| (*path).to_owned())
        .collect()
}

/// Deserializes a decoded body into `D`; a mismatch is a decode failure.
pub(crate) fn decode<D: DeserializeOwned>(value: Value) -> Result<D> {
    serde_json::from_value(value)
        .map_err(|err| FetchError::Decode(format!("unexpected response shape: {err}")))
}
