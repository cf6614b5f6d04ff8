//! Safe accessors over loosely-typed upstream payloads.
//!
//! Upstream records are [`serde_json::Value`] trees in which any node may be
//! missing, null, or of an unexpected type. Every helper here takes and
//! returns `Option<&Value>`, with `None` as the single "absent" marker, so
//! lookups compose with `?`-free chaining and never fail.

use serde_json::Value;

/// Look up `key` in `value` if `value` is a JSON object.
///
/// Returns `None` when `value` is absent, not an object, lacks the key, or
/// the key maps to `null`.
pub fn get_map_field<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    value?.as_object()?.get(key).filter(|v| !v.is_null())
}

/// First element of `value` if `value` is a non-empty JSON array.
///
/// A leading `null` element counts as absent.
pub fn get_first_of_list(value: Option<&Value>) -> Option<&Value> {
    value?.as_array()?.first().filter(|v| !v.is_null())
}

/// Borrow `value` as a non-empty string.
///
/// Empty strings and non-string values are treated as absent.
pub fn truthy_str(value: Option<&Value>) -> Option<&str> {
    value?.as_str().filter(|s| !s.is_empty())
}

/// Follow a path of object keys from `value`.
pub fn get_path<'a>(value: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value?, |node, key| get_map_field(Some(node), key))
}

/// Resolve `path` to a non-empty string, or `""`.
pub fn string_at(value: Option<&Value>, path: &[&str]) -> String {
    truthy_str(get_path(value, path))
        .map(str::to_owned)
        .unwrap_or_default()
}
