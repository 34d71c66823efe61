//! Generic metadata attributes.
//!
//! Arbitrary attributes travel as `x-bili-metadata-<key>` with every `_` in
//! the key mapped to `-`. Only string values are representable on the wire;
//! anything else is dropped without error.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::metadata::headers::{X_COLOR, X_CRITICALITY, X_METADATA_PREFIX, X_MIRROR};

/// Metadata keys that have a dedicated header instead of the generic prefix.
pub const KEY_COLOR: &str = "color";
pub const KEY_CRITICALITY: &str = "criticality";
pub const KEY_MIRROR: &str = "mirror";

/// Wire header name for a generic attribute key.
pub fn header_name(key: &str) -> String {
    format!("{}{}", X_METADATA_PREFIX, key.replace('_', "-"))
}

/// Dedicated header for a well-known metadata key, if it has one.
pub fn outgoing_header(key: &str) -> Option<&'static str> {
    match key {
        KEY_COLOR => Some(X_COLOR),
        KEY_CRITICALITY => Some(X_CRITICALITY),
        KEY_MIRROR => Some(X_MIRROR),
        _ => None,
    }
}

/// Write a generic attribute. Returns whether a header was written.
///
/// Non-string values, and keys or values that cannot form a valid header,
/// are not written. An existing value for the same header is replaced.
pub fn set_extension(headers: &mut HeaderMap, key: &str, value: &Value) -> bool {
    let Value::String(value) = value else {
        return false;
    };
    write(headers, &header_name(key), value)
}

/// Write `value` under an arbitrary header name, replacing existing values.
pub(crate) fn write(headers: &mut HeaderMap, name: &str, value: &str) -> bool {
    let Ok(name) = HeaderName::try_from(name) else {
        return false;
    };
    let Ok(value) = HeaderValue::from_str(value) else {
        return false;
    };
    headers.insert(name, value);
    true
}
