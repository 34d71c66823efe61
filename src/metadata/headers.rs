//! Wire header names.
//!
//! Header names are matched case-insensitively by `http::HeaderMap`, so the
//! lowercase spelling here is also the canonical one on the wire.
//!
//! Values are read as bytes and decoded lossily, so a value carrying non-ASCII
//! (obs-text) bytes is still seen rather than treated as absent.

use std::borrow::Cow;

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};

/// Identity of the calling service.
pub const X_CALLER: &str = "x1-bmspy-user";
/// Canary / traffic-group tag.
pub const X_COLOR: &str = "x1-bmspy-color";
/// Remaining timeout budget in milliseconds.
pub const X_TIMEOUT: &str = "x1-bmspy-timeout";
/// Shadow traffic marker.
pub const X_MIRROR: &str = "x1-bmspy-mirror";
/// Real client IP, set by the trusted edge proxy.
pub const X_REMOTE_IP: &str = "x-backend-bm-real-ip";
/// Real client port, set by the trusted edge proxy.
pub const X_REMOTE_PORT: &str = "x-backend-bm-real-ipport";
/// Load-shedding priority.
pub const X_CRITICALITY: &str = "x-backend-bili-criticality";

/// Prefix for generic metadata attributes.
pub const X_METADATA_PREFIX: &str = "x-bili-metadata-";

/// Untrusted proxy chain, leftmost entry is the original client.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
/// Untrusted client address set by a single proxy hop.
pub const X_REAL_IP: &str = "x-real-ip";

/// Value the edge proxy writes when it could not determine an address.
pub const NULL_VALUE: &str = "null";

/// First value of `name`, or `""` when absent. Invalid UTF-8 is replaced
/// with U+FFFD.
pub(crate) fn get<'a>(headers: &'a HeaderMap, name: &str) -> Cow<'a, str> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .unwrap_or(Cow::Borrowed(""))
}

/// Replace any existing value of a well-known header.
pub(crate) fn set(
    headers: &mut HeaderMap,
    name: &'static str,
    value: &str,
) -> Result<(), InvalidHeaderValue> {
    let value = HeaderValue::from_str(value)?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}

/// Returns `None` for values the edge proxy uses to mean "unknown".
pub(crate) fn trusted(value: &str) -> Option<&str> {
    if value.is_empty() || value == NULL_VALUE {
        None
    } else {
        Some(value)
    }
}
