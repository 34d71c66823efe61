//! Accessors for the well-known metadata headers.
//!
//! Getters never fail. Each one returns a best-effort value and falls back to
//! a harmless default (empty caller, default color, not mirrored,
//! unspecified criticality).

use axum::http::header::{HeaderMap, InvalidHeaderValue};

use crate::metadata::criticality::Criticality;
use crate::metadata::diagnostics::DiagnosticSink;
use crate::metadata::headers::{self, X_CALLER, X_COLOR, X_CRITICALITY, X_MIRROR};

/// Write the caller identity (normally this process's app id).
pub fn set_caller(headers: &mut HeaderMap, app_id: &str) -> Result<(), InvalidHeaderValue> {
    headers::set(headers, X_CALLER, app_id)
}

/// Caller identity, `""` if absent.
pub fn caller(headers: &HeaderMap) -> String {
    headers::get(headers, X_CALLER).to_string()
}

pub fn set_color(headers: &mut HeaderMap, color: &str) -> Result<(), InvalidHeaderValue> {
    headers::set(headers, X_COLOR, color)
}

/// Color from the header, or `default_color` when the header is empty.
pub fn color(headers: &HeaderMap, default_color: &str) -> String {
    let c = headers::get(headers, X_COLOR);
    if c.is_empty() {
        default_color.to_string()
    } else {
        c.into_owned()
    }
}

/// Whether the request is mirrored (shadow) traffic.
///
/// An absent header is `false` without a warning. A value that does not
/// parse, or that parses to `false`, is also `false` but is reported to
/// `sink`: upstream only sets the header on mirrored traffic.
pub fn mirror(headers: &HeaderMap, sink: &dyn DiagnosticSink) -> bool {
    let raw = headers::get(headers, X_MIRROR);
    if raw.is_empty() {
        return false;
    }
    match parse_bool(&raw) {
        Some(true) => true,
        Some(false) => {
            sink.warn(&format!("request mirror value {raw:?} is false"));
            false
        }
        None => {
            sink.warn(&format!("failed to parse mirror value {raw:?}"));
            false
        }
    }
}

/// Criticality from the header, `Unspecified` when absent or unknown.
pub fn criticality(headers: &HeaderMap) -> Criticality {
    Criticality::parse(&headers::get(headers, X_CRITICALITY))
}

/// Boolean literals accepted on the wire.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::diagnostics::MemorySink;
    use axum::http::HeaderValue;

    fn with(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_caller() {
        let mut headers = HeaderMap::new();
        assert_eq!(caller(&headers), "");

        set_caller(&mut headers, "main.account.service").unwrap();
        assert_eq!(caller(&headers), "main.account.service");
        assert_eq!(headers.get("x1-bmspy-user").unwrap(), "main.account.service");
    }

    #[test]
    fn test_color_falls_back_to_default() {
        assert_eq!(color(&HeaderMap::new(), "red"), "red");
        assert_eq!(color(&with(X_COLOR, ""), "red"), "red");
        assert_eq!(color(&with(X_COLOR, "blue"), "red"), "blue");
    }

    #[test]
    fn test_color_with_non_ascii_bytes_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(X_COLOR, HeaderValue::from_bytes("grün".as_bytes()).unwrap());
        assert_eq!(color(&headers, "red"), "grün");

        headers.insert(X_COLOR, HeaderValue::from_bytes(b"blue\xff").unwrap());
        assert_eq!(color(&headers, "red"), "blue\u{fffd}");
    }

    #[test]
    fn test_set_color_overwrites() {
        let mut headers = with(X_COLOR, "blue");
        set_color(&mut headers, "canary").unwrap();
        assert_eq!(color(&headers, ""), "canary");
        assert_eq!(headers.get_all(X_COLOR).iter().count(), 1);
    }

    #[test]
    fn test_set_color_rejects_invalid_value() {
        let mut headers = HeaderMap::new();
        assert!(set_color(&mut headers, "bad\nvalue").is_err());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_mirror_true() {
        for value in ["true", "1", "T", "TRUE"] {
            let sink = MemorySink::new();
            assert!(mirror(&with(X_MIRROR, value), &sink), "{value}");
            assert!(sink.is_empty());
        }
    }

    #[test]
    fn test_mirror_false_warns() {
        for value in ["false", "0"] {
            let sink = MemorySink::new();
            assert!(!mirror(&with(X_MIRROR, value), &sink));
            assert_eq!(sink.messages().len(), 1);
        }
    }

    #[test]
    fn test_mirror_invalid_warns() {
        let sink = MemorySink::new();
        assert!(!mirror(&with(X_MIRROR, "not-a-bool"), &sink));
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("not-a-bool"));
    }

    #[test]
    fn test_mirror_missing_is_silent() {
        let sink = MemorySink::new();
        assert!(!mirror(&HeaderMap::new(), &sink));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_criticality() {
        assert_eq!(criticality(&HeaderMap::new()), Criticality::Unspecified);
        assert_eq!(
            criticality(&with(X_CRITICALITY, "SHEDDABLE")),
            Criticality::Sheddable
        );
        assert_eq!(
            criticality(&with(X_CRITICALITY, "bogus")),
            Criticality::Unspecified
        );
    }
}
