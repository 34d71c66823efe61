//! Timeout budget propagation.
//!
//! The remaining budget travels as whole milliseconds. Every hop assumes its
//! own handling eats `HOP_OVERHEAD_MS` of whatever budget it sees, so the
//! value decoded downstream shrinks along the call chain. Budgets at or below
//! the overhead are passed through untouched so they never go negative.

use std::time::Duration;

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::metadata::headers::{self, X_TIMEOUT};

/// Fixed per-hop overhead subtracted on decode.
pub const HOP_OVERHEAD_MS: i64 = 20;

/// Write `timeout` truncated to whole milliseconds.
pub fn set_timeout(headers: &mut HeaderMap, timeout: Duration) {
    let millis = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
    headers.insert(HeaderName::from_static(X_TIMEOUT), HeaderValue::from(millis));
}

/// Remaining budget after this hop's overhead. Missing or malformed values
/// decode to zero.
pub fn timeout(headers: &HeaderMap) -> Duration {
    let mut millis = headers::get(headers, X_TIMEOUT)
        .parse::<i64>()
        .unwrap_or(0);
    if millis > HOP_OVERHEAD_MS {
        millis -= HOP_OVERHEAD_MS;
    }
    Duration::from_millis(u64::try_from(millis).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(X_TIMEOUT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_set_timeout_truncates() {
        let mut headers = HeaderMap::new();
        set_timeout(&mut headers, Duration::from_micros(1_500_999));
        assert_eq!(headers.get(X_TIMEOUT).unwrap(), "1500");
    }

    #[test]
    fn test_set_timeout_zero() {
        let mut headers = HeaderMap::new();
        set_timeout(&mut headers, Duration::ZERO);
        assert_eq!(headers.get(X_TIMEOUT).unwrap(), "0");
    }

    #[test]
    fn test_decay() {
        assert_eq!(timeout(&with("100")), Duration::from_millis(80));
        assert_eq!(timeout(&with("21")), Duration::from_millis(1));
    }

    #[test]
    fn test_small_budget_not_decayed() {
        assert_eq!(timeout(&with("20")), Duration::from_millis(20));
        assert_eq!(timeout(&with("5")), Duration::from_millis(5));
        assert_eq!(timeout(&with("0")), Duration::ZERO);
    }

    #[test]
    fn test_missing_or_malformed_is_zero() {
        assert_eq!(timeout(&HeaderMap::new()), Duration::ZERO);
        assert_eq!(timeout(&with("abc")), Duration::ZERO);
        assert_eq!(timeout(&with("12.5")), Duration::ZERO);
        assert_eq!(timeout(&with("")), Duration::ZERO);
    }

    #[test]
    fn test_negative_is_zero() {
        assert_eq!(timeout(&with("-500")), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_decode_of_encode_decays_once(micros in 0u64..10_000_000_000) {
            let d = Duration::from_micros(micros);
            let mut headers = HeaderMap::new();
            set_timeout(&mut headers, d);

            let floor_ms = micros / 1000;
            let expected = if floor_ms > 20 { floor_ms - 20 } else { floor_ms };
            prop_assert_eq!(timeout(&headers), Duration::from_millis(expected));
        }
    }
}
