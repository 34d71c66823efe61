//! Real client address resolution behind proxies.
//!
//! # Resolution order (first hit wins)
//! 1. `x-backend-bm-real-ip`, written by the trusted edge proxy
//! 2. `X-Forwarded-For`, leftmost entry of a multi-hop chain
//! 3. `X-Real-IP`
//! 4. The connection's peer address without its port
//!
//! `X-Forwarded-For` comes before `X-Real-IP` because nginx fills
//! `X-Real-IP` with the proxy's own address. A single-entry
//! `X-Forwarded-For` is ignored and resolution moves on to `X-Real-IP`.

use std::net::SocketAddr;

use axum::http::header::HeaderMap;

use crate::metadata::headers::{self, X_FORWARDED_FOR, X_REAL_IP, X_REMOTE_IP, X_REMOTE_PORT};

/// Best-effort client IP. `peer` is the raw transport address, usually
/// `host:port`.
pub fn remote_ip(headers: &HeaderMap, peer: &str) -> String {
    if let Some(ip) = headers::trusted(&headers::get(headers, X_REMOTE_IP)) {
        return ip.to_string();
    }

    let xff = headers::get(headers, X_FORWARDED_FOR);
    if let Some((first, _)) = xff.split_once(',') {
        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    let real_ip = headers::get(headers, X_REAL_IP);
    if real_ip.is_empty() {
        peer_host(peer)
    } else {
        real_ip.into_owned()
    }
}

/// Client port from the trusted edge proxy, `""` when unknown.
pub fn remote_port(headers: &HeaderMap) -> String {
    headers::trusted(&headers::get(headers, X_REMOTE_PORT))
        .unwrap_or_default()
        .to_string()
}

/// Host part of a peer address.
///
/// Well-formed socket addresses (including bracketed IPv6) go through
/// `SocketAddr`. Anything else keeps the legacy rule of cutting at the
/// first colon.
fn peer_host(peer: &str) -> String {
    if let Ok(addr) = peer.parse::<SocketAddr>() {
        return addr.ip().to_string();
    }
    match peer.split_once(':') {
        Some((host, _)) => host.to_string(),
        None => peer.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn test_precedence() {
        let mut h = headers(&[
            (X_REMOTE_IP, "10.0.0.1"),
            (X_FORWARDED_FOR, "10.0.0.2, 172.16.0.1"),
            (X_REAL_IP, "10.0.0.3"),
        ]);
        let peer = "10.0.0.4:5555";
        assert_eq!(remote_ip(&h, peer), "10.0.0.1");

        h.remove(X_REMOTE_IP);
        assert_eq!(remote_ip(&h, peer), "10.0.0.2");

        h.remove(X_FORWARDED_FOR);
        assert_eq!(remote_ip(&h, peer), "10.0.0.3");

        h.remove(X_REAL_IP);
        assert_eq!(remote_ip(&h, peer), "10.0.0.4");
    }

    #[test]
    fn test_forwarded_for_takes_leftmost() {
        let h = headers(&[(X_FORWARDED_FOR, "1.2.3.4, 5.6.6.7")]);
        assert_eq!(remote_ip(&h, "9.9.9.9:80"), "1.2.3.4");
    }

    #[test]
    fn test_forwarded_for_without_comma_is_skipped() {
        let h = headers(&[(X_FORWARDED_FOR, "1.2.3.4"), (X_REAL_IP, "8.8.8.8")]);
        assert_eq!(remote_ip(&h, "9.9.9.9:80"), "8.8.8.8");
    }

    #[test]
    fn test_forwarded_for_empty_first_entry_is_skipped() {
        let h = headers(&[(X_FORWARDED_FOR, " , 5.6.6.7")]);
        assert_eq!(remote_ip(&h, "9.9.9.9:80"), "9.9.9.9");
    }

    #[test]
    fn test_trusted_null_is_absent() {
        let h = headers(&[(X_REMOTE_IP, "null"), (X_REAL_IP, "8.8.8.8")]);
        assert_eq!(remote_ip(&h, "9.9.9.9:80"), "8.8.8.8");
    }

    #[test]
    fn test_peer_fallback() {
        let h = HeaderMap::new();
        assert_eq!(remote_ip(&h, "192.168.1.7:43210"), "192.168.1.7");
        assert_eq!(remote_ip(&h, "[2001:db8::1]:443"), "2001:db8::1");
        assert_eq!(remote_ip(&h, "unix-socket"), "unix-socket");
        assert_eq!(remote_ip(&h, ""), "");
    }

    #[test]
    fn test_remote_port() {
        assert_eq!(remote_port(&HeaderMap::new()), "");
        assert_eq!(remote_port(&headers(&[(X_REMOTE_PORT, "null")])), "");
        assert_eq!(remote_port(&headers(&[(X_REMOTE_PORT, "51234")])), "51234");
    }
}
