//! Metadata decoding middleware.
//!
//! Decodes every incoming request into a `RequestMetadata` and stores it in
//! the request extensions, where handlers pick it up with
//! `Extension<RequestMetadata>`.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;

/// Raw peer address of the connection, `""` when the server was not started
/// with connect info.
pub fn peer_address<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default()
}

pub async fn metadata_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let inner = state.inner.load();
    let peer = peer_address(&req);
    let metadata = inner.codec.decode(req.headers(), &peer);

    tracing::debug!(
        caller = %metadata.caller,
        color = %metadata.color,
        mirror = metadata.mirror,
        timeout_ms = u64::try_from(metadata.timeout.as_millis()).unwrap_or(u64::MAX),
        criticality = %metadata.criticality,
        remote_ip = %metadata.remote_ip,
        remote_port = %metadata.remote_port,
        "Decoded request metadata"
    );

    req.extensions_mut().insert(metadata);
    next.run(req).await
}
