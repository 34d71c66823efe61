use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::HeaderMap,
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::propagate::propagate;
use crate::http::server::AppState;
use crate::metadata::RequestMetadata;

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub app_id: String,
}

/// Decoded metadata of the request plus the headers a downstream call
/// would carry.
#[derive(Serialize)]
pub struct InspectResponse {
    pub request_id: String,
    pub metadata: RequestMetadata,
    pub propagated: BTreeMap<String, String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let inner = state.inner.load();
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        app_id: inner.config.metadata.app_id.clone(),
    })
}

pub async fn inspect(
    State(state): State<AppState>,
    Extension(metadata): Extension<RequestMetadata>,
    headers: HeaderMap,
) -> Json<InspectResponse> {
    let inner = state.inner.load();
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let propagated = propagate(&inner.codec, &metadata, std::iter::empty::<(&str, Value)>())
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    Json(InspectResponse {
        request_id,
        metadata,
        propagated,
    })
}
