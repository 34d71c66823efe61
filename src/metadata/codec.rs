//! Metadata codec facade.
//!
//! # Responsibilities
//! - Encode outgoing metadata into the headers of a downstream request
//! - Decode incoming headers into a `RequestMetadata`
//! - Carry decoded metadata forward to the next hop
//!
//! # Design Decisions
//! - Process identity and default color come from an injected `MetadataConfig`
//! - Warnings go through an injected `DiagnosticSink`
//! - Stateless: the same codec serves any number of concurrent requests

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::HeaderMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::config::MetadataConfig;
use crate::metadata::accessors;
use crate::metadata::criticality::Criticality;
use crate::metadata::diagnostics::{DiagnosticSink, TracingSink};
use crate::metadata::extension::{self, KEY_CRITICALITY, KEY_MIRROR};
use crate::metadata::remote;
use crate::metadata::timeout;

/// Metadata recovered from an incoming request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestMetadata {
    pub caller: String,
    pub color: String,
    pub mirror: bool,
    #[serde(rename = "timeout_ms", serialize_with = "serialize_millis")]
    pub timeout: Duration,
    pub criticality: Criticality,
    pub remote_ip: String,
    pub remote_port: String,
}

impl RequestMetadata {
    /// Metadata to send to the next hop on behalf of this request.
    ///
    /// Color, remaining budget, criticality and the mirror flag carry over.
    /// The caller is not copied; the encoding hop always writes its own
    /// identity.
    pub fn to_outgoing(&self) -> OutgoingMetadata {
        let mut outgoing = OutgoingMetadata::new()
            .with_color(self.color.clone())
            .with_timeout(self.timeout);
        if self.criticality.is_specified() {
            outgoing = outgoing.with_extension(KEY_CRITICALITY, self.criticality.as_str());
        }
        if self.mirror {
            outgoing = outgoing.with_extension(KEY_MIRROR, true);
        }
        outgoing
    }
}

fn serialize_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Metadata to attach to an outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingMetadata {
    /// Explicit color. When `None` no color header is written and the
    /// downstream falls back to its own default.
    pub color: Option<String>,
    pub timeout: Option<Duration>,
    pub extensions: BTreeMap<String, Value>,
}

impl OutgoingMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }
}

/// Encodes and decodes request metadata headers.
#[derive(Debug, Clone)]
pub struct MetadataCodec {
    config: MetadataConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl MetadataCodec {
    /// Codec that reports warnings through `tracing`.
    pub fn new(config: MetadataConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    pub fn with_sink(config: MetadataConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Write `outgoing` into `headers`.
    ///
    /// Extensions are written first so that the explicit caller, color and
    /// timeout always win. Returns the number of extensions written.
    pub fn encode(&self, headers: &mut HeaderMap, outgoing: &OutgoingMetadata) -> usize {
        let mut written = 0;
        for (key, value) in &outgoing.extensions {
            let dedicated = extension::outgoing_header(key);
            let text = match (dedicated, value) {
                (_, Value::String(s)) => s.clone(),
                (Some(_), Value::Bool(b)) => b.to_string(),
                // Not representable on the wire; dropped without a warning.
                _ => continue,
            };
            let ok = match dedicated {
                Some(name) => extension::write(headers, name, &text),
                None => extension::set_extension(headers, key, value),
            };
            if ok {
                written += 1;
            } else {
                self.sink
                    .warn(&format!("dropping metadata {key:?}: {text:?} is not a valid header"));
            }
        }

        if let Err(e) = accessors::set_caller(headers, &self.config.app_id) {
            self.sink.warn(&format!("dropping caller {:?}: {}", self.config.app_id, e));
        }
        if let Some(color) = outgoing.color.as_deref().filter(|c| !c.is_empty()) {
            if let Err(e) = accessors::set_color(headers, color) {
                self.sink.warn(&format!("dropping color {:?}: {}", color, e));
            }
        }
        if let Some(budget) = outgoing.timeout {
            timeout::set_timeout(headers, budget);
        }
        written
    }

    /// Decode the metadata of an incoming request. `peer` is the raw
    /// transport address of the connection.
    pub fn decode(&self, headers: &HeaderMap, peer: &str) -> RequestMetadata {
        RequestMetadata {
            caller: accessors::caller(headers),
            color: accessors::color(headers, &self.config.default_color),
            mirror: accessors::mirror(headers, self.sink.as_ref()),
            timeout: timeout::timeout(headers),
            criticality: accessors::criticality(headers),
            remote_ip: remote::remote_ip(headers, peer),
            remote_port: remote::remote_port(headers),
        }
    }
}
