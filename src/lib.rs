//! Request metadata propagation over HTTP headers.
//!
//! Services in a call chain pass caller identity, canary color, mirror
//! marking, criticality and a decaying timeout budget to each other as HTTP
//! headers. The [`metadata`] module holds the codec; the rest of the crate
//! is a small relay service that decodes and echoes that metadata.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod metadata;
pub mod observability;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use metadata::{MetadataCodec, OutgoingMetadata, RequestMetadata};
