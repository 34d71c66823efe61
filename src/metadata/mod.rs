//! Request metadata propagation over HTTP headers.
//!
//! # Data Flow
//! ```text
//! Outgoing request (caller side):
//!     OutgoingMetadata
//!     → codec.rs (facade)
//!         → accessors.rs (caller, color)
//!         → timeout.rs (budget in ms)
//!         → extension.rs (x-bili-metadata-* attributes)
//!     → HeaderMap of the downstream request
//!
//! Incoming request (callee side):
//!     HeaderMap + peer address
//!     → codec.rs (facade)
//!         → accessors.rs (caller, color, mirror, criticality)
//!         → timeout.rs (budget minus per-hop overhead)
//!         → remote.rs (real client ip/port)
//!     → RequestMetadata
//! ```
//!
//! # Design Decisions
//! - Decoding never fails; every attribute has a harmless default
//! - Process identity and default color are injected, never global
//! - Anomalies that are not errors are reported through a `DiagnosticSink`
//! - No state is kept between requests

pub mod accessors;
pub mod codec;
pub mod criticality;
pub mod diagnostics;
pub mod extension;
pub mod headers;
pub mod remote;
pub mod timeout;

pub use codec::{MetadataCodec, OutgoingMetadata, RequestMetadata};
pub use criticality::Criticality;
pub use diagnostics::{DiagnosticSink, MemorySink, TracingSink};
