//! HTTP surface of the metadata relay.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, trace span, timeout)
//!     → middleware.rs (decode RequestMetadata into request extensions)
//!     → handlers.rs (health, inspect)
//!         → propagate.rs (headers a downstream call would carry)
//! ```

pub mod handlers;
pub mod middleware;
pub mod propagate;
pub mod server;

pub use middleware::{metadata_middleware, peer_address};
pub use propagate::propagate;
pub use server::{AppState, HttpServer, InnerState};
