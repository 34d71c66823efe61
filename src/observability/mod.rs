//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!
//! Consumers:
//!     → stdout (fmt layer)
//! ```
//!
//! # Design Decisions
//! - Structured fields (request_id, caller, color) rather than formatted text
//! - Request ID flows through all log lines of a request via the trace span

pub mod logging;
