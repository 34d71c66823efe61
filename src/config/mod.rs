//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, APP_ID / DEPLOY_COLOR overrides)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to the HTTP server and metadata codec
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the server state
//!     → new requests decode with the new identity/default color
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{finalize, load_config, load_config_with, ConfigError, Overrides};
pub use schema::{ListenerConfig, MetadataConfig, ObservabilityConfig, RelayConfig, TimeoutConfig};
pub use watcher::ConfigWatcher;
