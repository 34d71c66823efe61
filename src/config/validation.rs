//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check that metadata values can be written as HTTP header values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("metadata.{field} {value:?} is not a valid header value")]
    InvalidHeaderValue { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for (field, value) in [
        ("app_id", &config.metadata.app_id),
        ("default_color", &config.metadata.default_color),
    ] {
        if HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::InvalidHeaderValue {
                field,
                value: value.clone(),
            });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
