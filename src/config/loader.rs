//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the process identity.
pub const ENV_APP_ID: &str = "APP_ID";
/// Environment variable holding the default deployment color.
pub const ENV_DEPLOY_COLOR: &str = "DEPLOY_COLOR";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line. They take precedence over both the
/// file and the environment, and survive hot reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub app_id: Option<String>,
    pub default_color: Option<String>,
    pub bind_address: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(app_id) = &self.app_id {
            config.metadata.app_id = app_id.clone();
        }
        if let Some(color) = &self.default_color {
            config.metadata.default_color = color.clone();
        }
        if let Some(bind) = &self.bind_address {
            config.listener.bind_address = bind.clone();
        }
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    load_config_with(path, &Overrides::default())
}

/// Load a TOML file, then apply environment and command-line overrides, then
/// validate the result.
pub fn load_config_with(path: &Path, overrides: &Overrides) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RelayConfig = toml::from_str(&content)?;
    finalize(config, overrides)
}

/// Apply environment and command-line overrides to `config` and validate it.
pub fn finalize(
    mut config: RelayConfig,
    overrides: &Overrides,
) -> Result<RelayConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Override metadata identity from the environment. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(app_id) = lookup(ENV_APP_ID).filter(|v| !v.is_empty()) {
        config.metadata.app_id = app_id;
    }
    if let Some(color) = lookup(ENV_DEPLOY_COLOR).filter(|v| !v.is_empty()) {
        config.metadata.default_color = color;
    }
}
