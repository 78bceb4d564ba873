//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::DappConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV_VAR: &str = "DAPP_CONFIG";

/// Default config file, used only if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "dapp.toml";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse configuration from a TOML string without validating it.
pub fn parse_config(content: &str) -> Result<DappConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DappConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the config file from `DAPP_CONFIG` (or `dapp.toml` if present),
/// falling back to defaults, then apply environment overrides and validate.
pub fn load_from_env() -> Result<DappConfig, ConfigError> {
    let explicit = std::env::var(CONFIG_PATH_ENV_VAR).ok();
    let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    if explicit.is_some() || Path::new(&path).exists() {
        tracing::info!(path = %path, "Loading configuration file");
        return load_config(Path::new(&path));
    }

    tracing::info!("No configuration file found, using defaults");
    let mut config = DappConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `DAPP_*` environment overrides.
///
/// Takes a lookup function so overrides can be exercised without touching the
/// process environment.
pub fn apply_env_overrides<F>(config: &mut DappConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(project_id) = lookup("DAPP_PROJECT_ID") {
        config.app.project_id = project_id;
    }
    if let Some(rpc_url) = lookup("DAPP_RPC_URL") {
        config.chain.rpc_url = rpc_url;
    }
    if let Some(bind) = lookup("DAPP_BIND_ADDRESS") {
        config.app.bind_address = bind;
    }
    if let Some(ext) = lookup("DAPP_WALLET_EXTENSION_URL") {
        config.wallet.extension_url = Some(ext);
    }
}
