//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the network registry is unambiguous (distinct chain ids, one testnet)
//! - Validate value ranges (timeouts > 0, caps > 0, URLs parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DappConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{DappConfig, NetworkDescriptor};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `networks.mainnet.chain_id`).
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DappConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.app.project_id.trim().is_empty() {
        errors.push(ValidationError::new(
            "app.project_id",
            "project id is not defined (set DAPP_PROJECT_ID)",
        ));
    }
    if config.app.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new("app.bind_address", "not a socket address"));
    }
    if config.app.request_timeout_secs == 0 {
        errors.push(ValidationError::new("app.request_timeout_secs", "must be > 0"));
    }

    validate_network("networks.mainnet", &config.networks.mainnet, false, &mut errors);
    validate_network("networks.testnet", &config.networks.testnet, true, &mut errors);
    if config.networks.mainnet.chain_id == config.networks.testnet.chain_id {
        errors.push(ValidationError::new(
            "networks",
            format!(
                "mainnet and testnet share chain id {}",
                config.networks.mainnet.chain_id
            ),
        ));
    }

    if url::Url::parse(&config.chain.rpc_url).is_err() {
        errors.push(ValidationError::new("chain.rpc_url", "invalid URL"));
    }
    for (i, u) in config.chain.failover_urls.iter().enumerate() {
        if url::Url::parse(u).is_err() {
            errors.push(ValidationError::new(
                format!("chain.failover_urls[{}]", i),
                "invalid URL",
            ));
        }
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be > 0"));
    }
    if config.chain.poll_interval_secs == 0 {
        errors.push(ValidationError::new("chain.poll_interval_secs", "must be > 0"));
    }
    if config.chain.disconnect_after_failures == 0 {
        errors.push(ValidationError::new(
            "chain.disconnect_after_failures",
            "must be > 0",
        ));
    }
    if config.chain.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "chain.receipt_poll_interval_ms",
            "must be > 0",
        ));
    }

    if let Some(ext) = &config.wallet.extension_url {
        if url::Url::parse(ext).is_err() {
            errors.push(ValidationError::new("wallet.extension_url", "invalid URL"));
        }
    }

    if config.transfer.testnet_max_amount == 0 {
        errors.push(ValidationError::new("transfer.testnet_max_amount", "must be > 0"));
    }
    if config.transfer.mainnet_max_amount == 0 {
        errors.push(ValidationError::new("transfer.mainnet_max_amount", "must be > 0"));
    }

    if config.session.revalidate_interval_secs == 0 {
        errors.push(ValidationError::new(
            "session.revalidate_interval_secs",
            "must be > 0",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(
    prefix: &str,
    network: &NetworkDescriptor,
    expect_testnet: bool,
    errors: &mut Vec<ValidationError>,
) {
    if network.chain_id == 0 {
        errors.push(ValidationError::new(format!("{}.chain_id", prefix), "must be > 0"));
    }
    if network.name.trim().is_empty() {
        errors.push(ValidationError::new(format!("{}.name", prefix), "must not be empty"));
    }
    if network.testnet != expect_testnet {
        errors.push(ValidationError::new(
            format!("{}.testnet", prefix),
            format!("must be {}", expect_testnet),
        ));
    }
    if network.native_currency.symbol.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{}.native_currency.symbol", prefix),
            "must not be empty",
        ));
    }
    if network.native_currency.decimals != 18 {
        errors.push(ValidationError::new(
            format!("{}.native_currency.decimals", prefix),
            "only 18 decimals are supported",
        ));
    }
    if network.rpc_urls.is_empty() {
        errors.push(ValidationError::new(
            format!("{}.rpc_urls", prefix),
            "at least one RPC URL is required",
        ));
    }
    for (i, u) in network.rpc_urls.iter().enumerate() {
        if url::Url::parse(u).is_err() {
            errors.push(ValidationError::new(
                format!("{}.rpc_urls[{}]", prefix, i),
                "invalid URL",
            ));
        }
    }
    if url::Url::parse(&network.explorer_url).is_err() {
        errors.push(ValidationError::new(
            format!("{}.explorer_url", prefix),
            "invalid URL",
        ));
    }
}
