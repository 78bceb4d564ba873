//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dApp.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dApp service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DappConfig {
    /// Application identity and HTTP listener.
    pub app: AppConfig,

    /// The two supported networks.
    pub networks: NetworksConfig,

    /// Chain client (JSON-RPC) settings.
    pub chain: ChainConfig,

    /// Injected wallet extension bridge.
    pub wallet: WalletConfig,

    /// Transfer limits.
    pub transfer: TransferConfig,

    /// Session staleness detection.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Application identity and listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display name reported by the status endpoint.
    pub name: String,

    /// Session provider project identifier. Required.
    pub project_id: String,

    /// Bind address for the HTTP API (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "XRPL EVM dApp".to_string(),
            project_id: String::new(),
            bind_address: "127.0.0.1:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Native currency metadata of a network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    fn xrp() -> Self {
        Self {
            name: "XRP".to_string(),
            symbol: "XRP".to_string(),
            decimals: 18,
        }
    }
}

/// Static metadata for one supported chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkDescriptor {
    /// EIP-155 chain id.
    pub chain_id: u64,

    /// Human readable name, also used as `chainName` when adding the chain.
    pub name: String,

    /// Whether this is the test network.
    pub testnet: bool,

    /// Native currency (symbol shown next to amounts).
    pub native_currency: NativeCurrency,

    /// Public JSON-RPC endpoints.
    pub rpc_urls: Vec<String>,

    /// Block explorer base URL (no trailing slash).
    pub explorer_url: String,
}

impl NetworkDescriptor {
    /// XRPL EVM mainnet.
    pub fn xrpl_evm_mainnet() -> Self {
        Self {
            chain_id: 1_440_000,
            name: "XRPL EVM Mainnet".to_string(),
            testnet: false,
            native_currency: NativeCurrency::xrp(),
            rpc_urls: vec!["https://rpc.xrplevm.org".to_string()],
            explorer_url: "https://explorer.xrplevm.org".to_string(),
        }
    }

    /// XRPL EVM testnet.
    pub fn xrpl_evm_testnet() -> Self {
        Self {
            chain_id: 1_449_000,
            name: "XRPL EVM Testnet".to_string(),
            testnet: true,
            native_currency: NativeCurrency::xrp(),
            rpc_urls: vec!["https://rpc.testnet.xrplevm.org".to_string()],
            explorer_url: "https://explorer.testnet.xrplevm.org".to_string(),
        }
    }
}

/// Registry entries for the supported networks.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworksConfig {
    pub mainnet: NetworkDescriptor,
    pub testnet: NetworkDescriptor,
}

impl Default for NetworksConfig {
    fn default() -> Self {
        Self {
            mainnet: NetworkDescriptor::xrpl_evm_mainnet(),
            testnet: NetworkDescriptor::xrpl_evm_testnet(),
        }
    }
}

/// Chain client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL. Defaults to the testnet RPC.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Interval between chain id probes while connected, in seconds.
    pub poll_interval_secs: u64,

    /// Base delay for reconnect backoff in milliseconds.
    pub reconnect_base_delay_ms: u64,

    /// Maximum delay for reconnect backoff in milliseconds.
    pub reconnect_max_delay_ms: u64,

    /// Consecutive failed probes before the client reports `disconnected`.
    pub disconnect_after_failures: u32,

    /// Maximum time to wait for a transfer receipt, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.testnet.xrplevm.org".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            poll_interval_secs: 5,
            reconnect_base_delay_ms: 500,
            reconnect_max_delay_ms: 10_000,
            disconnect_after_failures: 3,
            confirmation_timeout_secs: 120,
            receipt_poll_interval_ms: 2000,
        }
    }
}

/// Injected wallet extension configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// JSON-RPC endpoint accepting `wallet_switchEthereumChain` and
    /// `wallet_addEthereumChain`. When unset, switching always falls back to
    /// the provider's network selection view.
    pub extension_url: Option<String>,
}

/// Per-network transfer caps, in whole native units.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    pub testnet_max_amount: u64,
    pub mainnet_max_amount: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            testnet_max_amount: 1_000,
            mainnet_max_amount: 10_000,
        }
    }
}

/// Session staleness detection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long staleness must persist before forcing a disconnect.
    pub stale_grace_ms: u64,

    /// Minimum interval between two session re-validations.
    pub revalidate_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stale_grace_ms: 2000,
            revalidate_interval_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
