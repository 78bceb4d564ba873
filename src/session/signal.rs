//! Connection signals reported by the session provider and the chain client.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Lifecycle of one reporting source's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    #[default]
    Disconnected,
    Reconnecting,
}

/// `{address, isConnected, status}` as reported by one source.
///
/// Two instances exist at runtime (session provider, chain client). They are
/// expected to converge but may disagree transiently during reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConnectionSignal {
    pub address: Option<Address>,
    pub is_connected: bool,
    pub status: ConnectionStatus,
}

impl ConnectionSignal {
    pub fn connected(address: Address) -> Self {
        Self {
            address: Some(address),
            is_connected: true,
            status: ConnectionStatus::Connected,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// A source that is (re)establishing its connection. The last known
    /// address is kept so the UI does not flicker.
    pub fn transitioning(address: Option<Address>, status: ConnectionStatus) -> Self {
        Self {
            address,
            is_connected: false,
            status,
        }
    }
}

/// Provider `{initialized, loading}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderReadiness {
    pub initialized: bool,
    pub loading: bool,
}

impl ProviderReadiness {
    pub fn ready() -> Self {
        Self {
            initialized: true,
            loading: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.initialized && !self.loading
    }
}

/// Everything the session provider publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderState {
    pub signal: ConnectionSignal,
    pub readiness: ProviderReadiness,
}

/// Everything the chain client publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClientState {
    pub signal: ConnectionSignal,
    /// Chain id last reported by the RPC, if any probe has succeeded.
    pub chain_id: Option<u64>,
}
