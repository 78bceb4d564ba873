//! Chain connection monitor.
//!
//! Probes `eth_chainId` on a fixed interval and publishes the result as the
//! chain client's [`ClientState`]. Failed probes back off exponentially; after
//! `disconnect_after_failures` in a row the client reports itself
//! disconnected.

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

use crate::blockchain::client::BlockchainClient;
use crate::config::ChainConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::session::signal::{ClientState, ConnectionSignal, ConnectionStatus};

/// Pure state machine behind the monitor loop.
#[derive(Debug, Clone)]
pub struct ProbeTracker {
    address: Address,
    failures: u32,
    disconnect_after: u32,
    ever_connected: bool,
}

impl ProbeTracker {
    pub fn new(address: Address, disconnect_after: u32) -> Self {
        Self {
            address,
            failures: 0,
            disconnect_after: disconnect_after.max(1),
            ever_connected: false,
        }
    }

    /// State published before the first probe completes.
    pub fn initial(&self) -> ClientState {
        ClientState {
            signal: ConnectionSignal::transitioning(Some(self.address), ConnectionStatus::Connecting),
            chain_id: None,
        }
    }

    pub fn on_success(&mut self, chain_id: u64) -> ClientState {
        self.failures = 0;
        self.ever_connected = true;
        ClientState {
            signal: ConnectionSignal::connected(self.address),
            chain_id: Some(chain_id),
        }
    }

    /// `previous` keeps the last chain id visible while reconnecting.
    pub fn on_failure(&mut self, previous: &ClientState) -> ClientState {
        self.failures = self.failures.saturating_add(1);

        if self.failures >= self.disconnect_after {
            return ClientState::default();
        }

        let status = if self.ever_connected {
            ConnectionStatus::Reconnecting
        } else {
            ConnectionStatus::Connecting
        };
        ClientState {
            signal: ConnectionSignal::transitioning(Some(self.address), status),
            chain_id: previous.chain_id,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

/// Background task keeping the chain client's state current.
pub struct ConnectionMonitor {
    client: BlockchainClient,
    state: Arc<watch::Sender<ClientState>>,
    tracker: ProbeTracker,
    poll_interval: Duration,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl ConnectionMonitor {
    pub fn new(
        client: BlockchainClient,
        state: Arc<watch::Sender<ClientState>>,
        address: Address,
        config: &ChainConfig,
    ) -> Self {
        Self {
            client,
            state,
            tracker: ProbeTracker::new(address, config.disconnect_after_failures),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            base_delay_ms: config.reconnect_base_delay_ms,
            max_delay_ms: config.reconnect_max_delay_ms,
        }
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let initial = self.tracker.initial();
        self.state.send_replace(initial);

        loop {
            let delay = match self.client.get_chain_id().await {
                Ok(chain_id) => {
                    let next = self.tracker.on_success(chain_id);
                    self.publish(next);
                    self.poll_interval
                }
                Err(e) => {
                    let previous = self.state.borrow().clone();
                    let next = self.tracker.on_failure(&previous);
                    tracing::warn!(
                        failures = self.tracker.failures(),
                        error = %e,
                        "Chain probe failed"
                    );
                    self.publish(next);
                    calculate_backoff(self.tracker.failures(), self.base_delay_ms, self.max_delay_ms)
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.recv() => {
                    tracing::debug!("Connection monitor stopping");
                    break;
                }
            }
        }
    }

    fn publish(&self, next: ClientState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next.clone();
            true
        });

        if changed {
            metrics::record_chain_connected(next.signal.is_connected);
            tracing::info!(
                status = ?next.signal.status,
                chain_id = ?next.chain_id,
                "Chain client state changed"
            );
        }
    }
}
