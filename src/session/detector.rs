//! Session staleness detection.
//!
//! # Responsibilities
//! - Derive staleness and address mismatch from the two connection signals
//! - Force a provider disconnect once staleness outlives the grace window
//! - Offer a throttled `validate_session` gate for callers
//!
//! # Design Decisions
//! - Assessment is a pure function of the two signals, recomputed on demand
//! - The debounce timer is a `sleep_until` inside the detector's select loop;
//!   clearing the condition drops the deadline, which is the cancellation
//! - One forced disconnect per stale episode; a clear re-arms

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::Address;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use crate::config::SessionConfig;
use crate::observability::metrics;
use crate::session::provider::SessionProvider;
use crate::session::signal::{ClientState, ConnectionSignal, ConnectionStatus, ProviderState};

/// Provider says connected while the chain client has fully dropped.
pub fn is_stale(provider: &ConnectionSignal, client: &ConnectionSignal) -> bool {
    provider.is_connected && !client.is_connected && client.status == ConnectionStatus::Disconnected
}

/// Both sources report an account and they are not the same account.
pub fn has_address_mismatch(provider: &ConnectionSignal, client: &ConnectionSignal) -> bool {
    match (provider.address, client.address) {
        (Some(p), Some(c)) => p != c,
        _ => false,
    }
}

/// Derived view over both signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionAssessment {
    pub is_stale_session: bool,
    pub has_address_mismatch: bool,
    pub is_provider_ready: bool,
    /// Both sources agree on connectivity and on the account.
    pub is_valid_connection: bool,
}

impl SessionAssessment {
    pub fn from_signals(provider: &ProviderState, client: &ConnectionSignal) -> Self {
        let mismatch = has_address_mismatch(&provider.signal, client);
        Self {
            is_stale_session: is_stale(&provider.signal, client),
            has_address_mismatch: mismatch,
            is_provider_ready: provider.readiness.is_ready(),
            is_valid_connection: provider.signal.is_connected == client.is_connected && !mismatch,
        }
    }

    /// Staleness only counts once the provider has finished loading.
    fn should_arm(&self) -> bool {
        self.is_stale_session && self.is_provider_ready
    }
}

/// Last validation result and the provider account it was computed for.
#[derive(Debug, Clone, Copy)]
struct CachedCheck {
    address: Address,
    at: Instant,
    valid: bool,
}

/// Read side of the detector: on-demand assessment and throttled validation.
pub struct SessionValidator {
    provider: watch::Receiver<ProviderState>,
    client: watch::Receiver<ClientState>,
    revalidate_interval: Duration,
    last_check: Mutex<Option<CachedCheck>>,
    checks: AtomicU64,
}

impl SessionValidator {
    pub fn new(
        provider: watch::Receiver<ProviderState>,
        client: watch::Receiver<ClientState>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            provider,
            client,
            revalidate_interval: Duration::from_secs(config.revalidate_interval_secs),
            last_check: Mutex::new(None),
            checks: AtomicU64::new(0),
        }
    }

    /// Current assessment of both signals.
    pub fn assess(&self) -> SessionAssessment {
        let provider = self.provider.borrow();
        let client = self.client.borrow();
        SessionAssessment::from_signals(&provider, &client.signal)
    }

    /// Cheap "does the session still look valid" gate.
    ///
    /// Without a provider session there is nothing to validate. Otherwise the
    /// check runs at most once per revalidation interval and the cached
    /// result is returned in between. The cache belongs to one provider
    /// session: logging out drops it and a different account misses it.
    pub fn validate_session(&self) -> bool {
        let (provider_signal, client_status) = {
            let provider = self.provider.borrow();
            let client = self.client.borrow();
            (provider.signal.clone(), client.signal.status)
        };

        let mut last = self.last_check.lock().expect("session validator mutex poisoned");
        let address = match provider_signal.address {
            Some(address) if provider_signal.is_connected => address,
            _ => {
                *last = None;
                return true;
            }
        };

        if let Some(cached) = *last {
            if cached.address == address && cached.at.elapsed() < self.revalidate_interval {
                return cached.valid;
            }
        }

        self.checks.fetch_add(1, Ordering::Relaxed);
        let valid = client_status != ConnectionStatus::Disconnected;
        if !valid {
            tracing::warn!("Session validation failed: chain client disconnected while provider shows connected");
        }
        *last = Some(CachedCheck {
            address,
            at: Instant::now(),
            valid,
        });
        valid
    }

    /// Number of validations that actually ran (not served from cache).
    pub fn validation_count(&self) -> u64 {
        self.checks.load(Ordering::Relaxed)
    }
}

/// Write side: forces a disconnect when staleness persists.
pub struct StalenessDetector<P: SessionProvider> {
    provider: Arc<P>,
    provider_rx: watch::Receiver<ProviderState>,
    client_rx: watch::Receiver<ClientState>,
    grace: Duration,
}

impl<P: SessionProvider> StalenessDetector<P> {
    pub fn new(provider: Arc<P>, client_rx: watch::Receiver<ClientState>, grace: Duration) -> Self {
        let provider_rx = provider.state();
        Self {
            provider,
            provider_rx,
            client_rx,
            grace,
        }
    }

    pub fn from_config(
        provider: Arc<P>,
        client_rx: watch::Receiver<ClientState>,
        config: &SessionConfig,
    ) -> Self {
        Self::new(provider, client_rx, Duration::from_millis(config.stale_grace_ms))
    }

    /// Run until shutdown or until either signal source goes away.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(grace_ms = self.grace.as_millis() as u64, "Staleness detector starting");

        let mut deadline: Option<Instant> = None;
        let mut fired = false;
        let mut mismatch_reported = false;
        let mut last_logged: Option<(ConnectionSignal, ConnectionSignal, bool)> = None;

        loop {
            let provider = self.provider_rx.borrow_and_update().clone();
            let client = self.client_rx.borrow_and_update().clone();
            let assessment = SessionAssessment::from_signals(&provider, &client.signal);

            let snapshot = (provider.signal.clone(), client.signal.clone(), assessment.is_stale_session);
            if last_logged.as_ref() != Some(&snapshot) {
                tracing::debug!(
                    provider_connected = provider.signal.is_connected,
                    client_connected = client.signal.is_connected,
                    provider_status = ?provider.signal.status,
                    client_status = ?client.signal.status,
                    initialized = provider.readiness.initialized,
                    loading = provider.readiness.loading,
                    stale = assessment.is_stale_session,
                    "Session status"
                );
                last_logged = Some(snapshot);
            }

            if assessment.has_address_mismatch && !mismatch_reported {
                tracing::warn!(
                    provider_address = ?provider.signal.address,
                    client_address = ?client.signal.address,
                    "Address mismatch between session provider and chain client"
                );
            }
            mismatch_reported = assessment.has_address_mismatch;

            if assessment.should_arm() {
                if !fired && deadline.is_none() {
                    tracing::warn!("Stale session detected: provider connected but chain client disconnected");
                    deadline = Some(Instant::now() + self.grace);
                }
            } else {
                if deadline.take().is_some() {
                    tracing::debug!("Staleness cleared before grace window elapsed");
                }
                fired = false;
            }

            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                changed = self.provider_rx.changed() => {
                    if changed.is_err() {
                        tracing::info!("Session provider gone, staleness detector exiting");
                        break;
                    }
                }
                changed = self.client_rx.changed() => {
                    if changed.is_err() {
                        tracing::info!("Chain client gone, staleness detector exiting");
                        break;
                    }
                }
                _ = timer => {
                    deadline = None;
                    let still_stale = {
                        let provider = self.provider_rx.borrow();
                        let client = self.client_rx.borrow();
                        SessionAssessment::from_signals(&provider, &client.signal).should_arm()
                    };
                    if still_stale {
                        tracing::info!("Disconnecting stale session");
                        self.provider.disconnect();
                        metrics::record_forced_disconnect();
                        fired = true;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Staleness detector received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
