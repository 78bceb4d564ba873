//! Session provider seam and the in-process implementation.
//!
//! The provider owns the "logged in" half of the connection picture: which
//! account the user authenticated with (social login or wallet), whether the
//! provider finished initializing, plus the `disconnect` and modal actions.

use std::sync::Mutex;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::session::signal::{ConnectionSignal, ConnectionStatus, ProviderReadiness, ProviderState};

/// Named provider views that can be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalView {
    Connect,
    Account,
    Networks,
}

/// Wallet/session provider as consumed by the dApp core.
pub trait SessionProvider: Send + Sync + 'static {
    /// Subscribe to the provider's connection signal and readiness.
    fn state(&self) -> watch::Receiver<ProviderState>;

    /// Drop the current session. Fire-and-forget.
    fn disconnect(&self);

    /// Present one of the provider's views to the user.
    fn open_modal(&self, view: ModalView);
}

/// In-memory session provider driven by the HTTP API.
pub struct LocalSession {
    state: watch::Sender<ProviderState>,
    open_view: Mutex<Option<ModalView>>,
}

impl LocalSession {
    /// A provider that is still loading and has no session.
    pub fn new() -> Self {
        let initial = ProviderState {
            signal: ConnectionSignal::disconnected(),
            readiness: ProviderReadiness {
                initialized: false,
                loading: true,
            },
        };
        let (state, _) = watch::channel(initial);
        Self {
            state,
            open_view: Mutex::new(None),
        }
    }

    /// Mark provider initialization as finished.
    pub fn mark_ready(&self) {
        self.state.send_modify(|s| s.readiness = ProviderReadiness::ready());
        tracing::info!("Session provider ready");
    }

    /// Record a completed login for `address`.
    pub fn connect(&self, address: Address) {
        self.state.send_modify(|s| {
            s.signal = ConnectionSignal::connected(address);
        });
        if let Ok(mut view) = self.open_view.lock() {
            if *view == Some(ModalView::Connect) {
                *view = None;
            }
        }
        tracing::info!(address = %address, "Session connected");
    }

    /// Record that the provider is restoring a previous session.
    pub fn begin_reconnect(&self) {
        self.state.send_modify(|s| {
            s.signal = ConnectionSignal::transitioning(s.signal.address, ConnectionStatus::Reconnecting);
        });
    }

    /// The view most recently requested and not yet dismissed.
    pub fn open_view(&self) -> Option<ModalView> {
        self.open_view.lock().ok().and_then(|v| *v)
    }

    /// Dismiss any open view.
    pub fn close_modal(&self) {
        if let Ok(mut view) = self.open_view.lock() {
            *view = None;
        }
    }

    /// Snapshot of the current provider state.
    pub fn snapshot(&self) -> ProviderState {
        self.state.borrow().clone()
    }
}

impl Default for LocalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for LocalSession {
    fn state(&self) -> watch::Receiver<ProviderState> {
        self.state.subscribe()
    }

    fn disconnect(&self) {
        let was_connected = self.state.send_if_modified(|s| {
            if s.signal == ConnectionSignal::disconnected() {
                return false;
            }
            s.signal = ConnectionSignal::disconnected();
            true
        });
        if was_connected {
            tracing::info!("Session disconnected");
        }
    }

    fn open_modal(&self, view: ModalView) {
        tracing::info!(view = ?view, "Opening provider view");
        if let Ok(mut open) = self.open_view.lock() {
            *open = Some(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let session = LocalSession::new();
        assert!(!session.snapshot().readiness.is_ready());

        session.mark_ready();
        session.connect(addr());
        let state = session.snapshot();
        assert!(state.readiness.is_ready());
        assert!(state.signal.is_connected);
        assert_eq!(state.signal.address, Some(addr()));

        session.disconnect();
        assert_eq!(session.snapshot().signal, ConnectionSignal::disconnected());
    }

    #[test]
    fn test_disconnect_when_idle_does_not_notify() {
        let session = LocalSession::new();
        let rx = session.state();

        session.disconnect();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_connect_dismisses_connect_view() {
        let session = LocalSession::new();
        session.open_modal(ModalView::Connect);
        assert_eq!(session.open_view(), Some(ModalView::Connect));

        session.connect(addr());
        assert_eq!(session.open_view(), None);

        session.open_modal(ModalView::Networks);
        session.connect(addr());
        assert_eq!(session.open_view(), Some(ModalView::Networks));
    }

    #[test]
    fn test_begin_reconnect_keeps_address() {
        let session = LocalSession::new();
        session.connect(addr());
        session.begin_reconnect();

        let signal = session.snapshot().signal;
        assert!(!signal.is_connected);
        assert_eq!(signal.status, ConnectionStatus::Reconnecting);
        assert_eq!(signal.address, Some(addr()));
    }
}
