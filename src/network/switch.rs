//! Chain switching through the injected wallet, with manual fallback.
//!
//! ```text
//! wallet_switchEthereumChain
//!     ok            → Switched
//!     code 4902     → wallet_addEthereumChain → wallet_switchEthereumChain → AddedAndSwitched
//!     anything else → open provider "Networks" view → ManualSelection
//! ```
//!
//! Errors never leave this module; the manual view is always available.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::NetworkDescriptor;
use crate::network::registry::CHAIN_NOT_ADDED_CODE;
use crate::observability::metrics;
use crate::session::provider::{ModalView, SessionProvider};

/// Error returned by a wallet JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("wallet request failed ({code}): {message}")]
pub struct WalletRpcError {
    pub code: i64,
    pub message: String,
}

/// Browser-style injected wallet accepting `wallet_*` requests.
pub trait InjectedWallet: Send + Sync + 'static {
    fn request(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, WalletRpcError>> + Send;
}

/// How a switch request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchOutcome {
    Switched,
    AddedAndSwitched,
    /// The provider's network selection view was opened instead.
    ManualSelection,
}

impl SwitchOutcome {
    fn as_label(&self) -> &'static str {
        match self {
            Self::Switched => "switched",
            Self::AddedAndSwitched => "added_and_switched",
            Self::ManualSelection => "manual_selection",
        }
    }
}

/// Drives the switch/add/fallback sequence.
pub struct NetworkSwitcher<W, P> {
    wallet: Option<Arc<W>>,
    provider: Arc<P>,
}

impl<W: InjectedWallet, P: SessionProvider> NetworkSwitcher<W, P> {
    pub fn new(wallet: Option<Arc<W>>, provider: Arc<P>) -> Self {
        Self { wallet, provider }
    }

    /// Ask the wallet to move to `target`. Never fails.
    pub async fn switch_to(&self, target: &NetworkDescriptor) -> SwitchOutcome {
        let outcome = match &self.wallet {
            Some(wallet) => match self.try_switch(wallet, target).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(
                        chain_id = target.chain_id,
                        error = %e,
                        "Wallet could not switch network, opening network selection"
                    );
                    self.provider.open_modal(ModalView::Networks);
                    SwitchOutcome::ManualSelection
                }
            },
            None => {
                tracing::debug!("No injected wallet configured, opening network selection");
                self.provider.open_modal(ModalView::Networks);
                SwitchOutcome::ManualSelection
            }
        };

        metrics::record_network_switch(outcome.as_label());
        tracing::info!(chain_id = target.chain_id, outcome = outcome.as_label(), "Network switch resolved");
        outcome
    }

    async fn try_switch(&self, wallet: &W, target: &NetworkDescriptor) -> Result<SwitchOutcome, WalletRpcError> {
        match wallet
            .request("wallet_switchEthereumChain", target.switch_chain_params())
            .await
        {
            Ok(_) => Ok(SwitchOutcome::Switched),
            Err(e) if e.code == CHAIN_NOT_ADDED_CODE => {
                tracing::info!(chain_id = target.chain_id, "Chain unknown to wallet, adding it");
                wallet
                    .request("wallet_addEthereumChain", target.add_chain_params())
                    .await?;
                wallet
                    .request("wallet_switchEthereumChain", target.switch_chain_params())
                    .await?;
                Ok(SwitchOutcome::AddedAndSwitched)
            }
            Err(e) => Err(e),
        }
    }
}
