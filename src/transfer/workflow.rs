//! Transfer workflow: guards, validation, submission and confirmation.
//!
//! ```text
//! submit()
//!     → network guard (chain id must be mainnet or testnet)
//!     → connection guard, optional session gate
//!     → balance lookup (failure skips the balance check)
//!     → validate form → field errors, nothing sent
//!     → record.begin() (single flight)
//!     → background: send → AwaitingConfirmation → receipt → Confirmed | Failed
//! ```

use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::ConfirmationStatus;
use crate::config::NetworkDescriptor;
use crate::network::registry::{NetworkRegistry, NetworkStatus};
use crate::observability::metrics;
use crate::session::detector::SessionValidator;
use crate::transfer::messages::friendly_error;
use crate::transfer::record::{PhaseKind, TransactionPhase, TransactionRecord, TransitionError};
use crate::transfer::validation::{validate_transfer, FieldErrors, TransferLimits, ValidatedTransfer, ValidationContext};

/// Editable form values and the errors from the last validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
    pub errors: FieldErrors,
}

/// Why `submit` or `reset` was refused.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Switch to XRPL EVM Mainnet or Testnet to send transfers")]
    WrongNetwork { chain_id: Option<u64> },

    #[error("Connect your wallet to send transfers")]
    NotConnected,

    #[error("Your session has expired. Please reconnect your wallet")]
    StaleSession,

    #[error("A transfer is already in progress")]
    InFlight,

    #[error("The previous transfer was confirmed. Start a new transfer first")]
    AwaitingReset,

    #[error("Please fix the highlighted fields")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Owns the transfer form and the transaction record for one account.
pub struct TransferWorkflow<C: ChainClient> {
    client: Arc<C>,
    registry: Arc<NetworkRegistry>,
    limits: TransferLimits,
    session: Option<Arc<SessionValidator>>,
    form: Mutex<TransferForm>,
    record: watch::Sender<TransactionRecord>,
}

impl<C: ChainClient> TransferWorkflow<C> {
    pub fn new(client: Arc<C>, registry: Arc<NetworkRegistry>, limits: TransferLimits) -> Self {
        let (record, _) = watch::channel(TransactionRecord::default());
        Self {
            client,
            registry,
            limits,
            session: None,
            form: Mutex::new(TransferForm::default()),
            record,
        }
    }

    /// Refuse submissions while [`SessionValidator::validate_session`] fails.
    pub fn with_session_gate(mut self, validator: Arc<SessionValidator>) -> Self {
        self.session = Some(validator);
        self
    }

    pub fn set_recipient(&self, value: impl Into<String>) {
        self.lock_form().recipient = value.into();
    }

    pub fn set_amount(&self, value: impl Into<String>) {
        self.lock_form().amount = value.into();
    }

    pub fn form(&self) -> TransferForm {
        self.lock_form().clone()
    }

    pub fn record(&self) -> TransactionRecord {
        self.record.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionRecord> {
        self.record.subscribe()
    }

    /// Network status derived from the chain id the client reports right now.
    pub fn network_status(&self) -> NetworkStatus {
        let chain_id = self.client.state().borrow().chain_id;
        self.registry.status(chain_id)
    }

    /// Set both fields and submit.
    ///
    /// While a transfer is in flight the form keeps the values being sent.
    pub async fn submit_form(
        self: &Arc<Self>,
        recipient: impl Into<String>,
        amount: impl Into<String>,
    ) -> Result<Uuid, TransferError> {
        if self.record.borrow().phase.is_in_flight() {
            return Err(TransferError::InFlight);
        }
        {
            let mut form = self.lock_form();
            form.recipient = recipient.into();
            form.amount = amount.into();
        }
        self.submit().await
    }

    /// Validate the form and start a transfer.
    ///
    /// Returns once the record has entered `Sending`; submission and the
    /// receipt wait continue in a background task. Observe progress through
    /// [`TransferWorkflow::subscribe`].
    pub async fn submit(self: &Arc<Self>) -> Result<Uuid, TransferError> {
        let state = self.client.state().borrow().clone();

        let network = match state.chain_id.and_then(|id| self.registry.resolve(id)) {
            Some(network) => network.clone(),
            None => {
                return Err(TransferError::WrongNetwork {
                    chain_id: state.chain_id,
                })
            }
        };

        let sender = match state.signal.address {
            Some(address) if state.signal.is_connected => address,
            _ => return Err(TransferError::NotConnected),
        };

        if let Some(validator) = &self.session {
            if !validator.validate_session() {
                return Err(TransferError::StaleSession);
            }
        }

        if self.record.borrow().phase.is_in_flight() {
            return Err(TransferError::InFlight);
        }

        let validated = self.validate(sender, &network).await?;

        let mut outcome = Err(TransferError::InFlight);
        self.record.send_if_modified(|record| {
            match record.phase.kind() {
                PhaseKind::Sending | PhaseKind::AwaitingConfirmation => return false,
                PhaseKind::Confirmed => {
                    outcome = Err(TransferError::AwaitingReset);
                    return false;
                }
                // Retrying after a failure starts a fresh record.
                PhaseKind::Failed => *record = TransactionRecord::default(),
                PhaseKind::None => {}
            }
            match record.begin() {
                Ok(id) => {
                    outcome = Ok(id);
                    true
                }
                Err(e) => {
                    outcome = Err(e.into());
                    false
                }
            }
        });
        let id = outcome?;

        tracing::info!(
            transfer_id = %id,
            to = %validated.recipient,
            value = %validated.value,
            chain_id = network.chain_id,
            "Transfer started"
        );
        metrics::record_transfer("submitted");

        tokio::spawn(self.clone().drive(id, validated, network));
        Ok(id)
    }

    async fn validate(&self, sender: Address, network: &NetworkDescriptor) -> Result<ValidatedTransfer, TransferError> {
        let balance = match self.client.balance(sender).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::warn!(error = %e, "Balance unavailable, skipping balance check");
                None
            }
        };

        let ctx = ValidationContext {
            balance,
            network,
            limits: &self.limits,
        };

        let mut form = self.lock_form();
        match validate_transfer(&form.recipient, &form.amount, &ctx) {
            Ok(validated) => {
                form.errors.clear();
                Ok(validated)
            }
            Err(errors) => {
                for field in errors.keys() {
                    metrics::record_validation_failure(field.as_str());
                }
                tracing::debug!(errors = ?errors, "Transfer form rejected");
                form.errors = errors.clone();
                Err(TransferError::Invalid(errors))
            }
        }
    }

    async fn drive(self: Arc<Self>, id: Uuid, transfer: ValidatedTransfer, network: NetworkDescriptor) {
        let hash = match self
            .client
            .send_transfer(transfer.recipient, transfer.value)
            .await
        {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(transfer_id = %id, error = %e, "Transfer submission failed");
                self.fail(id, &e.to_string());
                return;
            }
        };

        self.apply(id, |record| record.submitted(hash));

        match self.client.wait_for_receipt(hash).await {
            Ok(ConfirmationStatus::Confirmed { block_number }) => self.confirm(id, hash, block_number, &network),
            Ok(ConfirmationStatus::Failed(reason)) => {
                tracing::warn!(transfer_id = %id, tx_hash = %hash, reason = %reason, "Transfer failed on chain");
                self.fail(id, &reason);
            }
            Err(e) => {
                tracing::warn!(transfer_id = %id, tx_hash = %hash, error = %e, "Confirmation wait failed");
                self.fail(id, &e.to_string());
            }
        }
    }

    fn confirm(&self, id: Uuid, hash: TxHash, block_number: u64, network: &NetworkDescriptor) {
        let explorer_url = network.explorer_tx_url(&hash);
        if self.apply(id, |record| record.confirm(block_number, explorer_url)) {
            *self.lock_form() = TransferForm::default();
            metrics::record_transfer("confirmed");
            tracing::info!(transfer_id = %id, tx_hash = %hash, block_number, "Transfer confirmed");
        }
    }

    fn fail(&self, id: Uuid, raw: &str) {
        let message = friendly_error(raw);
        if self.apply(id, |record| record.fail(message)) {
            metrics::record_transfer("failed");
        }
    }

    /// Apply a transition to the record if it still belongs to attempt `id`.
    fn apply<F>(&self, id: Uuid, transition: F) -> bool
    where
        F: FnOnce(&mut TransactionRecord) -> Result<(), TransitionError>,
    {
        self.record.send_if_modified(|record| {
            if record.id != id {
                return false;
            }
            match transition(record) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(transfer_id = %id, error = %e, "Rejected transaction transition");
                    false
                }
            }
        })
    }

    /// Back to an empty form and a `None` record. Refused while in flight.
    pub fn reset(&self) -> Result<(), TransferError> {
        let mut result = Ok(());
        self.record.send_if_modified(|record| {
            if record.phase == TransactionPhase::None {
                return false;
            }
            match record.reset() {
                Ok(()) => true,
                Err(e) => {
                    result = Err(TransferError::from(e));
                    false
                }
            }
        });
        result?;

        *self.lock_form() = TransferForm::default();
        Ok(())
    }

    fn lock_form(&self) -> std::sync::MutexGuard<'_, TransferForm> {
        self.form.lock().expect("transfer form mutex poisoned")
    }
}
