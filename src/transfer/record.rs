//! Transaction record lifecycle.
//!
//! ```text
//! None ──begin──▶ Sending ──submitted──▶ AwaitingConfirmation ──confirm──▶ Confirmed
//!                    │                          │
//!                    └──────────fail────────────┴──────────────▶ Failed
//! Confirmed | Failed | None ──reset──▶ None
//! ```
//!
//! Any other transition is rejected and leaves the record untouched.

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Phase of one submitted transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TransactionPhase {
    #[default]
    None,
    Sending,
    AwaitingConfirmation {
        hash: TxHash,
    },
    Confirmed {
        hash: TxHash,
        block_number: u64,
        explorer_url: String,
    },
    Failed {
        hash: Option<TxHash>,
        error: String,
    },
}

/// Phase discriminant, used for history and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    None,
    Sending,
    AwaitingConfirmation,
    Confirmed,
    Failed,
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PhaseKind::None => "none",
            PhaseKind::Sending => "sending",
            PhaseKind::AwaitingConfirmation => "awaiting_confirmation",
            PhaseKind::Confirmed => "confirmed",
            PhaseKind::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl TransactionPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            TransactionPhase::None => PhaseKind::None,
            TransactionPhase::Sending => PhaseKind::Sending,
            TransactionPhase::AwaitingConfirmation { .. } => PhaseKind::AwaitingConfirmation,
            TransactionPhase::Confirmed { .. } => PhaseKind::Confirmed,
            TransactionPhase::Failed { .. } => PhaseKind::Failed,
        }
    }

    /// A submission or confirmation wait is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            TransactionPhase::Sending | TransactionPhase::AwaitingConfirmation { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionPhase::Confirmed { .. } | TransactionPhase::Failed { .. }
        )
    }

    pub fn hash(&self) -> Option<TxHash> {
        match self {
            TransactionPhase::AwaitingConfirmation { hash } | TransactionPhase::Confirmed { hash, .. } => Some(*hash),
            TransactionPhase::Failed { hash, .. } => *hash,
            _ => None,
        }
    }
}

/// Rejected phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transaction transition from {from} to {to}")]
pub struct TransitionError {
    pub from: PhaseKind,
    pub to: PhaseKind,
}

/// Lifecycle-tracked state of one value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Changes on every `begin`, so observers can tell attempts apart.
    pub id: Uuid,
    #[serde(flatten)]
    pub phase: TransactionPhase,
    /// Phases entered since the last reset, in order.
    pub history: Vec<PhaseKind>,
}

impl Default for TransactionRecord {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            phase: TransactionPhase::None,
            history: Vec::new(),
        }
    }
}

impl TransactionRecord {
    fn enter(&mut self, phase: TransactionPhase) {
        self.history.push(phase.kind());
        self.phase = phase;
    }

    fn reject(&self, to: PhaseKind) -> TransitionError {
        TransitionError {
            from: self.phase.kind(),
            to,
        }
    }

    /// Start a new attempt. Only allowed from `None`.
    pub fn begin(&mut self) -> Result<Uuid, TransitionError> {
        if self.phase != TransactionPhase::None {
            return Err(self.reject(PhaseKind::Sending));
        }
        self.id = Uuid::new_v4();
        self.history.clear();
        self.enter(TransactionPhase::Sending);
        Ok(self.id)
    }

    /// The chain client accepted the transaction and returned its hash.
    pub fn submitted(&mut self, hash: TxHash) -> Result<(), TransitionError> {
        if self.phase != TransactionPhase::Sending {
            return Err(self.reject(PhaseKind::AwaitingConfirmation));
        }
        self.enter(TransactionPhase::AwaitingConfirmation { hash });
        Ok(())
    }

    /// A successful receipt was observed.
    pub fn confirm(&mut self, block_number: u64, explorer_url: String) -> Result<(), TransitionError> {
        let TransactionPhase::AwaitingConfirmation { hash } = self.phase else {
            return Err(self.reject(PhaseKind::Confirmed));
        };
        self.enter(TransactionPhase::Confirmed {
            hash,
            block_number,
            explorer_url,
        });
        Ok(())
    }

    /// Submission or confirmation failed.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        if !self.phase.is_in_flight() {
            return Err(self.reject(PhaseKind::Failed));
        }
        let hash = self.phase.hash();
        self.enter(TransactionPhase::Failed {
            hash,
            error: error.into(),
        });
        Ok(())
    }

    /// "New transfer": back to `None`. Not allowed while in flight.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        if self.phase.is_in_flight() {
            return Err(self.reject(PhaseKind::None));
        }
        *self = Self::default();
        Ok(())
    }
}
