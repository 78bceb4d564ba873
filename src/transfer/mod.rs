//! Transfer subsystem.
//!
//! # Data Flow
//! ```text
//! form input (recipient, amount)
//!     → amount.rs (decimal → wei)
//!     → validation.rs (field errors, balance and network caps)
//!     → workflow.rs (guards, single-flight submission, confirmation)
//!     → record.rs (phase state machine, watch<TransactionRecord>)
//!     → messages.rs (banner wording for failures)
//! ```

pub mod amount;
pub mod messages;
pub mod record;
pub mod validation;
pub mod workflow;

pub use record::{PhaseKind, TransactionPhase, TransactionRecord, TransitionError};
pub use validation::{Field, FieldErrors, TransferLimits, ValidatedTransfer};
pub use workflow::{TransferError, TransferForm, TransferWorkflow};
