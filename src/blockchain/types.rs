//! Chain client error definitions and confirmation outcomes.

use thiserror::Error;

/// Errors that can occur during chain client operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No receipt within the confirmation window.
    #[error("Transaction not confirmed within {0} seconds")]
    ConfirmationTimeout(u64),

    /// Invalid private key format or signer error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The node refused the transaction (estimation, funds, nonce...).
    #[error("{0}")]
    Send(String),

    /// No account is connected to sign with.
    #[error("Chain client not connected: {0}")]
    NotConnected(String),
}

/// Result type for chain client operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of waiting for a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Receipt with success status.
    Confirmed { block_number: u64 },
    /// Receipt with failure status (reverted).
    Failed(String),
}
