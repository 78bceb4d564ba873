//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + [chain] config (RPC URLs)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC reads with timeouts and failover)
//!     → transaction.rs (build, sign, broadcast, wait for receipt)
//!     → chain.rs (ChainClient seam used by the transfer workflow)
//!
//! monitor.rs probes chain id → watch<ClientState>
//! injected.rs forwards wallet_* requests to an extension endpoint
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod chain;
pub mod client;
pub mod injected;
pub mod monitor;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use chain::{ChainClient, RpcChainClient};
pub use client::BlockchainClient;
pub use injected::ExtensionBridge;
pub use monitor::ConnectionMonitor;
pub use types::{BlockchainError, BlockchainResult, ConfirmationStatus};
pub use wallet::Wallet;
