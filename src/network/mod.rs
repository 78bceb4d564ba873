//! Network reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! ChainClient reports chain id
//!     → registry.rs (exact match against mainnet/testnet descriptors)
//!     → NetworkStatus (correct?, mainnet?, display name / badge)
//!
//! User asks to switch
//!     → switch.rs (injected wallet switch, add-chain on 4902, modal fallback)
//! ```
//!
//! Nothing here stores the active network; it is always derived.

pub mod registry;
pub mod switch;

pub use registry::{NetworkKind, NetworkRegistry, NetworkStatus, UNKNOWN_NETWORK, WRONG_NETWORK};
pub use switch::{InjectedWallet, NetworkSwitcher, SwitchOutcome, WalletRpcError};
