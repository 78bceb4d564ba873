//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! dapp.toml (optional) + DAPP_* environment variables
//!     → loader.rs (parse, deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → DappConfig (validated, immutable)
//!     → cloned into each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    AppConfig, ChainConfig, DappConfig, NativeCurrency, NetworkDescriptor, NetworksConfig,
    ObservabilityConfig, SessionConfig, TransferConfig, WalletConfig,
};
