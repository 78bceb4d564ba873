//! XRPL EVM dApp core library.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod network;
pub mod observability;
pub mod resilience;
pub mod session;
pub mod transfer;

pub use config::schema::DappConfig;
pub use lifecycle::{App, Shutdown};
