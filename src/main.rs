//! XRPL EVM dApp service.
//!
//! # Architecture Overview
//!
//! ```text
//!   dapp-cli / HTTP client
//!        │
//!        ▼
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ api (axum)                                                   │
//!   │   │            │                   │                         │
//!   │   ▼            ▼                   ▼                         │
//!   │ session     network             transfer                     │
//!   │ provider    registry/switcher   workflow ──▶ record (watch)  │
//!   │   │  ▲         │                   │                         │
//!   │   │  └─ staleness detector ◀──┐    ▼                         │
//!   │   │                           └─ blockchain (alloy RPC,      │
//!   │   │                              connection monitor)  ───────┼──▶ XRPL EVM RPC
//!   │   └── extension bridge ──────────────────────────────────────┼──▶ wallet extension
//!   │                                                              │
//!   │ config · observability · lifecycle · resilience              │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use xrpl_evm_dapp::blockchain::Wallet;
use xrpl_evm_dapp::config::load_from_env;
use xrpl_evm_dapp::observability::{logging, metrics};
use xrpl_evm_dapp::App;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "xrpl-evm-dapp starting");
    tracing::info!(
        app = %config.app.name,
        bind_address = %config.app.bind_address,
        rpc_url = %config.chain.rpc_url,
        mainnet_chain_id = config.networks.mainnet.chain_id,
        testnet_chain_id = config.networks.testnet.chain_id,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let wallet = Wallet::from_env()?;
    let app = App::build(&config, wallet)?;
    app.run().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
