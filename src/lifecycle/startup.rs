//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every subsystem from a validated [`DappConfig`] in dependency order
//! - Start background tasks (chain monitor, staleness detector)
//! - Bind the API listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any construction error is fatal
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::api::{setup_router, AppState};
use crate::blockchain::chain::{ChainClient, RpcChainClient};
use crate::blockchain::injected::ExtensionBridge;
use crate::blockchain::monitor::ConnectionMonitor;
use crate::blockchain::types::BlockchainError;
use crate::blockchain::wallet::Wallet;
use crate::config::DappConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::wait_for_signal;
use crate::network::registry::NetworkRegistry;
use crate::network::switch::NetworkSwitcher;
use crate::session::detector::{SessionValidator, StalenessDetector};
use crate::session::provider::{LocalSession, SessionProvider};
use crate::transfer::validation::TransferLimits;
use crate::transfer::workflow::TransferWorkflow;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("chain client: {0}")]
    Blockchain(#[from] BlockchainError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Fully wired service, ready to run.
pub struct App {
    state: AppState<RpcChainClient>,
    monitor: ConnectionMonitor,
    detector: StalenessDetector<LocalSession>,
    bind_address: String,
    request_timeout: Duration,
    shutdown: Shutdown,
}

impl App {
    /// Construct all subsystems. No network traffic happens here.
    pub fn build(config: &DappConfig, wallet: Wallet) -> Result<Self, StartupError> {
        let registry = Arc::new(NetworkRegistry::from_config(&config.networks));
        let session = Arc::new(LocalSession::new());

        let client = Arc::new(RpcChainClient::new(&config.chain, &wallet)?);
        let monitor = client.monitor(&config.chain);

        let injected = match &config.wallet.extension_url {
            Some(url) => {
                let bridge = ExtensionBridge::new(url, Duration::from_secs(config.chain.rpc_timeout_secs))?;
                tracing::info!(url = %url, "Wallet extension bridge configured");
                Some(Arc::new(bridge))
            }
            None => None,
        };
        let switcher = Arc::new(NetworkSwitcher::new(injected, session.clone()));

        let validator = Arc::new(SessionValidator::new(
            session.state(),
            client.state(),
            &config.session,
        ));
        let detector = StalenessDetector::from_config(session.clone(), client.state(), &config.session);

        let workflow = Arc::new(
            TransferWorkflow::new(
                client.clone(),
                registry.clone(),
                TransferLimits::from_config(&config.transfer),
            )
            .with_session_gate(validator.clone()),
        );

        let state = AppState {
            app_name: config.app.name.clone(),
            project_id: config.app.project_id.clone(),
            session,
            client,
            registry,
            switcher,
            validator,
            workflow,
        };

        Ok(Self {
            state,
            monitor,
            detector,
            bind_address: config.app.bind_address.clone(),
            request_timeout: Duration::from_secs(config.app.request_timeout_secs),
            shutdown: Shutdown::new(),
        })
    }

    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Spawn background tasks and serve the API until a signal arrives.
    pub async fn run(self) -> Result<(), StartupError> {
        let listener = TcpListener::bind(&self.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Listening for connections");

        let monitor = tokio::spawn(self.monitor.run(self.shutdown.subscribe()));
        let detector = tokio::spawn(self.detector.run(self.shutdown.subscribe()));

        self.state.session.mark_ready();

        let router = setup_router(self.state, self.request_timeout);

        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            shutdown.trigger();
        });

        let mut stop = self.shutdown.subscribe();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        let _ = monitor.await;
        let _ = detector.await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
