//! Shared state handed to every API handler.

use std::sync::Arc;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::injected::ExtensionBridge;
use crate::network::registry::NetworkRegistry;
use crate::network::switch::NetworkSwitcher;
use crate::session::detector::SessionValidator;
use crate::session::provider::LocalSession;
use crate::transfer::workflow::TransferWorkflow;

pub type Switcher = NetworkSwitcher<ExtensionBridge, LocalSession>;

/// Application state injected into handlers.
pub struct AppState<C: ChainClient> {
    pub app_name: String,
    pub project_id: String,
    pub session: Arc<LocalSession>,
    pub client: Arc<C>,
    pub registry: Arc<NetworkRegistry>,
    pub switcher: Arc<Switcher>,
    pub validator: Arc<SessionValidator>,
    pub workflow: Arc<TransferWorkflow<C>>,
}

// Manual impl: `C` itself need not be `Clone`.
impl<C: ChainClient> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            app_name: self.app_name.clone(),
            project_id: self.project_id.clone(),
            session: self.session.clone(),
            client: self.client.clone(),
            registry: self.registry.clone(),
            switcher: self.switcher.clone(),
            validator: self.validator.clone(),
            workflow: self.workflow.clone(),
        }
    }
}
