//! The chain client seam used by the transfer workflow.

use alloy::primitives::{Address, TxHash, U256};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::monitor::ConnectionMonitor;
use crate::blockchain::transaction::TransferSender;
use crate::blockchain::types::{BlockchainResult, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;
use crate::config::ChainConfig;
use crate::session::signal::ClientState;

/// Connection state, balance lookup, submission and confirmation.
pub trait ChainClient: Send + Sync + 'static {
    /// Connection signal plus the chain id the RPC reports.
    fn state(&self) -> watch::Receiver<ClientState>;

    fn balance(&self, address: Address) -> impl Future<Output = BlockchainResult<U256>> + Send;

    /// Resolves with the hash once the transaction has been accepted.
    fn send_transfer(
        &self,
        to: Address,
        value: U256,
    ) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    fn wait_for_receipt(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<ConfirmationStatus>> + Send;
}

/// [`ChainClient`] over JSON-RPC with a locally held signing key.
pub struct RpcChainClient {
    client: BlockchainClient,
    sender: TransferSender,
    state: Arc<watch::Sender<ClientState>>,
}

impl RpcChainClient {
    pub fn new(config: &ChainConfig, wallet: &Wallet) -> BlockchainResult<Self> {
        let client = BlockchainClient::new(config)?;
        let sender = TransferSender::new(client.clone(), wallet, config)?;
        let (state, _) = watch::channel(ClientState::default());

        Ok(Self {
            client,
            sender,
            state: Arc::new(state),
        })
    }

    /// The monitor that keeps [`ChainClient::state`] current.
    pub fn monitor(&self, config: &ChainConfig) -> ConnectionMonitor {
        ConnectionMonitor::new(
            self.client.clone(),
            self.state.clone(),
            self.sender.address(),
            config,
        )
    }

    pub fn address(&self) -> Address {
        self.sender.address()
    }
}

impl ChainClient for RpcChainClient {
    fn state(&self) -> watch::Receiver<ClientState> {
        self.state.subscribe()
    }

    async fn balance(&self, address: Address) -> BlockchainResult<U256> {
        self.client.get_balance(address).await
    }

    async fn send_transfer(&self, to: Address, value: U256) -> BlockchainResult<TxHash> {
        self.sender.send(to, value).await
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        self.sender.wait_for_receipt(hash).await
    }
}
