//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::watch;

use xrpl_evm_dapp::blockchain::{BlockchainError, BlockchainResult, ChainClient, ConfirmationStatus};
use xrpl_evm_dapp::network::NetworkRegistry;
use xrpl_evm_dapp::session::{ClientState, ConnectionSignal, ConnectionStatus};
use xrpl_evm_dapp::transfer::amount::whole_units;
use xrpl_evm_dapp::transfer::{TransferLimits, TransferWorkflow};

pub const MAINNET_ID: u64 = 1_440_000;
pub const TESTNET_ID: u64 = 1_449_000;
pub const RECIPIENT: &str = "0x2222222222222222222222222222222222222222";

pub fn account() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn tx_hash() -> TxHash {
    TxHash::repeat_byte(0x42)
}

/// Scriptable in-memory chain client.
///
/// Every call sleeps for its configured delay first, so tests running with
/// paused time can hold a transfer in `Sending` or `AwaitingConfirmation`.
pub struct MockChainClient {
    state: watch::Sender<ClientState>,
    balance: Mutex<Result<U256, String>>,
    send_delay: Mutex<Duration>,
    send_result: Mutex<Result<TxHash, String>>,
    receipt_delay: Mutex<Duration>,
    receipt_result: Mutex<Result<ConfirmationStatus, String>>,
    sends: AtomicUsize,
    sent: Mutex<Vec<(Address, U256)>>,
}

impl MockChainClient {
    /// Connected on `chain_id` with 100 native units of balance.
    pub fn connected(chain_id: u64) -> Arc<Self> {
        let (state, _) = watch::channel(ClientState {
            signal: ConnectionSignal::connected(account()),
            chain_id: Some(chain_id),
        });
        Arc::new(Self {
            state,
            balance: Mutex::new(Ok(whole_units(100))),
            send_delay: Mutex::new(Duration::ZERO),
            send_result: Mutex::new(Ok(tx_hash())),
            receipt_delay: Mutex::new(Duration::ZERO),
            receipt_result: Mutex::new(Ok(ConfirmationStatus::Confirmed { block_number: 7 })),
            sends: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn set_chain_id(&self, chain_id: Option<u64>) {
        self.state.send_modify(|s| s.chain_id = chain_id);
    }

    pub fn disconnect(&self) {
        self.state.send_modify(|s| s.signal = ConnectionSignal::disconnected());
    }

    pub fn reconnect(&self) {
        self.state.send_modify(|s| s.signal = ConnectionSignal::connected(account()));
    }

    pub fn set_status(&self, status: ConnectionStatus) {
        self.state.send_modify(|s| {
            s.signal = ConnectionSignal::transitioning(Some(account()), status);
        });
    }

    pub fn set_balance(&self, balance: U256) {
        *self.balance.lock().unwrap() = Ok(balance);
    }

    pub fn fail_balance(&self, message: &str) {
        *self.balance.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_send_delay(&self, delay: Duration) {
        *self.send_delay.lock().unwrap() = delay;
    }

    pub fn fail_send(&self, message: &str) {
        *self.send_result.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_receipt_delay(&self, delay: Duration) {
        *self.receipt_delay.lock().unwrap() = delay;
    }

    pub fn set_receipt(&self, result: Result<ConfirmationStatus, String>) {
        *self.receipt_result.lock().unwrap() = result;
    }

    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(Address, U256)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChainClient for MockChainClient {
    fn state(&self) -> watch::Receiver<ClientState> {
        self.state.subscribe()
    }

    async fn balance(&self, _address: Address) -> BlockchainResult<U256> {
        let result = self.balance.lock().unwrap().clone();
        result.map_err(BlockchainError::Rpc)
    }

    async fn send_transfer(&self, to: Address, value: U256) -> BlockchainResult<TxHash> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push((to, value));
        let delay = *self.send_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        let result = self.send_result.lock().unwrap().clone();
        result.map_err(BlockchainError::Send)
    }

    async fn wait_for_receipt(&self, _hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let delay = *self.receipt_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        let result = self.receipt_result.lock().unwrap().clone();
        result.map_err(BlockchainError::Rpc)
    }
}

/// Workflow over the mock with default networks and caps.
pub fn workflow(client: Arc<MockChainClient>) -> Arc<TransferWorkflow<MockChainClient>> {
    Arc::new(TransferWorkflow::new(
        client,
        Arc::new(NetworkRegistry::default()),
        TransferLimits::default(),
    ))
}
