//! Native-value transfer submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Build value transfers and leave gas and nonce to alloy's fillers
//! - Sign and broadcast through the wallet-backed provider
//! - Poll for the receipt until it lands or the window closes

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::{BlockchainClient, DynProvider};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;
use crate::config::ChainConfig;

/// Sends transfers from the wallet account and watches for their receipts.
pub struct TransferSender {
    client: BlockchainClient,
    signer: DynProvider,
    from: Address,
    poll_interval: Duration,
    confirmation_timeout_secs: u64,
}

impl TransferSender {
    pub fn new(client: BlockchainClient, wallet: &Wallet, config: &ChainConfig) -> BlockchainResult<Self> {
        let url: url::Url = config
            .rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e)))?;

        let signer: DynProvider = Arc::new(
            ProviderBuilder::new()
                .wallet(wallet.ethereum_wallet())
                .connect_http(url),
        );

        Ok(Self {
            client,
            signer,
            from: wallet.address(),
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
            confirmation_timeout_secs: config.confirmation_timeout_secs,
        })
    }

    /// Build the request for a plain value transfer.
    ///
    /// Gas limit, fees, nonce and chain id stay unset.
    pub fn build(&self, to: Address, value: U256) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(to)
            .with_value(value)
    }

    /// Sign and broadcast; resolves once the node has accepted the transaction.
    pub async fn send(&self, to: Address, value: U256) -> BlockchainResult<TxHash> {
        let tx = self.build(to, value);

        let pending = match timeout(self.client.timeout(), self.signer.send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(BlockchainError::Send(e.to_string())),
            Err(_) => return Err(BlockchainError::Timeout(self.client.timeout().as_secs())),
        };

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, to = %to, value = %value, "Transfer broadcast");
        Ok(tx_hash)
    }

    /// Wait for the receipt of `tx_hash`.
    ///
    /// RPC errors while polling are logged and retried on the next tick.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let window = Duration::from_secs(self.confirmation_timeout_secs);

        let result = timeout(window, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed");
                        continue;
                    }
                };

                if !receipt.status() {
                    return ConfirmationStatus::Failed("Transaction reverted".to_string());
                }

                return ConfirmationStatus::Confirmed {
                    block_number: receipt.block_number.unwrap_or_default(),
                };
            }
        })
        .await;

        result.map_err(|_| BlockchainError::ConfirmationTimeout(self.confirmation_timeout_secs))
    }

    pub fn address(&self) -> Address {
        self.from
    }
}
