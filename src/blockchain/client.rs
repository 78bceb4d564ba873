//! JSON-RPC read client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to the primary and failover JSON-RPC endpoints
//! - Query chain state (chain id, block number, balances, receipts)
//! - Bound every call with a timeout and fall through to the next endpoint

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::TransportResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::ChainConfig;

pub type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Parse an RPC URL and build an HTTP provider for it.
pub fn http_provider(rpc_url: &str) -> BlockchainResult<DynProvider> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
    Ok(Arc::new(ProviderBuilder::new().connect_http(url)))
}

/// Read-only RPC client over a primary endpoint plus failovers.
#[derive(Clone)]
pub struct BlockchainClient {
    providers: Vec<DynProvider>,
    rpc_url: String,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Build providers for `rpc_url` and every parseable failover URL.
    ///
    /// No network traffic happens here; reachability is the connection
    /// monitor's job.
    pub fn new(config: &ChainConfig) -> BlockchainResult<Self> {
        let mut providers = vec![http_provider(&config.rpc_url)?];

        for url_str in &config.failover_urls {
            match http_provider(url_str) {
                Ok(p) => providers.push(p),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            "Chain RPC client initialized"
        );

        Ok(Self {
            providers,
            rpc_url: config.rpc_url.clone(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Run `call` against each provider in order until one answers in time.
    async fn with_failover<T, F, Fut>(&self, op: &'static str, call: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, op, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, op, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc(format!("All RPC providers failed: {}", op)))
    }

    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        self.with_failover("get_chain_id", |p| async move { p.get_chain_id().await })
            .await
    }

    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.with_failover("get_block_number", |p| async move { p.get_block_number().await })
            .await
    }

    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.with_failover("get_balance", |p| async move { p.get_balance(address).await })
            .await
    }

    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.with_failover("get_transaction_receipt", |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_duration
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("providers", &self.providers.len())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ChainConfig {
        ChainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..ChainConfig::default()
        }
    }

    #[test]
    fn test_client_creation_is_offline() {
        let client = BlockchainClient::new(&test_config()).unwrap();
        assert_eq!(client.rpc_url(), "http://127.0.0.1:1");
        assert_eq!(client.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_primary_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = BlockchainClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_rpc_failover_exhausted() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        config.failover_urls.push("::bad::".to_string());

        let client = BlockchainClient::new(&config).unwrap();
        assert_eq!(client.providers.len(), 2);

        let err = client.get_chain_id().await.unwrap_err();
        assert!(err.to_string().contains("All RPC providers failed"));
    }
}
