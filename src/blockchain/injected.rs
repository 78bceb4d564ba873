//! [`InjectedWallet`] backed by a wallet extension's JSON-RPC endpoint.

use std::future::IntoFuture;
use std::time::Duration;

use alloy::providers::Provider;
use tokio::time::timeout;

use crate::blockchain::client::{http_provider, DynProvider};
use crate::blockchain::types::BlockchainResult;
use crate::network::switch::{InjectedWallet, WalletRpcError};

/// JSON-RPC "internal error", used when the bridge gets no structured reply.
pub const INTERNAL_ERROR_CODE: i64 = -32603;

/// Forwards `wallet_*` requests to an extension over HTTP.
pub struct ExtensionBridge {
    provider: DynProvider,
    timeout_duration: Duration,
}

impl ExtensionBridge {
    pub fn new(url: &str, timeout_duration: Duration) -> BlockchainResult<Self> {
        Ok(Self {
            provider: http_provider(url)?,
            timeout_duration,
        })
    }
}

impl InjectedWallet for ExtensionBridge {
    async fn request(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, WalletRpcError> {
        let call = self
            .provider
            .client()
            .request::<_, serde_json::Value>(method, params)
            .into_future();

        match timeout(self.timeout_duration, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(match e.as_error_resp() {
                Some(payload) => WalletRpcError {
                    code: payload.code,
                    message: payload.message.to_string(),
                },
                None => WalletRpcError {
                    code: INTERNAL_ERROR_CODE,
                    message: e.to_string(),
                },
            }),
            Err(_) => Err(WalletRpcError {
                code: INTERNAL_ERROR_CODE,
                message: format!("{} timed out", method),
            }),
        }
    }
}
