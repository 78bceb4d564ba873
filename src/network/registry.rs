//! Network registry and active-network resolution.

use alloy::primitives::TxHash;
use serde::Serialize;

use crate::config::{NetworkDescriptor, NetworksConfig};

/// Display name when the reported chain id matches no registry entry.
pub const UNKNOWN_NETWORK: &str = "Unknown Network";

/// Badge text when the wallet is on an unsupported chain.
pub const WRONG_NETWORK: &str = "Wrong Network";

/// JSON-RPC error code meaning "this chain has not been added to the wallet".
pub const CHAIN_NOT_ADDED_CODE: i64 = 4902;

/// Which registry slot a descriptor occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    Mainnet,
    Testnet,
}

impl std::str::FromStr for NetworkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(format!("unknown network '{}', expected mainnet or testnet", other)),
        }
    }
}

impl NetworkDescriptor {
    /// `0x`-prefixed hex chain id, as wallets expect it.
    pub fn hex_chain_id(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Block explorer link for a transaction.
    pub fn explorer_tx_url(&self, hash: &TxHash) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), hash)
    }

    /// Parameters for `wallet_switchEthereumChain`.
    pub fn switch_chain_params(&self) -> serde_json::Value {
        serde_json::json!([{ "chainId": self.hex_chain_id() }])
    }

    /// Parameters for `wallet_addEthereumChain`.
    pub fn add_chain_params(&self) -> serde_json::Value {
        serde_json::json!([{
            "chainId": self.hex_chain_id(),
            "chainName": self.name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": [self.explorer_url],
        }])
    }
}

/// Fixed registry of the two supported networks.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    mainnet: NetworkDescriptor,
    testnet: NetworkDescriptor,
}

impl NetworkRegistry {
    pub fn new(mainnet: NetworkDescriptor, testnet: NetworkDescriptor) -> Self {
        Self { mainnet, testnet }
    }

    pub fn from_config(config: &NetworksConfig) -> Self {
        Self::new(config.mainnet.clone(), config.testnet.clone())
    }

    pub fn mainnet(&self) -> &NetworkDescriptor {
        &self.mainnet
    }

    pub fn testnet(&self) -> &NetworkDescriptor {
        &self.testnet
    }

    pub fn get(&self, kind: NetworkKind) -> &NetworkDescriptor {
        match kind {
            NetworkKind::Mainnet => &self.mainnet,
            NetworkKind::Testnet => &self.testnet,
        }
    }

    /// Exact chain id match.
    pub fn resolve(&self, chain_id: u64) -> Option<&NetworkDescriptor> {
        if chain_id == self.mainnet.chain_id {
            Some(&self.mainnet)
        } else if chain_id == self.testnet.chain_id {
            Some(&self.testnet)
        } else {
            None
        }
    }

    /// Derive the display status for a reported chain id.
    pub fn status(&self, chain_id: Option<u64>) -> NetworkStatus {
        let active = chain_id.and_then(|id| self.resolve(id));
        NetworkStatus {
            chain_id,
            is_correct_network: active.is_some(),
            is_mainnet: chain_id == Some(self.mainnet.chain_id),
            name: active.map(|n| n.name.clone()),
            native_symbol: active.map(|n| n.native_currency.symbol.clone()),
        }
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::from_config(&NetworksConfig::default())
    }
}

/// Values derived from the chain client's reported chain id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStatus {
    pub chain_id: Option<u64>,
    pub is_correct_network: bool,
    pub is_mainnet: bool,
    /// Matched descriptor name.
    pub name: Option<String>,
    pub native_symbol: Option<String>,
}

impl NetworkStatus {
    /// Matched network name, or the unknown-network sentinel.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NETWORK)
    }

    /// Status badge text: the network name, or the wrong-network sentinel.
    pub fn badge(&self) -> &str {
        self.name.as_deref().unwrap_or(WRONG_NETWORK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_networks() {
        let registry = NetworkRegistry::default();

        let main = registry.status(Some(1_440_000));
        assert!(main.is_correct_network);
        assert!(main.is_mainnet);
        assert_eq!(main.display_name(), "XRPL EVM Mainnet");

        let test = registry.status(Some(1_449_000));
        assert!(test.is_correct_network);
        assert!(!test.is_mainnet);
        assert_eq!(test.badge(), "XRPL EVM Testnet");
        assert_eq!(test.native_symbol.as_deref(), Some("XRP"));
    }

    #[test]
    fn test_unregistered_chain_ids_are_wrong_network() {
        let registry = NetworkRegistry::default();
        for id in [0u64, 1, 137, 31337, 1_440_001, 1_448_999, u64::MAX] {
            let status = registry.status(Some(id));
            assert!(!status.is_correct_network, "chain {id}");
            assert!(!status.is_mainnet);
            assert_eq!(status.display_name(), UNKNOWN_NETWORK);
            assert_eq!(status.badge(), WRONG_NETWORK);
        }

        let none = registry.status(None);
        assert!(!none.is_correct_network);
        assert_eq!(none.display_name(), UNKNOWN_NETWORK);
    }

    #[test]
    fn test_chain_params() {
        let registry = NetworkRegistry::default();
        let main = registry.mainnet();
        assert_eq!(main.hex_chain_id(), "0x15f900");

        let add = main.add_chain_params();
        assert_eq!(add[0]["chainId"], "0x15f900");
        assert_eq!(add[0]["nativeCurrency"]["decimals"], 18);
        assert_eq!(add[0]["rpcUrls"][0], "https://rpc.xrplevm.org");
        assert_eq!(add[0]["blockExplorerUrls"][0], "https://explorer.xrplevm.org");

        assert_eq!(main.switch_chain_params()[0]["chainId"], "0x15f900");
    }

    #[test]
    fn test_explorer_url() {
        let registry = NetworkRegistry::default();
        let hash = TxHash::repeat_byte(0xab);
        let url = registry.testnet().explorer_tx_url(&hash);
        assert_eq!(url, format!("https://explorer.testnet.xrplevm.org/tx/{}", hash));
    }

    #[test]
    fn test_network_kind_parse() {
        assert_eq!("Mainnet".parse::<NetworkKind>(), Ok(NetworkKind::Mainnet));
        assert!("devnet".parse::<NetworkKind>().is_err());
    }
}
