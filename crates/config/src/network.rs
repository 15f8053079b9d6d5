//! Network configuration for the token factory.
//!
//! Provides the RPC endpoint and factory contract address for each BEVM
//! network (mainnet, testnet).

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// BEVM mainnet JSON-RPC endpoint.
pub const BEVM_MAINNET_RPC_URL: &str = "https://mainnet.chainx.org/rpc";

/// BEVM testnet JSON-RPC endpoint.
pub const BEVM_TESTNET_RPC_URL: &str = "https://testnet3.chainx.org/rpc";

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    #[default]
    Testnet,
}

/// Returned when a network name is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown network `{0}`, expected `mainnet` or `testnet`")]
pub struct NetworkParseError(pub String);

impl FromStr for NetworkType {
    type Err = NetworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            _ => Err(NetworkParseError(s.to_string())),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Testnet => f.write_str("testnet"),
        }
    }
}

/// Complete network configuration for calling the token factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// JSON-RPC endpoint url
    pub rpc_url: String,
    /// ERC20 factory contract address
    pub factory: Address,
}

impl NetworkConfig {
    /// BEVM mainnet configuration.
    pub fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            rpc_url: BEVM_MAINNET_RPC_URL.to_string(),
            factory: address!("0x124e3E8D56db6ADA37aF2b7662F275D49BA850e6"),
        }
    }

    /// BEVM testnet configuration.
    pub fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            rpc_url: BEVM_TESTNET_RPC_URL.to_string(),
            factory: address!("0xeB789d5f6f66104AE9876175A5B9A03bDa0545A8"),
        }
    }

    /// Create configuration from network type.
    pub fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub fn mainnet() -> Self {
        Self::from_network_type(NetworkType::Mainnet)
    }

    /// Start with testnet defaults.
    pub fn testnet() -> Self {
        Self::from_network_type(NetworkType::Testnet)
    }

    /// Start with the defaults of the given network.
    pub fn from_network_type(network_type: NetworkType) -> Self {
        Self {
            config: NetworkConfig::from_network_type(network_type),
        }
    }

    /// Override the RPC endpoint.
    pub fn rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.config.rpc_url = rpc_url.into();
        self
    }

    /// Override the factory contract address.
    pub const fn factory(mut self, address: Address) -> Self {
        self.config.factory = address;
        self
    }

    /// Build the network configuration.
    pub fn build(self) -> NetworkConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.rpc_url, "https://mainnet.chainx.org/rpc");
        assert_eq!(
            config.factory,
            address!("124e3E8D56db6ADA37aF2b7662F275D49BA850e6")
        );
        assert_eq!(config.network_type, NetworkType::Mainnet);
    }

    #[test]
    fn test_testnet_config() {
        let config = NetworkConfig::testnet();
        assert_eq!(config.rpc_url, "https://testnet3.chainx.org/rpc");
        assert_eq!(
            config.factory,
            address!("eB789d5f6f66104AE9876175A5B9A03bDa0545A8")
        );
        assert_eq!(config.network_type, NetworkType::Testnet);
    }

    #[test]
    fn test_default_network_is_testnet() {
        assert_eq!(NetworkType::default(), NetworkType::Testnet);
    }

    #[test]
    fn test_parse_network_type() {
        assert_eq!("mainnet".parse(), Ok(NetworkType::Mainnet));
        assert_eq!("TestNet".parse(), Ok(NetworkType::Testnet));

        let err = "sepolia".parse::<NetworkType>().unwrap_err();
        assert_eq!(err, NetworkParseError("sepolia".to_string()));
        assert!(err.to_string().contains("sepolia"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for network in [NetworkType::Mainnet, NetworkType::Testnet] {
            assert_eq!(network.to_string().parse(), Ok(network));
        }
    }

    #[test]
    fn test_custom_config_builder() {
        let custom_factory = address!("1111111111111111111111111111111111111111");

        let config = NetworkConfigBuilder::mainnet()
            .rpc_url("http://localhost:8545")
            .factory(custom_factory)
            .build();

        assert_eq!(config.factory, custom_factory);
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.network_type, NetworkType::Mainnet);
    }

    #[test]
    fn test_builder_without_overrides_matches_preset() {
        assert_eq!(NetworkConfigBuilder::testnet().build(), NetworkConfig::testnet());
    }
}
