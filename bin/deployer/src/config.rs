use ::config::{NetworkConfig, NetworkConfigBuilder, NetworkType};
use action::create::DEFAULT_TOKEN_LOG_INDEX;
use alloy_primitives::Address;
use client::{GasOptions, ReceiptPolicy, DEFAULT_FALLBACK_GAS_LIMIT};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "deployer.toml";

/// Contract interface description of the factory.
pub const DEFAULT_ABI_PATH: &str = "abis/BitcoinAssetsErc20Factory.json";

/// Smallest gas limit any transaction can have.
const MIN_GAS_LIMIT: u64 = 21_000;

/// Top-level deployer configuration.
///
/// Every field is optional in the file; unset endpoint and factory fall back
/// to the preset of the selected network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Network preset
    pub network: NetworkType,

    /// RPC endpoint url, overrides the preset
    pub rpc_url: Option<String>,

    /// ERC20 factory address, overrides the preset
    pub factory_address: Option<Address>,

    /// JSON ABI of the factory
    pub abi_path: PathBuf,

    /// Gas limit used when estimation fails
    pub fallback_gas_limit: u64,

    /// Extra percentage on top of the gas estimate
    pub gas_buffer_percent: u64,

    /// Seconds between receipt lookups
    pub receipt_poll_interval_secs: u64,

    /// Seconds to wait for the receipt before giving up
    pub receipt_timeout_secs: u64,

    /// Receipt log carrying the new token address
    pub token_log_index: usize,
}

impl Default for Config {
    fn default() -> Self {
        let receipt = ReceiptPolicy::default();

        Self {
            network: NetworkType::default(),
            rpc_url: None,
            factory_address: None,
            abi_path: PathBuf::from(DEFAULT_ABI_PATH),
            fallback_gas_limit: DEFAULT_FALLBACK_GAS_LIMIT,
            gas_buffer_percent: 0,
            receipt_poll_interval_secs: receipt.poll_interval.as_secs(),
            receipt_timeout_secs: receipt.timeout.as_secs(),
            token_log_index: DEFAULT_TOKEN_LOG_INDEX,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;

        Ok(config)
    }

    /// Load `path`, or `deployer.toml` when present, or the defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if self.receipt_poll_interval_secs == 0 {
            eyre::bail!("receipt_poll_interval_secs must be greater than zero");
        }

        if self.receipt_timeout_secs < self.receipt_poll_interval_secs {
            eyre::bail!("receipt_timeout_secs must not be shorter than receipt_poll_interval_secs");
        }

        if self.fallback_gas_limit < MIN_GAS_LIMIT {
            eyre::bail!("fallback_gas_limit must be at least {}", MIN_GAS_LIMIT);
        }

        if self.factory_address == Some(Address::ZERO) {
            eyre::bail!("factory_address must not be zero");
        }

        Ok(())
    }

    /// Network preset with the configured overrides applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut builder = NetworkConfigBuilder::from_network_type(self.network);

        if let Some(rpc_url) = &self.rpc_url {
            builder = builder.rpc_url(rpc_url.clone());
        }

        if let Some(factory) = self.factory_address {
            builder = builder.factory(factory);
        }

        builder.build()
    }

    pub const fn gas_options(&self) -> GasOptions {
        GasOptions {
            fallback_gas_limit: self.fallback_gas_limit,
            gas_buffer_percent: self.gas_buffer_percent,
        }
    }

    pub const fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy::new(
            Duration::from_secs(self.receipt_poll_interval_secs),
            Duration::from_secs(self.receipt_timeout_secs),
        )
    }
}
