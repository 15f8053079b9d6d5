//! Configuration types for the ERC20 factory tool.
//!
//! This crate provides:
//! - Network presets (BEVM mainnet, BEVM testnet)
//! - The factory contract address for each network
//! - A builder for overriding the presets

pub mod network;

pub use network::{NetworkConfig, NetworkConfigBuilder, NetworkParseError, NetworkType};
