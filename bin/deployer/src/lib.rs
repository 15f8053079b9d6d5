pub mod config;

use crate::config::Config;
use action::{
    create::{CreateToken, CreateTokenAction},
    Action,
};
use alloy_primitives::{utils::format_units, Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_signer_local::PrivateKeySigner;
use binding::{abi::FactoryAbi, token::ERC20};
use tracing::info;

/// Token parameters given on the command line.
#[derive(Debug, Clone)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub protocol: String,
    /// Defaults to the signer
    pub owner: Option<Address>,
    /// Defaults to the signer
    pub admin: Option<Address>,
}

/// A token deployed through the factory.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub token: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

/// On-chain metadata of an ERC20 token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

impl TokenInfo {
    /// Total supply scaled by the token decimals.
    pub fn formatted_supply(&self) -> eyre::Result<String> {
        Ok(format_units(self.total_supply, self.decimals)?)
    }
}

/// Call the factory's `create` and wait for the new token address.
pub async fn create_token<P>(
    provider: P,
    signer: PrivateKeySigner,
    config: &Config,
    params: TokenParams,
) -> eyre::Result<Deployment>
where
    P: Provider + Clone + 'static,
{
    let network = config.network_config();

    let abi = FactoryAbi::from_file(&config.abi_path)?;
    info!(
        path = %config.abi_path.display(),
        signature = %abi.create_signature(),
        selector = %abi.create_selector(),
        "Loaded factory ABI"
    );

    let sender = signer.address();
    let signer_fn = client::local_signer_fn(signer, provider.clone(), config.gas_options());

    let create = CreateToken {
        factory: network.factory,
        sender,
        name: params.name,
        symbol: params.symbol,
        decimals: params.decimals,
        owner: params.owner.unwrap_or(sender),
        protocol: params.protocol,
        admin: params.admin.unwrap_or(sender),
        token_log_index: config.token_log_index,
        tx_hash: None,
    };

    let mut action = CreateTokenAction::new(provider, signer_fn, create)
        .with_receipt_policy(config.receipt_policy());
    info!("{}", action.description());

    if !action.is_ready().await? {
        eyre::bail!(
            "Create not ready: check the token parameters and that {} holds native balance for gas",
            sender
        );
    }

    let result = action.execute().await?;
    let Some(token) = result.created else {
        eyre::bail!("Transaction {} did not report a token address", result.tx_hash);
    };

    Ok(Deployment {
        token,
        tx_hash: result.tx_hash,
        block_number: result.block_number,
        gas_used: result.gas_used,
    })
}

/// Read name, symbol, decimals and supply of a deployed token.
pub async fn inspect_token<P>(provider: &P, token: Address) -> eyre::Result<TokenInfo>
where
    P: Provider,
{
    let contract = ERC20::new(token, provider);

    let name = contract.name().call().await?;
    let symbol = contract.symbol().call().await?;
    let decimals = contract.decimals().call().await?;
    let total_supply = contract.totalSupply().call().await?;

    Ok(TokenInfo {
        address: token,
        name,
        symbol,
        decimals,
        total_supply,
    })
}
