//! CLI for deploying ERC20 tokens through the BEVM token factory.
//!
//! - `create`: call the factory's `create` and print the new token address
//! - `inspect`: print the metadata of a deployed token

use action::create::{DEFAULT_DECIMALS, DEFAULT_PROTOCOL};
use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use config::NetworkType;
use deployer::{config::Config, create_token, inspect_token, TokenParams};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "erc20-factory")]
#[command(about = "Deploy ERC20 tokens through the BEVM token factory")]
struct Cli {
    /// Path to the configuration file [default: deployer.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network preset (mainnet or testnet)
    #[arg(long)]
    network: Option<NetworkType>,

    /// RPC endpoint, overrides the network preset
    #[arg(long)]
    rpc_url: Option<String>,

    /// Factory contract address, overrides the network preset
    #[arg(long)]
    factory: Option<Address>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy a new ERC20 token through the factory
    Create {
        /// Token name
        #[arg(long)]
        name: String,

        /// Token symbol
        #[arg(long)]
        symbol: String,

        /// Token decimals
        #[arg(long, default_value_t = DEFAULT_DECIMALS)]
        decimals: u8,

        /// Bitcoin asset protocol of the token
        #[arg(long, default_value = DEFAULT_PROTOCOL)]
        protocol: String,

        /// Token owner [default: signer address]
        #[arg(long)]
        owner: Option<Address>,

        /// Token admin [default: signer address]
        #[arg(long)]
        admin: Option<Address>,

        /// Private key for signing transactions (hex string, with or without 0x prefix)
        #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },

    /// Print name, symbol, decimals and total supply of a token
    Inspect {
        /// Token contract address
        token: Address,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout is reserved for the command result
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before parsing, so PRIVATE_KEY may come from .env
    if Path::new(".env").exists() {
        dotenv::dotenv()?;
    }

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = Some(rpc_url);
    }
    if let Some(factory) = cli.factory {
        config.factory_address = Some(factory);
    }
    config.validate()?;

    let network = config.network_config();

    info!("Loaded config:");
    info!("  Network: {}", network.network_type);
    info!("  RPC URL: {}", network.rpc_url);
    info!("  Factory: {}", network.factory);

    let provider = client::create_provider(&network.rpc_url).await?;

    match cli.command {
        Command::Create {
            name,
            symbol,
            decimals,
            protocol,
            owner,
            admin,
            private_key,
        } => {
            let signer = client::parse_private_key(&private_key)?;
            let params = TokenParams {
                name,
                symbol,
                decimals,
                protocol,
                owner,
                admin,
            };

            let deployment = create_token(provider, signer, &config, params).await?;
            info!(
                tx_hash = %deployment.tx_hash,
                block_number = deployment.block_number,
                "Create completed"
            );

            println!("New contract address: {}", deployment.token);
        }
        Command::Inspect { token } => {
            let token = inspect_token(&provider, token).await?;

            println!("Address:      {}", token.address);
            println!("Name:         {}", token.name);
            println!("Symbol:       {}", token.symbol);
            println!("Decimals:     {}", token.decimals);
            println!("Total supply: {}", token.formatted_supply()?);
        }
    }

    Ok(())
}
