
use action::create::{DEFAULT_DECIMALS, DEFAULT_PROTOCOL};
use alloy_provider::Provider;
use binding::abi::FactoryAbi;
use config::NetworkConfig;
use deployer::{create_token, inspect_token, TokenParams};
use setup::{load_test_config, setup_provider, setup_signer};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique, short symbol so repeated runs do not collide.
fn test_symbol() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    format!("T{}", secs % 100_000)
}

#[test]
fn test_config_selects_testnet_factory() {
    let config = load_test_config();
    let network = config.network_config();

    assert_eq!(network, NetworkConfig::testnet());
    assert_eq!(config.token_log_index, 2);
}

#[test]
fn test_bundled_abi_loads() {
    let config = load_test_config();

    let abi = FactoryAbi::from_file(&config.abi_path).expect("Failed to load factory ABI");
    assert_eq!(
        abi.create_signature(),
        "create(string,string,uint8,address,string,address)"
    );
}

#[tokio::test]
#[ignore = "requires BEVM testnet access"]
async fn test_factory_is_deployed() -> eyre::Result<()> {
    let config = load_test_config();
    let network = config.network_config();
    let provider = setup_provider(&config).await;

    println!("RPC URL: {}", network.rpc_url);
    println!("Factory: {}", network.factory);

    let code = provider.get_code_at(network.factory).await?;
    println!("Factory code size: {} bytes", code.len());

    assert!(!code.is_empty(), "factory should have code");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a funded BEVM testnet key"]
async fn test_create_token() -> eyre::Result<()> {
    let config = load_test_config();
    let provider = setup_provider(&config).await;
    let signer = setup_signer();
    let sender = signer.address();

    let symbol = test_symbol();
    let params = TokenParams {
        name: symbol.clone(),
        symbol: symbol.clone(),
        decimals: DEFAULT_DECIMALS,
        protocol: DEFAULT_PROTOCOL.to_string(),
        owner: None,
        admin: None,
    };

    println!("\n=== Create Test ===");
    println!("Sender: {}", sender);
    println!("Symbol: {}", symbol);

    let deployment = create_token(provider.clone(), signer, &config, params).await?;

    println!("✓ Token created");
    println!("Tx hash: {}", deployment.tx_hash);
    println!("Token: {}", deployment.token);

    let info = inspect_token(&provider, deployment.token).await?;
    assert_eq!(info.symbol, symbol);
    assert_eq!(info.name, symbol);
    assert_eq!(info.decimals, DEFAULT_DECIMALS);

    Ok(())
}

#[tokio::test]
#[ignore = "requires BEVM testnet access"]
async fn test_inspect_rejects_non_token() {
    let config = load_test_config();
    let provider = setup_provider(&config).await;

    // An address without code cannot answer ERC20 calls
    let result = inspect_token(&provider, alloy_primitives::Address::repeat_byte(0x11)).await;
    assert!(result.is_err());
}
