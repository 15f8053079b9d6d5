mod receipt;

use alloy_consensus::TxEnvelope;
use alloy_network::{eip2718::Encodable2718, EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
pub use receipt::{poll_until, wait_for_receipt, ReceiptPolicy};
use std::{future::Future, pin::Pin, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

/// Gas limit used when `eth_estimateGas` fails.
pub const DEFAULT_FALLBACK_GAS_LIMIT: u64 = 2_200_000;

/// A function that signs a transaction request and returns signed bytes.
pub type SignerFn = Arc<
    dyn Fn(TransactionRequest) -> Pin<Box<dyn Future<Output = eyre::Result<Bytes>> + Send>>
        + Send
        + Sync,
>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error talking to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The transaction could not be built or signed
    #[error("Signing error: {0}")]
    Signing(String),

    /// The node does not know the receipt yet
    #[error("Transaction receipt not found")]
    ReceiptNotFound,

    /// The receipt did not show up in time
    #[error("Transaction receipt was not found within {0:?}")]
    ReceiptTimeout(Duration),

    /// General error with context
    #[error("Client error: {0}")]
    Other(String),
}

/// Gas limit settings applied while filling a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasOptions {
    /// Gas limit to use when estimation fails
    pub fallback_gas_limit: u64,
    /// Extra percentage added on top of the estimate
    pub gas_buffer_percent: u64,
}

impl GasOptions {
    /// Apply the configured buffer to an estimate.
    pub const fn buffered(&self, estimate: u64) -> u64 {
        estimate.saturating_add(estimate.saturating_mul(self.gas_buffer_percent) / 100)
    }
}

impl Default for GasOptions {
    fn default() -> Self {
        Self {
            fallback_gas_limit: DEFAULT_FALLBACK_GAS_LIMIT,
            gas_buffer_percent: 0,
        }
    }
}

/// Convenience function to create an ethereum rpc provider from url.
pub async fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Parse a hex encoded private key, with or without `0x` prefix.
pub fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner, ClientError> {
    private_key
        .trim()
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))
}

/// Create a SignerFn from a local private key and provider.
///
/// The provider is used to fill transaction fields (nonce, gas price, chain id,
/// gas limit) before signing a legacy EIP-155 transaction locally.
pub fn local_signer_fn<P>(signer: PrivateKeySigner, provider: P, options: GasOptions) -> SignerFn
where
    P: Provider + Clone + 'static,
{
    let from_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    Arc::new(move |tx: TransactionRequest| {
        let wallet = wallet.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from_address, &options).await?;
            Ok(sign_transaction(filled_tx, &wallet).await?)
        })
    })
}

/// Sign a fully filled request and return its EIP-2718 encoding.
pub async fn sign_transaction(
    tx: TransactionRequest,
    wallet: &EthereumWallet,
) -> Result<Bytes, ClientError> {
    let tx_envelope: TxEnvelope = tx
        .build(wallet)
        .await
        .map_err(|e| ClientError::Signing(e.to_string()))?;

    let mut encoded = Vec::new();
    tx_envelope.encode_2718(&mut encoded);
    Ok(Bytes::from(encoded))
}

/// Fill missing transaction fields using the provider.
///
/// Fields already set on `tx` are left untouched.
pub async fn fill_transaction<P>(
    mut tx: TransactionRequest,
    provider: &P,
    from: Address,
    options: &GasOptions,
) -> eyre::Result<TransactionRequest>
where
    P: Provider,
{
    if tx.from.is_none() {
        tx.from = Some(from);
    }

    // Pending count so queued transactions from the same key are not replaced
    let nonce = match tx.nonce {
        Some(nonce) => nonce,
        None => provider.get_transaction_count(from).pending().await?,
    };
    tx.nonce = Some(nonce);

    // Gas price before estimation, the node may need it to price the call
    if tx.gas_price.is_none() {
        tx.gas_price = Some(provider.get_gas_price().await?);
    }

    let chain_id = match tx.chain_id {
        Some(chain_id) => chain_id,
        None => provider.get_chain_id().await?,
    };
    tx.chain_id = Some(chain_id);

    if tx.gas.is_none() {
        let gas_limit = match provider.estimate_gas(tx.clone()).await {
            Ok(estimate) => options.buffered(estimate),
            Err(e) => {
                warn!(
                    error = %e,
                    fallback_gas_limit = options.fallback_gas_limit,
                    "Failed to estimate gas, falling back to default gas limit"
                );
                options.fallback_gas_limit
            }
        };
        tx.gas = Some(gas_limit);
    }

    info!(
        from = %from,
        nonce,
        chain_id,
        gas_price = ?tx.gas_price,
        gas_limit = ?tx.gas,
        "Transaction filled"
    );

    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use alloy_provider::mock::Asserter;

    // Well-known anvil/hardhat dev key #0
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url").await;
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_private_key() {
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();

        let with_prefix = parse_private_key(DEV_KEY).unwrap();
        let without_prefix = parse_private_key(DEV_KEY.trim_start_matches("0x")).unwrap();

        assert_eq!(with_prefix.address(), expected);
        assert_eq!(without_prefix.address(), expected);
    }

    #[test]
    fn test_parse_private_key_trims_whitespace() {
        let key = format!("  {DEV_KEY}\n");
        assert!(parse_private_key(&key).is_ok());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = parse_private_key("0x1234");
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_gas_options_default() {
        let options = GasOptions::default();
        assert_eq!(options.fallback_gas_limit, 2_200_000);
        assert_eq!(options.buffered(100_000), 100_000);
    }

    #[test]
    fn test_gas_buffer() {
        let options = GasOptions {
            gas_buffer_percent: 20,
            ..Default::default()
        };
        assert_eq!(options.buffered(100_000), 120_000);
        assert_eq!(options.buffered(u64::MAX), u64::MAX);
    }

    fn dev_wallet() -> EthereumWallet {
        EthereumWallet::from(parse_private_key(DEV_KEY).unwrap())
    }

    fn call_request() -> TransactionRequest {
        TransactionRequest::default()
            .with_to(Address::repeat_byte(1))
            .with_value(U256::ZERO)
            .with_input(Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]))
    }

    #[tokio::test]
    async fn test_fill_transaction_falls_back_when_estimate_fails() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());

        asserter.push_success(&"0x5"); // eth_getTransactionCount (pending)
        asserter.push_success(&"0x3b9aca00"); // eth_gasPrice
        asserter.push_success(&"0x2ced"); // eth_chainId
        asserter.push_failure_msg("execution reverted"); // eth_estimateGas

        let from = Address::repeat_byte(2);
        let tx = fill_transaction(call_request(), &provider, from, &GasOptions::default())
            .await
            .unwrap();

        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.nonce, Some(5));
        assert_eq!(tx.gas_price, Some(1_000_000_000));
        assert_eq!(tx.chain_id, Some(0x2ced));
        assert_eq!(tx.gas, Some(DEFAULT_FALLBACK_GAS_LIMIT));
    }

    #[tokio::test]
    async fn test_fill_transaction_buffers_estimate() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());

        asserter.push_success(&"0x0");
        asserter.push_success(&"0x1");
        asserter.push_success(&"0x1");
        asserter.push_success(&"0x186a0"); // 100_000

        let options = GasOptions {
            gas_buffer_percent: 20,
            ..Default::default()
        };
        let tx = fill_transaction(call_request(), &provider, Address::repeat_byte(2), &options)
            .await
            .unwrap();

        assert_eq!(tx.gas, Some(120_000));
    }

    #[tokio::test]
    async fn test_fill_transaction_keeps_existing_fields() {
        // No responses queued: any RPC call would fail
        let provider = ProviderBuilder::new().connect_mocked_client(Asserter::new());

        let tx = call_request()
            .with_nonce(9)
            .with_gas_price(7)
            .with_chain_id(1)
            .with_gas_limit(50_000);

        let filled = fill_transaction(tx, &provider, Address::repeat_byte(2), &GasOptions::default())
            .await
            .unwrap();

        assert_eq!(filled.nonce, Some(9));
        assert_eq!(filled.gas_price, Some(7));
        assert_eq!(filled.chain_id, Some(1));
        assert_eq!(filled.gas, Some(50_000));
    }

    #[tokio::test]
    async fn test_sign_transaction_legacy() {
        let tx = call_request()
            .with_nonce(0)
            .with_gas_price(1_000_000_000)
            .with_chain_id(1)
            .with_gas_limit(100_000);

        let signed = sign_transaction(tx, &dev_wallet()).await.unwrap();

        // legacy transactions are a bare RLP list, no type byte
        assert!(signed[0] >= 0xc0);
    }

    #[tokio::test]
    async fn test_sign_transaction_incomplete_request() {
        let tx = TransactionRequest::default().with_input(Bytes::from_static(&[0x01]));

        let result = sign_transaction(tx, &dev_wallet()).await;
        assert!(matches!(result, Err(ClientError::Signing(_))));
    }
}
