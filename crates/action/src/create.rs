use crate::{Action, SignerFn};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_sol_types::SolCall;
use binding::factory::IBitcoinAssetsErc20Factory::createCall;
use client::{wait_for_receipt, ReceiptPolicy};
use tracing::info;

/// Default index of the factory log that carries the new token address.
pub const DEFAULT_TOKEN_LOG_INDEX: usize = 2;

/// Default Bitcoin asset protocol tag.
pub const DEFAULT_PROTOCOL: &str = "brc-20";

/// Default token decimals.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Input for a create action.
#[derive(Debug, Clone)]
pub struct CreateToken {
    /// ERC20 factory contract address
    pub factory: Address,
    /// Account signing the transaction
    pub sender: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Initial owner of the new token
    pub owner: Address,
    /// Bitcoin asset protocol the token mirrors, e.g. "brc-20"
    pub protocol: String,
    /// Admin of the new token
    pub admin: Address,
    /// Index of the receipt log whose data ends with the new token address
    pub token_log_index: usize,
    /// Optional: only exists once the create transaction was submitted
    pub tx_hash: Option<TxHash>,
}

impl CreateToken {
    /// ABI-encoded `create` call.
    pub fn calldata(&self) -> Bytes {
        createCall {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            owner: self.owner,
            protocol: self.protocol.clone(),
            admin: self.admin,
        }
        .abi_encode()
        .into()
    }
}

/// Create action for deploying a new ERC20 through the factory.
pub struct CreateTokenAction<P> {
    provider: P,
    signer: SignerFn,
    create: CreateToken,
    receipt_policy: ReceiptPolicy,
}

impl<P> CreateTokenAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, create: CreateToken) -> Self {
        Self {
            provider,
            signer,
            create,
            receipt_policy: ReceiptPolicy::default(),
        }
    }

    /// Override how long to wait for the receipt.
    pub const fn with_receipt_policy(mut self, receipt_policy: ReceiptPolicy) -> Self {
        self.receipt_policy = receipt_policy;
        self
    }

    /// Hash of the submitted create transaction, if any.
    pub const fn tx_hash(&self) -> Option<TxHash> {
        self.create.tx_hash
    }

    fn validate_create(&self) -> eyre::Result<()> {
        if self.create.factory == Address::ZERO {
            eyre::bail!("Factory must not be zero");
        }

        if self.create.sender == Address::ZERO {
            eyre::bail!("Sender must not be zero");
        }

        if self.create.name.trim().is_empty() {
            eyre::bail!("Token name must not be empty");
        }

        if self.create.symbol.trim().is_empty() {
            eyre::bail!("Token symbol must not be empty");
        }

        if self.create.owner == Address::ZERO {
            eyre::bail!("Owner must not be zero");
        }

        if self.create.admin == Address::ZERO {
            eyre::bail!("Admin must not be zero");
        }

        Ok(())
    }

    /// Unsigned call to the factory. The signer fills nonce, gas and chain id.
    fn transaction_request(&self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.create.sender)
            .with_to(self.create.factory)
            .with_value(U256::ZERO)
            .with_input(self.create.calldata())
    }
}

impl<P> Action for CreateTokenAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.validate_create().is_err() {
            return Ok(false);
        }

        let balance = self.provider.get_balance(self.create.sender).await?;
        Ok(!balance.is_zero())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let Some(tx_hash) = self.create.tx_hash else {
            return Ok(false);
        };

        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(false);
        };

        Ok(receipt.status())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate_create()?;

        if self.is_completed().await? {
            eyre::bail!("Token already created");
        }

        let signed = (self.signer)(self.transaction_request()).await?;
        let pending = self.provider.send_raw_transaction(&signed).await?;

        let tx_hash = *pending.tx_hash();
        self.create.tx_hash = Some(tx_hash);
        info!(tx_hash = %tx_hash, "Create transaction submitted");

        let receipt = wait_for_receipt(&self.provider, tx_hash, &self.receipt_policy).await?;
        if !receipt.status() {
            eyre::bail!("Transaction {} reverted", tx_hash);
        }

        let token = created_token_address(&receipt, self.create.token_log_index)?;
        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            token = %token,
            "Token created."
        );

        Ok(crate::Result {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: Some(U256::from(receipt.gas_used)),
            created: Some(token),
        })
    }

    fn description(&self) -> String {
        format!(
            "Create {} token {} ({}, {} decimals) via factory {} for owner {}",
            self.create.protocol,
            self.create.name,
            self.create.symbol,
            self.create.decimals,
            self.create.factory,
            self.create.owner,
        )
    }
}

/// Read the new token address from the factory log at `log_index`.
pub fn created_token_address(
    receipt: &TransactionReceipt,
    log_index: usize,
) -> eyre::Result<Address> {
    let logs = receipt.logs();
    let Some(log) = logs.get(log_index) else {
        eyre::bail!(
            "Receipt has {} logs, expected token creation log at index {}",
            logs.len(),
            log_index
        );
    };

    token_address_from_log_data(&log.inner.data.data).ok_or_else(|| {
        eyre::eyre!(
            "Log {} of {} does not carry a token address",
            log_index,
            receipt.transaction_hash
        )
    })
}

/// The token address is the last 20 bytes of the log data.
pub fn token_address_from_log_data(data: &[u8]) -> Option<Address> {
    const ADDRESS_LEN: usize = 20;

    if data.len() < ADDRESS_LEN {
        return None;
    }

    let address = Address::from_slice(&data[data.len() - ADDRESS_LEN..]);
    (!address.is_zero()).then_some(address)
}
