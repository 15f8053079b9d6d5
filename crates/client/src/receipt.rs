//! Receipt polling.
//!
//! After a raw transaction is broadcast the node may take a few blocks to
//! report its receipt. Polling runs at a fixed interval until the receipt
//! shows up, the overall timeout expires, or the node returns a real error.

use crate::ClientError;
use alloy_primitives::TxHash;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionReceipt;
use std::{future::Future, time::Duration};
use tokio_retry::{strategy::FixedInterval, RetryIf};
use tracing::debug;

/// How often and for how long to wait for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    /// Delay between two receipt lookups
    pub poll_interval: Duration,
    /// Give up after this long
    pub timeout: Duration,
}

impl ReceiptPolicy {
    pub const fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// Number of lookups after the first one that fit in the timeout.
    fn retries(&self) -> usize {
        let interval = self.poll_interval.as_millis().max(1);
        (self.timeout.as_millis() / interval) as usize
    }
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(60))
    }
}

/// Call `fetch` until it yields a value.
///
/// `Ok(None)` means "not available yet" and schedules another attempt after
/// `poll_interval`. Any `Err` stops polling and is returned as is.
pub async fn poll_until<T, F, Fut>(policy: &ReceiptPolicy, mut fetch: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ClientError>>,
{
    let strategy = FixedInterval::new(policy.poll_interval).take(policy.retries());

    let polling = RetryIf::start(
        strategy,
        || {
            let lookup = fetch();
            async move { lookup.await?.ok_or(ClientError::ReceiptNotFound) }
        },
        |e: &ClientError| {
            let pending = matches!(e, ClientError::ReceiptNotFound);
            if pending {
                debug!("Receipt not available yet");
            }
            pending
        },
    );

    match tokio::time::timeout(policy.timeout, polling).await {
        Ok(Err(ClientError::ReceiptNotFound)) | Err(_) => {
            Err(ClientError::ReceiptTimeout(policy.timeout))
        }
        Ok(result) => result,
    }
}

/// Wait for the receipt of `tx_hash`.
pub async fn wait_for_receipt<P>(
    provider: &P,
    tx_hash: TxHash,
    policy: &ReceiptPolicy,
) -> Result<TransactionReceipt, ClientError>
where
    P: Provider,
{
    poll_until(policy, || async move {
        provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))
    })
    .await
}
