//! RPC Chain Client - Transaction Lifecycle over alloy-rs
//!
//! Implements the `ChainClient` port: native balance reads, gas pricing,
//! signed submission through the provider's wallet filler, and bounded
//! receipt polling with a fixed interval and deadline.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument};

use crate::domain::{DepositError, TransactionOutcome, TxStatus};
use crate::ports::chain_client::ChainClient;

use super::provider::ScrollProvider;

/// Polling parameters for receipt confirmation.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    /// Fixed interval between receipt polls.
    pub poll_interval: Duration,
    /// Deadline after which an unmined transaction times out.
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(250),
        }
    }
}

/// `ChainClient` implementation over the shared Scroll provider.
pub struct RpcChainClient {
    provider: Arc<ScrollProvider>,
    policy: ConfirmationPolicy,
}

impl RpcChainClient {
    pub fn new(provider: Arc<ScrollProvider>, policy: ConfirmationPolicy) -> Self {
        Self { provider, policy }
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn native_balance(&self, owner: Address) -> Result<U256, DepositError> {
        self.provider
            .inner()
            .get_balance(owner)
            .await
            .map_err(|e| DepositError::Rpc(format!("eth_getBalance failed: {e}")))
    }

    #[instrument(skip(self))]
    async fn gas_price(&self) -> Result<u128, DepositError> {
        let price = self
            .provider
            .inner()
            .get_gas_price()
            .await
            .map_err(|e| DepositError::Rpc(format!("eth_gasPrice failed: {e}")))?;

        debug!(gas_price_wei = price, "Gas price fetched");
        Ok(price)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, DepositError> {
        self.provider
            .inner()
            .estimate_gas(tx)
            .await
            .map_err(|e| DepositError::Estimation(format!("eth_estimateGas rejected: {e}")))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, DepositError> {
        let pending = self
            .provider
            .inner()
            .send_transaction(tx)
            .await
            .map_err(|e| DepositError::Submission(format!("eth_sendRawTransaction failed: {e}")))?;

        Ok(*pending.tx_hash())
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionOutcome, DepositError> {
        let started = Instant::now();
        let deadline = started + self.policy.timeout;

        loop {
            let receipt = self
                .provider
                .inner()
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| {
                    DepositError::Rpc(format!("eth_getTransactionReceipt failed: {e}"))
                })?;

            if let Some(receipt) = receipt {
                if receipt.status() {
                    return Ok(TransactionOutcome {
                        tx_hash,
                        status: TxStatus::Confirmed,
                        block_number: receipt.block_number,
                        gas_used: u64::try_from(receipt.gas_used).ok(),
                    });
                }
                return Err(DepositError::Reverted { tx_hash });
            }

            if Instant::now() >= deadline {
                return Err(DepositError::ConfirmationTimeout {
                    tx_hash,
                    waited_secs: started.elapsed().as_secs(),
                });
            }

            debug!("Receipt not yet available, polling again");
            sleep(self.policy.poll_interval).await;
        }
    }

    async fn is_healthy(&self) -> bool {
        self.provider.is_healthy().await
    }
}
