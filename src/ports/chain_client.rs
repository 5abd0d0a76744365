//! Chain Client Port - On-chain Transaction Lifecycle Interface
//!
//! Defines the trait for interacting with the Scroll network: native
//! balance reads, gas pricing, transaction submission, and bounded
//! receipt polling. Uses alloy-rs.

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::domain::{DepositError, TransactionOutcome};

/// Trait for on-chain interactions via alloy-rs.
///
/// One implementation wraps the live RPC endpoint; tests mock it to
/// drive the orchestrator without a network.
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
  /// Native (gas token) balance of an account in wei.
  async fn native_balance(&self, owner: Address) -> Result<U256, DepositError>;

  /// Current gas price in wei.
  async fn gas_price(&self) -> Result<u128, DepositError>;

  /// Simulate the transaction and return its gas estimate.
  ///
  /// Fails with `Estimation` when the node rejects the simulation,
  /// typically because the call would revert.
  async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, DepositError>;

  /// Sign and submit a transaction, returning its hash.
  async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, DepositError>;

  /// Poll for the receipt at a fixed interval until mined or deadline.
  ///
  /// `Ok` always means a confirmed receipt; a mined failure surfaces as
  /// `Reverted` and an expired deadline as `ConfirmationTimeout`, both
  /// carrying the hash.
  async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionOutcome, DepositError>;

  /// Check if the RPC connection is healthy.
  async fn is_healthy(&self) -> bool;
}
