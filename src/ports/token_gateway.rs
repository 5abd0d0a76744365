//! Token Gateway Port - ERC-20 and LayerBank Call Interface
//!
//! Exposes the token reads the orchestrator decides on (balance,
//! decimals, allowance) and builds the unsigned approve/supply
//! transactions it submits through the chain client.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::domain::{AllowanceState, DepositError};

/// Trait for ERC-20 reads and deposit transaction construction.
#[async_trait]
pub trait TokenGateway: Send + Sync + 'static {
  /// ERC-20 `balanceOf(owner)` in base units.
  async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, DepositError>;

  /// ERC-20 `decimals()`.
  async fn decimals(&self, token: Address) -> Result<u8, DepositError>;

  /// Fresh ERC-20 `allowance(owner, spender)` snapshot.
  async fn allowance(
    &self,
    token: Address,
    owner: Address,
    spender: Address,
  ) -> Result<AllowanceState, DepositError>;

  /// Unsigned `approve(spender, amount)` for exactly the requested
  /// amount — never unlimited, to minimize standing risk.
  fn approve_tx(&self, token: Address, spender: Address, amount: U256) -> TransactionRequest;

  /// Unsigned LayerBank `supply(ltoken, amount)` against the core
  /// contract.
  fn supply_tx(&self, core: Address, ltoken: Address, amount: U256) -> TransactionRequest;
}
