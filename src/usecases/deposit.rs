//! Deposit Orchestrator Use Case - The Run State Machine
//!
//! Sequences one deposit run end to end:
//! `Init → CheckingBalances → CheckingAllowance → [Approving] →
//! Depositing → Confirming → Done`, with terminal `Failed` reachable from
//! every step. No step retries; a failure surfaces immediately with its
//! error kind, the failing phase, and the last submitted hash if any.

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::domain::{
  amount, AllowanceState, ContractAddresses, DepositError, DepositFailure, DepositPhase,
  DepositReport, DepositRequest, GasLimits, TransactionOutcome,
};
use crate::ports::chain_client::ChainClient;
use crate::ports::token_gateway::TokenGateway;

/// Headroom applied on top of the node's gas estimate (20%).
const GAS_HEADROOM_DIVISOR: u64 = 5;

/// Drives one deposit run through the chain client and token gateway.
///
/// Owns the lifecycle of the request, allowance snapshots, and
/// transaction outcomes for the duration of a single `run` call; nothing
/// persists between runs.
pub struct DepositOrchestrator<C: ChainClient, G: TokenGateway> {
  chain: Arc<C>,
  tokens: Arc<G>,
  owner: Address,
  contracts: ContractAddresses,
  gas_limits: GasLimits,
}

impl<C: ChainClient, G: TokenGateway> DepositOrchestrator<C, G> {
  pub fn new(
    chain: Arc<C>,
    tokens: Arc<G>,
    owner: Address,
    contracts: ContractAddresses,
    gas_limits: GasLimits,
  ) -> Self {
    Self {
      chain,
      tokens,
      owner,
      contracts,
      gas_limits,
    }
  }

  /// Execute one deposit run for the given decimal amount.
  #[instrument(skip(self), fields(owner = %self.owner, amount = %requested))]
  pub async fn run(&self, requested: Decimal) -> Result<DepositReport, DepositFailure> {
    // ── Init: validate before any network call ──────────────
    let request = self.init(requested).await?;

    // ── CheckingBalances ────────────────────────────────────
    self.check_balances(&request).await?;

    // ── CheckingAllowance → [Approving] ─────────────────────
    let approve_hash = self.ensure_allowance(&request).await?;

    // ── Depositing → Confirming ─────────────────────────────
    let outcome = self.deposit(&request, approve_hash).await?;

    // ── Done: report final lUSDC balance (side effect only) ─
    let receipt_token_balance = self.receipt_token_balance(&request).await;

    info!(
      phase = %DepositPhase::Done,
      tx_hash = %outcome.tx_hash,
      block = outcome.block_number,
      "Deposit run complete"
    );

    Ok(DepositReport {
      tx_hash: outcome.tx_hash,
      block_number: outcome.block_number,
      amount: request.amount,
      receipt_token_balance,
      completed_at: Utc::now(),
    })
  }

  /// Validate the amount and build the immutable request.
  ///
  /// The minimum-amount rule runs before the decimals read so a
  /// sub-minimum request never costs a network call.
  async fn init(&self, requested: Decimal) -> Result<DepositRequest, DepositFailure> {
    amount::ensure_minimum(requested)
      .map_err(|e| DepositFailure::new(DepositPhase::Init, e))?;

    let decimals = self
      .tokens
      .decimals(self.contracts.usdc)
      .await
      .map_err(|e| DepositFailure::new(DepositPhase::Init, e))?;

    let request = DepositRequest::new(self.owner, self.contracts, requested, decimals)
      .map_err(|e| DepositFailure::new(DepositPhase::Init, e))?;

    info!(
      phase = %DepositPhase::Init,
      amount_units = %request.amount_units,
      decimals,
      "Deposit request validated"
    );
    Ok(request)
  }

  /// Verify native and token balances cover the run.
  ///
  /// The gas check budgets the worst-case two-transaction path
  /// (approve + supply) at the current gas price.
  async fn check_balances(&self, request: &DepositRequest) -> Result<(), DepositFailure> {
    let phase = DepositPhase::CheckingBalances;
    let fail = |e| DepositFailure::new(phase, e);

    let native = self
      .chain
      .native_balance(request.owner)
      .await
      .map_err(fail)?;
    let token_balance = self
      .tokens
      .balance_of(request.contracts.usdc, request.owner)
      .await
      .map_err(fail)?;
    let gas_price = self.chain.gas_price().await.map_err(fail)?;

    let needed = U256::from(gas_price) * U256::from(self.gas_limits.worst_case());
    if native < needed {
      return Err(fail(DepositError::InsufficientGas {
        needed,
        available: native,
      }));
    }

    if token_balance < request.amount_units {
      return Err(fail(DepositError::InsufficientFunds {
        needed: request.amount_units,
        available: token_balance,
      }));
    }

    info!(
      phase = %phase,
      native_wei = %native,
      token_units = %token_balance,
      gas_budget_wei = %needed,
      "Balances verified"
    );
    Ok(())
  }

  /// Check the allowance and approve exactly the requested amount when
  /// it falls short. Returns the approval hash when one was submitted.
  async fn ensure_allowance(
    &self,
    request: &DepositRequest,
  ) -> Result<Option<TxHash>, DepositFailure> {
    let state = self.read_allowance(request, DepositPhase::CheckingAllowance, None).await?;

    if state.covers(request.amount_units) {
      info!(
        phase = %DepositPhase::CheckingAllowance,
        allowance = %state.current,
        "Allowance sufficient, skipping approval"
      );
      return Ok(None);
    }

    info!(
      phase = %DepositPhase::Approving,
      allowance = %state.current,
      required = %request.amount_units,
      "Submitting approval for exact amount"
    );

    let tx = self
      .tokens
      .approve_tx(request.contracts.usdc, request.contracts.ltoken, request.amount_units)
      .with_from(request.owner);
    let outcome = self
      .submit_and_confirm(tx, DepositPhase::Approving, DepositPhase::Approving, None)
      .await?;

    // Defensive re-read: another spender may have raced the approval
    let fresh = self
      .read_allowance(request, DepositPhase::Approving, Some(outcome.tx_hash))
      .await?;
    if !fresh.covers(request.amount_units) {
      return Err(DepositFailure::with_tx(
        DepositPhase::Approving,
        DepositError::AllowanceMismatch {
          requested: request.amount_units,
          actual: fresh.current,
        },
        outcome.tx_hash,
      ));
    }

    info!(
      phase = %DepositPhase::Approving,
      tx_hash = %outcome.tx_hash,
      allowance = %fresh.current,
      "Approval confirmed"
    );
    Ok(Some(outcome.tx_hash))
  }

  /// Submit the supply transaction and wait for its confirmation.
  async fn deposit(
    &self,
    request: &DepositRequest,
    approve_hash: Option<TxHash>,
  ) -> Result<TransactionOutcome, DepositFailure> {
    info!(
      phase = %DepositPhase::Depositing,
      amount_units = %request.amount_units,
      core = %request.contracts.core,
      "Submitting supply transaction"
    );

    let tx = self
      .tokens
      .supply_tx(request.contracts.core, request.contracts.ltoken, request.amount_units)
      .with_from(request.owner);

    self
      .submit_and_confirm(tx, DepositPhase::Depositing, DepositPhase::Confirming, approve_hash)
      .await
  }

  /// Estimate, submit, and confirm one transaction.
  ///
  /// `prior_hash` is the last hash already on-chain from this run, kept
  /// so a pre-submission failure still reports it.
  async fn submit_and_confirm(
    &self,
    tx: TransactionRequest,
    submit_phase: DepositPhase,
    confirm_phase: DepositPhase,
    prior_hash: Option<TxHash>,
  ) -> Result<TransactionOutcome, DepositFailure> {
    let fail_presubmit = |phase, e| DepositFailure {
      phase,
      error: e,
      tx_hash: prior_hash,
    };

    let estimate = self
      .chain
      .estimate_gas(&tx)
      .await
      .map_err(|e| fail_presubmit(submit_phase, e))?;
    let gas_limit = estimate + estimate / GAS_HEADROOM_DIVISOR;
    let tx = tx.with_gas_limit(gas_limit);

    let tx_hash = self
      .chain
      .send_transaction(tx)
      .await
      .map_err(|e| fail_presubmit(submit_phase, e))?;

    info!(
      phase = %submit_phase,
      tx_hash = %tx_hash,
      gas_limit,
      "Transaction submitted"
    );

    let outcome = self
      .chain
      .wait_for_receipt(tx_hash)
      .await
      .map_err(|e| DepositFailure::with_tx(confirm_phase, e, tx_hash))?;

    info!(
      phase = %confirm_phase,
      tx_hash = %tx_hash,
      block = outcome.block_number,
      gas_used = outcome.gas_used,
      "Transaction confirmed"
    );
    Ok(outcome)
  }

  /// Read a fresh allowance snapshot for (owner, ltoken).
  async fn read_allowance(
    &self,
    request: &DepositRequest,
    phase: DepositPhase,
    prior_hash: Option<TxHash>,
  ) -> Result<AllowanceState, DepositFailure> {
    self
      .tokens
      .allowance(request.contracts.usdc, request.owner, request.contracts.ltoken)
      .await
      .map_err(|e| DepositFailure {
        phase,
        error: e,
        tx_hash: prior_hash,
      })
  }

  /// Best-effort lUSDC balance read after a confirmed deposit.
  ///
  /// A failed read is reported as a warning, never as a run failure.
  async fn receipt_token_balance(&self, request: &DepositRequest) -> Option<Decimal> {
    let ltoken = request.contracts.ltoken;

    let units = match self.tokens.balance_of(ltoken, request.owner).await {
      Ok(units) => units,
      Err(e) => {
        warn!(error = %e, "Failed to read lUSDC balance after deposit");
        return None;
      }
    };
    let decimals = match self.tokens.decimals(ltoken).await {
      Ok(d) => d,
      Err(e) => {
        warn!(error = %e, "Failed to read lUSDC decimals after deposit");
        return None;
      }
    };

    amount::from_base_units(units, decimals)
  }
}
