//! Core deposit domain types.
//!
//! Defines the entities owned by a single deposit run: the validated
//! request, the fresh allowance snapshot, the transaction outcome, and the
//! state-machine phases. None of these persist beyond one invocation.

use alloy::primitives::{Address, TxHash, U256};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount;
use super::error::DepositError;

/// Contract addresses a deposit run touches.
///
/// `ltoken` is both the allowance spender (it pulls the underlying from the
/// owner) and the receipt token reported at the end of a run. `core` is the
/// LayerBank entry point whose `supply` the deposit transaction calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    /// USDC token contract.
    pub usdc: Address,
    /// lUSDC market contract (spender + receipt token).
    pub ltoken: Address,
    /// LayerBank core contract.
    pub core: Address,
}

/// Worst-case gas limits for the two-transaction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasLimits {
    /// Gas limit budgeted for the approval transaction.
    pub approve: u64,
    /// Gas limit budgeted for the supply transaction.
    pub supply: u64,
}

impl GasLimits {
    /// Total gas budgeted when both transactions are needed.
    pub fn worst_case(&self) -> u64 {
        self.approve.saturating_add(self.supply)
    }
}

/// A validated, immutable deposit request.
///
/// Construction is the only validation gate: the amount has already passed
/// the minimum threshold and scaled to base units without rounding loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRequest {
    /// Wallet that owns the funds and signs both transactions.
    pub owner: Address,
    /// Contracts involved in the run.
    pub contracts: ContractAddresses,
    /// Requested amount in token base units.
    pub amount_units: U256,
    /// Requested amount in whole token units (for logs and reports).
    pub amount: Decimal,
    /// Token decimals read from the contract.
    pub decimals: u8,
}

impl DepositRequest {
    /// Validate and scale a decimal amount into an immutable request.
    pub fn new(
        owner: Address,
        contracts: ContractAddresses,
        amount: Decimal,
        decimals: u8,
    ) -> Result<Self, DepositError> {
        amount::ensure_minimum(amount)?;
        let amount_units = amount::to_base_units(amount, decimals)?;

        Ok(Self {
            owner,
            contracts,
            amount_units,
            amount,
            decimals,
        })
    }
}

/// Fresh allowance snapshot for one (owner, spender) pair.
///
/// Always read from the chain immediately before a decision; never cached
/// across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceState {
    pub owner: Address,
    pub spender: Address,
    pub current: U256,
}

impl AllowanceState {
    /// Whether the current allowance covers the requested amount.
    pub fn covers(&self, amount: U256) -> bool {
        self.current >= amount
    }
}

/// Mined status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Submitted, not yet included in a block.
    Pending,
    /// Mined with success status.
    Confirmed,
    /// Mined with failure status.
    Failed,
}

/// Result of submitting and confirming one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    /// Hash assigned at submission.
    pub tx_hash: TxHash,
    /// Mined status.
    pub status: TxStatus,
    /// Block the transaction was included in, once mined.
    pub block_number: Option<u64>,
    /// Gas consumed, when the receipt reports it.
    pub gas_used: Option<u64>,
}

impl TransactionOutcome {
    pub fn is_confirmed(&self) -> bool {
        self.status == TxStatus::Confirmed
    }
}

/// Phases of the deposit state machine.
///
/// `Failed` is reachable from every phase and is carried on
/// [`DepositFailure`](super::error::DepositFailure) rather than listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositPhase {
    Init,
    CheckingBalances,
    CheckingAllowance,
    Approving,
    Depositing,
    Confirming,
    Done,
}

impl std::fmt::Display for DepositPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::CheckingBalances => "checking-balances",
            Self::CheckingAllowance => "checking-allowance",
            Self::Approving => "approving",
            Self::Depositing => "depositing",
            Self::Confirming => "confirming",
            Self::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Final report of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositReport {
    /// Hash of the confirmed deposit transaction.
    pub tx_hash: TxHash,
    /// Block the deposit was mined in.
    pub block_number: Option<u64>,
    /// Deposited amount in whole token units.
    pub amount: Decimal,
    /// lUSDC balance after the deposit, when the read succeeded.
    pub receipt_token_balance: Option<Decimal>,
    /// When the run completed.
    pub completed_at: DateTime<Utc>,
}
