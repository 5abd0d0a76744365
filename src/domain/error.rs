//! Deposit error taxonomy.
//!
//! Every error kind is terminal for a run — there is no local retry.
//! Variants that involve an already-submitted transaction carry its hash
//! so the operator can distinguish "never submitted" from "submitted but
//! failed/unconfirmed" and inspect the chain manually.

use alloy::primitives::{TxHash, U256};
use thiserror::Error;

use super::deposit::DepositPhase;

/// Terminal error kinds for a deposit run.
#[derive(Debug, Error)]
pub enum DepositError {
    /// Requested amount is below the minimum or not representable in the
    /// token's integer base units without rounding loss.
    #[error("invalid deposit amount: {0}")]
    InvalidAmount(String),

    /// Native balance cannot cover the worst-case two-transaction gas cost.
    #[error("insufficient native balance for gas: need {needed} wei, have {available} wei")]
    InsufficientGas { needed: U256, available: U256 },

    /// USDC balance is below the requested deposit amount (base units).
    #[error("insufficient token balance: need {needed}, have {available} base units")]
    InsufficientFunds { needed: U256, available: U256 },

    /// A JSON-RPC read failed (network error, timeout, bad response).
    #[error("rpc call failed: {0}")]
    Rpc(String),

    /// The node rejected gas estimation (typically a simulated revert).
    #[error("gas estimation rejected: {0}")]
    Estimation(String),

    /// The private key is malformed or the signer could not be built.
    #[error("signer error: {0}")]
    Signing(String),

    /// The node rejected the raw transaction (nonce conflict, underpriced).
    #[error("transaction submission failed: {0}")]
    Submission(String),

    /// The transaction was mined with a failure status.
    #[error("transaction {tx_hash} reverted on-chain")]
    Reverted { tx_hash: TxHash },

    /// The transaction was not mined within the configured deadline.
    #[error("transaction {tx_hash} unconfirmed after {waited_secs}s")]
    ConfirmationTimeout { tx_hash: TxHash, waited_secs: u64 },

    /// The approval confirmed but a fresh allowance read still falls short
    /// of the requested amount (race with another spender).
    #[error("approval confirmed but allowance {actual} is below requested {requested}")]
    AllowanceMismatch { requested: U256, actual: U256 },
}

impl DepositError {
    /// Short machine-friendly kind name for logs and exit messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "InvalidAmount",
            Self::InsufficientGas { .. } => "InsufficientGas",
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::Rpc(_) => "RpcError",
            Self::Estimation(_) => "EstimationError",
            Self::Signing(_) => "SigningError",
            Self::Submission(_) => "SubmissionError",
            Self::Reverted { .. } => "TransactionReverted",
            Self::ConfirmationTimeout { .. } => "ConfirmationTimeout",
            Self::AllowanceMismatch { .. } => "AllowanceMismatch",
        }
    }

    /// The hash embedded in the error, when one exists.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Reverted { tx_hash } | Self::ConfirmationTimeout { tx_hash, .. } => {
                Some(*tx_hash)
            }
            _ => None,
        }
    }
}

/// Terminal failure of a whole run: the triggering error, the phase the
/// state machine was in, and the last submitted transaction hash if any.
#[derive(Debug, Error)]
#[error("deposit failed during {phase}: {error}")]
pub struct DepositFailure {
    pub phase: DepositPhase,
    pub error: DepositError,
    pub tx_hash: Option<TxHash>,
}

impl DepositFailure {
    pub fn new(phase: DepositPhase, error: DepositError) -> Self {
        let tx_hash = error.tx_hash();
        Self {
            phase,
            error,
            tx_hash,
        }
    }

    pub fn with_tx(phase: DepositPhase, error: DepositError, tx_hash: TxHash) -> Self {
        Self {
            phase,
            error,
            tx_hash: Some(tx_hash),
        }
    }

    /// Whether any transaction reached the network before the failure.
    pub fn submitted(&self) -> bool {
        self.tx_hash.is_some()
    }
}
