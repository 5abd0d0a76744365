//! Domain layer - Core deposit logic and models.
//!
//! Pure types and rules for a single deposit run. No RPC access here
//! (hexagonal architecture inner ring); everything is testable in
//! isolation.

pub mod amount;
pub mod deposit;
pub mod error;

// Re-export core types for convenience
pub use deposit::{
    AllowanceState, ContractAddresses, DepositPhase, DepositReport, DepositRequest, GasLimits,
    TransactionOutcome, TxStatus,
};
pub use error::{DepositError, DepositFailure};
