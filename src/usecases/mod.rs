//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces. A single use case
//! lives here: the deposit run state machine.

pub mod deposit;

pub use deposit::DepositOrchestrator;
