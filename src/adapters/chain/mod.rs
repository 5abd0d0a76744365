//! Chain Adapters - Scroll Blockchain Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with wallet signing and optional proxy
//! - ERC-20 reads and unsigned approve/supply construction
//! - Transaction submission and bounded receipt polling

pub mod client;
pub mod contracts;
pub mod gateway;
pub mod provider;

pub use client::{ConfirmationPolicy, RpcChainClient};
pub use gateway::Erc20Gateway;
pub use provider::ScrollProvider;
