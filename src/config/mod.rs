//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from `config.toml`. All contract
//! addresses and network parameters are externalized here - nothing is
//! hardcoded in the domain layer. The private key is the one input that
//! never lives in a file: it comes from the `PRIVATE_KEY` env var.

pub mod loader;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level bot configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the run begins.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Bot identity and logging.
  pub bot: BotConfig,
  /// Network endpoint and chain parameters.
  pub network: NetworkConfig,
  /// Contract addresses on Scroll.
  pub contracts: ContractsConfig,
  /// Deposit amount and transaction lifecycle parameters.
  pub deposit: DepositConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable bot name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Network endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
  /// Network name, for logs only.
  pub name: String,
  /// Expected chain ID, validated at connect (Scroll mainnet: 534352).
  pub chain_id: u64,
  /// JSON-RPC endpoint URL.
  pub rpc_url: String,
  /// Block explorer base URL, used in confirmation logs.
  pub explorer_url: String,
  /// Optional HTTP proxy as `host:port` or `user:pass@host:port`.
  #[serde(default)]
  pub proxy: Option<String>,
  /// Per-request HTTP timeout in seconds.
  #[serde(default = "default_request_timeout")]
  pub request_timeout_secs: u64,
}

impl NetworkConfig {
  /// Explorer link for a transaction hash.
  pub fn explorer_tx_url(&self, tx_hash: impl std::fmt::Display) -> String {
    format!("{}/tx/{tx_hash}", self.explorer_url.trim_end_matches('/'))
  }
}

/// Contract addresses, hex strings validated by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
  /// USDC token contract.
  pub usdc: String,
  /// lUSDC market contract (allowance spender + receipt token).
  pub ltoken: String,
  /// LayerBank core contract.
  pub core: String,
}

/// Deposit parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositConfig {
  /// Amount in whole USDC, as a TOML string to keep it exact.
  pub amount: Decimal,
  /// Fixed interval between receipt polls (seconds).
  #[serde(default = "default_poll_interval")]
  pub poll_interval_secs: u64,
  /// Deadline for a transaction to confirm (seconds).
  #[serde(default = "default_confirmation_timeout")]
  pub confirmation_timeout_secs: u64,
  /// Worst-case gas budgeted for the approval transaction.
  #[serde(default = "default_approve_gas")]
  pub approve_gas_limit: u64,
  /// Worst-case gas budgeted for the supply transaction.
  #[serde(default = "default_supply_gas")]
  pub supply_gas_limit: u64,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_request_timeout() -> u64 {
  30
}

fn default_poll_interval() -> u64 {
  5
}

fn default_confirmation_timeout() -> u64 {
  250
}

fn default_approve_gas() -> u64 {
  80_000
}

fn default_supply_gas() -> u64 {
  300_000
}
