//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::info;

use crate::domain::amount::MIN_DEPOSIT;
use crate::domain::ContractAddresses;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  info!(
    bot = %config.bot.name,
    network = %config.network.name,
    amount = %config.deposit.amount,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse the configured contract addresses into domain form.
pub fn contract_addresses(config: &AppConfig) -> Result<ContractAddresses> {
  Ok(ContractAddresses {
    usdc: parse_address(&config.contracts.usdc, "contracts.usdc")?,
    ltoken: parse_address(&config.contracts.ltoken, "contracts.ltoken")?,
    core: parse_address(&config.contracts.core, "contracts.core")?,
  })
}

fn parse_address(raw: &str, field: &str) -> Result<Address> {
  raw
    .parse()
    .with_context(|| format!("{field} is not a valid address: {raw}"))
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  // Network validation
  anyhow::ensure!(
    !config.network.rpc_url.is_empty(),
    "RPC URL must not be empty"
  );
  anyhow::ensure!(
    config.network.rpc_url.starts_with("http"),
    "RPC URL must be an HTTP(S) endpoint, got {}",
    config.network.rpc_url
  );
  anyhow::ensure!(
    config.network.chain_id > 0,
    "chain_id must be positive"
  );
  anyhow::ensure!(
    !config.network.explorer_url.is_empty(),
    "Explorer URL must not be empty"
  );
  if let Some(proxy) = &config.network.proxy {
    anyhow::ensure!(
      !proxy.is_empty() && !proxy.starts_with("http"),
      "proxy must be host:port without a scheme, got {proxy}"
    );
  }

  // Contract addresses must parse
  contract_addresses(config)?;

  // Deposit validation
  anyhow::ensure!(
    config.deposit.amount >= MIN_DEPOSIT,
    "deposit amount must be at least {MIN_DEPOSIT}, got {}",
    config.deposit.amount
  );
  anyhow::ensure!(
    config.deposit.poll_interval_secs > 0,
    "poll_interval_secs must be positive"
  );
  anyhow::ensure!(
    config.deposit.confirmation_timeout_secs >= config.deposit.poll_interval_secs,
    "confirmation_timeout_secs ({}) must be at least poll_interval_secs ({})",
    config.deposit.confirmation_timeout_secs,
    config.deposit.poll_interval_secs
  );
  anyhow::ensure!(
    config.deposit.approve_gas_limit > 0 && config.deposit.supply_gas_limit > 0,
    "gas limits must be positive"
  );

  Ok(())
}
