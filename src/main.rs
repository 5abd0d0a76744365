//! LayerBank Deposit Bot — Entry Point
//!
//! Deposits a configured amount of USDC into LayerBank on Scroll, once,
//! and exits. The process is the unit of retry: a failed run is re-invoked
//! by the operator, never retried internally.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (env-filter, level from config)
//! 3. Load PRIVATE_KEY from env
//! 4. Connect the Scroll provider (wallet signer + optional proxy)
//! 5. Wire Erc20Gateway + RpcChainClient into the orchestrator
//! 6. Run once; exit code reflects Done/Failed

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::chain::{ConfirmationPolicy, Erc20Gateway, RpcChainClient, ScrollProvider};
use domain::GasLimits;
use usecases::DepositOrchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.bot.log_level)
                }),
        )
        .init();

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        network = %config.network.name,
        amount = %config.deposit.amount,
        "Starting LayerBank deposit run"
    );

    // ── 3. Load the signing key from env ────────────────────
    let private_key = std::env::var("PRIVATE_KEY")
        .context("PRIVATE_KEY not set — export the wallet's private key")?;

    // ── 4. Connect the Scroll provider ──────────────────────
    let provider = Arc::new(
        ScrollProvider::connect(&config.network, &private_key)
            .await
            .context("Failed to connect to Scroll RPC")?,
    );
    let owner = provider.sender();

    // ── 5. Wire the adapters into the orchestrator ──────────
    let contracts = config::loader::contract_addresses(&config)?;
    let policy = ConfirmationPolicy {
        poll_interval: Duration::from_secs(config.deposit.poll_interval_secs),
        timeout: Duration::from_secs(config.deposit.confirmation_timeout_secs),
    };
    let chain = Arc::new(RpcChainClient::new(Arc::clone(&provider), policy));
    let tokens = Arc::new(Erc20Gateway::new(Arc::clone(&provider)));
    let gas_limits = GasLimits {
        approve: config.deposit.approve_gas_limit,
        supply: config.deposit.supply_gas_limit,
    };
    let orchestrator = DepositOrchestrator::new(chain, tokens, owner, contracts, gas_limits);

    // ── 6. Run once and report ──────────────────────────────
    match orchestrator.run(config.deposit.amount).await {
        Ok(report) => {
            info!(
                tx = %config.network.explorer_tx_url(report.tx_hash),
                block = report.block_number,
                amount = %report.amount,
                "USDC deposited to LayerBank"
            );
            match report.receipt_token_balance {
                Some(balance) => info!(lusdc_balance = %balance, "Receipt token balance"),
                None => warn!("lUSDC balance unavailable — deposit still confirmed"),
            }
            Ok(())
        }
        Err(failure) => {
            match failure.tx_hash {
                Some(hash) => error!(
                    phase = %failure.phase,
                    kind = failure.error.kind(),
                    tx = %config.network.explorer_tx_url(hash),
                    "Deposit failed after submission — inspect the transaction on-chain"
                ),
                None => error!(
                    phase = %failure.phase,
                    kind = failure.error.kind(),
                    "Deposit failed before any transaction was submitted"
                ),
            }
            Err(failure.into())
        }
    }
}
