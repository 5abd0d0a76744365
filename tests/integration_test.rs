//! Integration Tests - End-to-end Deposit Run Testing
//!
//! Drives the orchestrator through mock ports covering the full state
//! machine: the approve path, the skip-approval path, every pre-flight
//! rejection, and the post-submission failure modes.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use mockall::mock;
use mockall::Sequence;
use rust_decimal_macros::dec;

use layerbank_deposit_bot::domain::{
    AllowanceState, ContractAddresses, DepositError, DepositPhase, GasLimits,
    TransactionOutcome, TxStatus,
};
use layerbank_deposit_bot::usecases::DepositOrchestrator;

// ---- Mock Definitions ----

mock! {
    pub Chain {}

    #[async_trait::async_trait]
    impl layerbank_deposit_bot::ports::chain_client::ChainClient for Chain {
        async fn native_balance(&self, owner: Address) -> Result<U256, DepositError>;
        async fn gas_price(&self) -> Result<u128, DepositError>;
        async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, DepositError>;
        async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, DepositError>;
        async fn wait_for_receipt(&self, tx_hash: TxHash)
            -> Result<TransactionOutcome, DepositError>;
        async fn is_healthy(&self) -> bool;
    }
}

mock! {
    pub Tokens {}

    #[async_trait::async_trait]
    impl layerbank_deposit_bot::ports::token_gateway::TokenGateway for Tokens {
        async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, DepositError>;
        async fn decimals(&self, token: Address) -> Result<u8, DepositError>;
        async fn allowance(
            &self,
            token: Address,
            owner: Address,
            spender: Address,
        ) -> Result<AllowanceState, DepositError>;
        fn approve_tx(&self, token: Address, spender: Address, amount: U256) -> TransactionRequest;
        fn supply_tx(&self, core: Address, ltoken: Address, amount: U256) -> TransactionRequest;
    }
}

// ---- Fixtures ----

const USDC_DECIMALS: u8 = 6;

fn owner() -> Address {
    Address::repeat_byte(0x01)
}

fn contracts() -> ContractAddresses {
    ContractAddresses {
        usdc: Address::repeat_byte(0xaa),
        ltoken: Address::repeat_byte(0xbb),
        core: Address::repeat_byte(0xcc),
    }
}

fn gas_limits() -> GasLimits {
    GasLimits {
        approve: 80_000,
        supply: 300_000,
    }
}

fn usdc(amount: u64) -> U256 {
    U256::from(amount) * U256::from(1_000_000u64)
}

fn one_eth() -> U256 {
    U256::from(10u64).pow(U256::from(18u64))
}

fn confirmed(tx_hash: TxHash) -> TransactionOutcome {
    TransactionOutcome {
        tx_hash,
        status: TxStatus::Confirmed,
        block_number: Some(1_234_567),
        gas_used: Some(95_000),
    }
}

fn orchestrator(
    chain: MockChain,
    tokens: MockTokens,
) -> DepositOrchestrator<MockChain, MockTokens> {
    DepositOrchestrator::new(Arc::new(chain), Arc::new(tokens), owner(), contracts(), gas_limits())
}

/// Wire the shared pre-flight expectations: decimals read, balance reads,
/// gas price. Amounts are parameters so each test shapes its own scenario.
fn expect_preflight(
    chain: &mut MockChain,
    tokens: &mut MockTokens,
    native: U256,
    usdc_balance: U256,
) {
    let c = contracts();

    tokens
        .expect_decimals()
        .withf(move |token| *token == c.usdc)
        .returning(|_| Ok(USDC_DECIMALS));
    chain
        .expect_native_balance()
        .returning(move |_| Ok(native));
    tokens
        .expect_balance_of()
        .withf(move |token, _| *token == c.usdc)
        .returning(move |_, _| Ok(usdc_balance));
    chain.expect_gas_price().returning(|| Ok(1_000_000_000)); // 1 gwei
}

fn allowance_state(current: U256) -> AllowanceState {
    AllowanceState {
        owner: owner(),
        spender: contracts().ltoken,
        current,
    }
}

// ---- Pre-flight Rejections ----

#[tokio::test]
async fn test_sub_minimum_amount_fails_before_any_network_call() {
    // No expectations at all: any port call would panic the test.
    let chain = MockChain::new();
    let tokens = MockTokens::new();

    let failure = orchestrator(chain, tokens)
        .run(dec!(0.000009))
        .await
        .unwrap_err();

    assert_eq!(failure.phase, DepositPhase::Init);
    assert_eq!(failure.error.kind(), "InvalidAmount");
    assert!(!failure.submitted());
}

#[tokio::test]
async fn test_unrepresentable_amount_fails_after_decimals_read_only() {
    let chain = MockChain::new();
    let mut tokens = MockTokens::new();

    // Above the minimum, but 7 fractional digits exceed USDC's 6.
    tokens
        .expect_decimals()
        .times(1)
        .returning(|_| Ok(USDC_DECIMALS));

    let failure = orchestrator(chain, tokens)
        .run(dec!(1.0000001))
        .await
        .unwrap_err();

    assert_eq!(failure.phase, DepositPhase::Init);
    assert_eq!(failure.error.kind(), "InvalidAmount");
}

#[tokio::test]
async fn test_insufficient_token_balance_submits_nothing() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();

    // 0.5 USDC in the wallet, 1 requested. send_transaction has no
    // expectation, so any submission would panic.
    expect_preflight(&mut chain, &mut tokens, one_eth(), U256::from(500_000u64));

    let failure = orchestrator(chain, tokens).run(dec!(1)).await.unwrap_err();

    assert_eq!(failure.phase, DepositPhase::CheckingBalances);
    assert_eq!(failure.error.kind(), "InsufficientFunds");
    assert!(!failure.submitted());
}

// ---- Scenario C: zero native balance ----

#[tokio::test]
async fn test_zero_native_balance_fails_with_insufficient_gas() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();

    expect_preflight(&mut chain, &mut tokens, U256::ZERO, usdc(10));

    let failure = orchestrator(chain, tokens).run(dec!(1)).await.unwrap_err();

    assert_eq!(failure.phase, DepositPhase::CheckingBalances);
    assert_eq!(failure.error.kind(), "InsufficientGas");
    assert!(!failure.submitted());
}

// ---- Scenario A: approve then deposit ----

#[tokio::test]
async fn test_zero_allowance_runs_approve_then_deposit_in_order() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();
    let mut seq = Sequence::new();
    let c = contracts();

    let approve_hash = B256::repeat_byte(0xa1);
    let deposit_hash = B256::repeat_byte(0xd1);

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));

    // Allowance starts at zero, covers the amount after the approval.
    tokens
        .expect_allowance()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(allowance_state(U256::ZERO)));

    tokens
        .expect_approve_tx()
        .times(1)
        .in_sequence(&mut seq)
        .withf(move |token, spender, amount| {
            *token == c.usdc && *spender == c.ltoken && *amount == usdc(1)
        })
        .returning(|_, _, _| TransactionRequest::default());
    chain
        .expect_estimate_gas()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(50_000));
    chain
        .expect_send_transaction()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(approve_hash));
    chain
        .expect_wait_for_receipt()
        .times(1)
        .in_sequence(&mut seq)
        .withf(move |hash| *hash == approve_hash)
        .returning(|hash| Ok(confirmed(hash)));

    // Defensive re-read now covers the amount.
    tokens
        .expect_allowance()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(allowance_state(usdc(1))));

    tokens
        .expect_supply_tx()
        .times(1)
        .in_sequence(&mut seq)
        .withf(move |core, ltoken, amount| {
            *core == c.core && *ltoken == c.ltoken && *amount == usdc(1)
        })
        .returning(|_, _, _| TransactionRequest::default());
    chain
        .expect_estimate_gas()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(250_000));
    chain
        .expect_send_transaction()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(deposit_hash));
    chain
        .expect_wait_for_receipt()
        .times(1)
        .in_sequence(&mut seq)
        .withf(move |hash| *hash == deposit_hash)
        .returning(|hash| Ok(confirmed(hash)));

    // Final lUSDC report
    tokens
        .expect_balance_of()
        .withf(move |token, _| *token == c.ltoken)
        .returning(|_, _| Ok(U256::from(998_000u64)));
    tokens
        .expect_decimals()
        .withf(move |token| *token == c.ltoken)
        .returning(|_| Ok(USDC_DECIMALS));

    let report = orchestrator(chain, tokens).run(dec!(1)).await.unwrap();

    assert_eq!(report.tx_hash, deposit_hash);
    assert_eq!(report.block_number, Some(1_234_567));
    assert_eq!(report.amount, dec!(1));
    assert_eq!(report.receipt_token_balance, Some(dec!(0.998)));
}

// ---- Scenario B: pre-existing allowance skips approval ----

#[tokio::test]
async fn test_sufficient_allowance_skips_approval() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();
    let c = contracts();

    let deposit_hash = B256::repeat_byte(0xd2);

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));

    // 5 USDC standing allowance against a 1 USDC request: exactly one
    // allowance read and exactly one submission. approve_tx has no
    // expectation, so building an approval would panic.
    tokens
        .expect_allowance()
        .times(1)
        .returning(|_, _, _| Ok(allowance_state(usdc(5))));

    tokens
        .expect_supply_tx()
        .times(1)
        .returning(|_, _, _| TransactionRequest::default());
    chain.expect_estimate_gas().times(1).returning(|_| Ok(250_000));
    chain
        .expect_send_transaction()
        .times(1)
        .returning(move |_| Ok(deposit_hash));
    chain
        .expect_wait_for_receipt()
        .times(1)
        .returning(|hash| Ok(confirmed(hash)));

    tokens
        .expect_balance_of()
        .withf(move |token, _| *token == c.ltoken)
        .returning(|_, _| Ok(U256::from(1_000_000u64)));
    tokens
        .expect_decimals()
        .withf(move |token| *token == c.ltoken)
        .returning(|_| Ok(USDC_DECIMALS));

    let report = orchestrator(chain, tokens).run(dec!(1)).await.unwrap();
    assert_eq!(report.tx_hash, deposit_hash);
}

// ---- Post-submission failures ----

#[tokio::test]
async fn test_approval_timeout_surfaces_with_hash() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();

    let approve_hash = B256::repeat_byte(0xa2);

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));
    tokens
        .expect_allowance()
        .returning(|_, _, _| Ok(allowance_state(U256::ZERO)));
    tokens
        .expect_approve_tx()
        .returning(|_, _, _| TransactionRequest::default());
    chain.expect_estimate_gas().returning(|_| Ok(50_000));
    chain
        .expect_send_transaction()
        .returning(move |_| Ok(approve_hash));
    chain.expect_wait_for_receipt().returning(|hash| {
        Err(DepositError::ConfirmationTimeout {
            tx_hash: hash,
            waited_secs: 250,
        })
    });

    let failure = orchestrator(chain, tokens).run(dec!(1)).await.unwrap_err();

    assert_eq!(failure.phase, DepositPhase::Approving);
    assert_eq!(failure.error.kind(), "ConfirmationTimeout");
    assert_eq!(failure.tx_hash, Some(approve_hash));
}

#[tokio::test]
async fn test_allowance_mismatch_after_confirmed_approval() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();
    let mut seq = Sequence::new();

    let approve_hash = B256::repeat_byte(0xa3);

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));

    tokens
        .expect_allowance()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(allowance_state(U256::ZERO)));
    tokens
        .expect_approve_tx()
        .returning(|_, _, _| TransactionRequest::default());
    chain.expect_estimate_gas().returning(|_| Ok(50_000));
    chain
        .expect_send_transaction()
        .returning(move |_| Ok(approve_hash));
    chain
        .expect_wait_for_receipt()
        .returning(|hash| Ok(confirmed(hash)));

    // The approval confirmed but another spender raced it away.
    tokens
        .expect_allowance()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(allowance_state(U256::from(100u64))));

    let failure = orchestrator(chain, tokens).run(dec!(1)).await.unwrap_err();

    assert_eq!(failure.phase, DepositPhase::Approving);
    assert_eq!(failure.error.kind(), "AllowanceMismatch");
    assert_eq!(failure.tx_hash, Some(approve_hash));
}

#[tokio::test]
async fn test_reverted_deposit_surfaces_with_hash() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();

    let deposit_hash = B256::repeat_byte(0xd3);

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));
    tokens
        .expect_allowance()
        .returning(|_, _, _| Ok(allowance_state(usdc(5))));
    tokens
        .expect_supply_tx()
        .returning(|_, _, _| TransactionRequest::default());
    chain.expect_estimate_gas().returning(|_| Ok(250_000));
    chain
        .expect_send_transaction()
        .returning(move |_| Ok(deposit_hash));
    chain
        .expect_wait_for_receipt()
        .returning(|hash| Err(DepositError::Reverted { tx_hash: hash }));

    let failure = orchestrator(chain, tokens).run(dec!(1)).await.unwrap_err();

    assert_eq!(failure.phase, DepositPhase::Confirming);
    assert_eq!(failure.error.kind(), "TransactionReverted");
    assert_eq!(failure.tx_hash, Some(deposit_hash));
}

#[tokio::test]
async fn test_deposit_estimation_failure_reports_prior_approval_hash() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();
    let mut seq = Sequence::new();

    let approve_hash = B256::repeat_byte(0xa4);

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));

    tokens
        .expect_allowance()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(allowance_state(U256::ZERO)));
    tokens
        .expect_approve_tx()
        .returning(|_, _, _| TransactionRequest::default());
    chain
        .expect_estimate_gas()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(50_000));
    chain
        .expect_send_transaction()
        .times(1)
        .returning(move |_| Ok(approve_hash));
    chain
        .expect_wait_for_receipt()
        .returning(|hash| Ok(confirmed(hash)));
    tokens
        .expect_allowance()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(allowance_state(usdc(1))));

    // The supply simulation reverts; the deposit is never submitted but
    // the approval already is, so its hash must still be reported.
    tokens
        .expect_supply_tx()
        .returning(|_, _, _| TransactionRequest::default());
    chain
        .expect_estimate_gas()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(DepositError::Estimation("execution reverted".into())));

    let failure = orchestrator(chain, tokens).run(dec!(1)).await.unwrap_err();

    assert_eq!(failure.phase, DepositPhase::Depositing);
    assert_eq!(failure.error.kind(), "EstimationError");
    assert_eq!(failure.tx_hash, Some(approve_hash));
}

// ---- Idempotence ----

#[tokio::test]
async fn test_repeated_runs_with_standing_allowance_never_reapprove() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();
    let c = contracts();

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));

    // Two full runs: two allowance reads, two deposits, zero approvals.
    tokens
        .expect_allowance()
        .times(2)
        .returning(|_, _, _| Ok(allowance_state(usdc(5))));
    tokens
        .expect_supply_tx()
        .times(2)
        .returning(|_, _, _| TransactionRequest::default());
    chain.expect_estimate_gas().times(2).returning(|_| Ok(250_000));
    chain
        .expect_send_transaction()
        .times(2)
        .returning(|_| Ok(B256::repeat_byte(0xd4)));
    chain
        .expect_wait_for_receipt()
        .times(2)
        .returning(|hash| Ok(confirmed(hash)));
    tokens
        .expect_balance_of()
        .withf(move |token, _| *token == c.ltoken)
        .returning(|_, _| Ok(U256::ZERO));
    tokens
        .expect_decimals()
        .withf(move |token| *token == c.ltoken)
        .returning(|_| Ok(USDC_DECIMALS));

    let orchestrator = orchestrator(chain, tokens);
    orchestrator.run(dec!(1)).await.unwrap();
    orchestrator.run(dec!(1)).await.unwrap();
}

// ---- Report side effect ----

#[tokio::test]
async fn test_failed_receipt_token_read_does_not_fail_the_run() {
    let mut chain = MockChain::new();
    let mut tokens = MockTokens::new();
    let c = contracts();

    expect_preflight(&mut chain, &mut tokens, one_eth(), usdc(10));
    tokens
        .expect_allowance()
        .returning(|_, _, _| Ok(allowance_state(usdc(5))));
    tokens
        .expect_supply_tx()
        .returning(|_, _, _| TransactionRequest::default());
    chain.expect_estimate_gas().returning(|_| Ok(250_000));
    chain
        .expect_send_transaction()
        .returning(|_| Ok(B256::repeat_byte(0xd5)));
    chain
        .expect_wait_for_receipt()
        .returning(|hash| Ok(confirmed(hash)));

    // lUSDC read fails; the run still succeeds with no balance reported.
    tokens
        .expect_balance_of()
        .withf(move |token, _| *token == c.ltoken)
        .returning(|_, _| Err(DepositError::Rpc("node flaked".into())));

    let report = orchestrator(chain, tokens).run(dec!(1)).await.unwrap();
    assert_eq!(report.receipt_token_balance, None);
}
