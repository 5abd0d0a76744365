//! ERC-20 Token Gateway - Reads and Unsigned Call Construction
//!
//! Implements the `TokenGateway` port: balance/decimals/allowance reads
//! via `eth_call` and unsigned approve/supply transaction requests built
//! from the `sol!` bindings. Nothing here signs or submits — that is the
//! chain client's job.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::instrument;

use crate::domain::{AllowanceState, DepositError};
use crate::ports::token_gateway::TokenGateway;

use super::contracts::{IERC20, ILayerBankCore};
use super::provider::ScrollProvider;

/// `TokenGateway` implementation over the shared Scroll provider.
pub struct Erc20Gateway {
    provider: Arc<ScrollProvider>,
}

impl Erc20Gateway {
    pub fn new(provider: Arc<ScrollProvider>) -> Self {
        Self { provider }
    }

    /// Execute a read-only contract call and return the raw word.
    async fn read(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes, DepositError> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(Bytes::from(calldata).into());

        self.provider
            .inner()
            .call(&tx)
            .await
            .map_err(|e| DepositError::Rpc(format!("eth_call to {to} failed: {e}")))
    }
}

#[async_trait]
impl TokenGateway for Erc20Gateway {
    #[instrument(skip(self), fields(token = %token, owner = %owner))]
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, DepositError> {
        let calldata = IERC20::balanceOfCall { account: owner }.abi_encode();
        let result = self.read(token, calldata).await?;
        Ok(U256::from_be_slice(&result))
    }

    #[instrument(skip(self), fields(token = %token))]
    async fn decimals(&self, token: Address) -> Result<u8, DepositError> {
        let calldata = IERC20::decimalsCall {}.abi_encode();
        let result = self.read(token, calldata).await?;
        let word = U256::from_be_slice(&result);

        u8::try_from(word)
            .map_err(|_| DepositError::Rpc(format!("token {token} returned absurd decimals")))
    }

    #[instrument(skip(self), fields(token = %token, owner = %owner, spender = %spender))]
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<AllowanceState, DepositError> {
        let calldata = IERC20::allowanceCall { owner, spender }.abi_encode();
        let result = self.read(token, calldata).await?;

        Ok(AllowanceState {
            owner,
            spender,
            current: U256::from_be_slice(&result),
        })
    }

    fn approve_tx(&self, token: Address, spender: Address, amount: U256) -> TransactionRequest {
        let calldata = IERC20::approveCall { spender, amount }.abi_encode();

        TransactionRequest::default()
            .to(token)
            .input(Bytes::from(calldata).into())
    }

    fn supply_tx(&self, core: Address, ltoken: Address, amount: U256) -> TransactionRequest {
        let calldata = ILayerBankCore::supplyCall {
            gToken: ltoken,
            uAmount: amount,
        }
        .abi_encode();

        TransactionRequest::default()
            .to(core)
            .input(Bytes::from(calldata).into())
    }
}
