//! Scroll RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to the Scroll network via alloy-rs. Builds the
//! wallet-backed provider from the caller-supplied private key, routes
//! traffic through an optional HTTP proxy, and validates the chain ID at
//! startup.
//!
//! In alloy 0.9, `ProviderBuilder` returns a complex filler type. We store
//! it as a type-erased `dyn Provider` to keep the API clean across the
//! adapter layer.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::Http;
use tracing::{info, instrument};

use crate::config::NetworkConfig;
use crate::domain::DepositError;

/// Shared Scroll RPC provider backed by alloy-rs 0.9.
///
/// All chain adapters share a single provider instance. The wallet filler
/// signs outgoing transactions with the caller-supplied key, so adapters
/// only ever see unsigned `TransactionRequest`s.
pub struct ScrollProvider {
    /// The alloy HTTP provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Address derived from the signing key.
    sender: Address,
    /// RPC endpoint URL (for diagnostics, never logged with secrets).
    #[allow(dead_code)]
    rpc_url: String,
}

impl ScrollProvider {
    /// Connect to the Scroll RPC endpoint and validate the chain ID.
    ///
    /// A malformed private key surfaces as `Signing` before any network
    /// traffic. The proxy, when configured, carries every RPC call.
    #[instrument(skip_all)]
    pub async fn connect(network: &NetworkConfig, private_key: &str) -> Result<Self, DepositError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| DepositError::Signing(format!("invalid private key: {e}")))?;
        let sender = signer.address();
        let wallet = EthereumWallet::from(signer);

        let mut http_builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(network.request_timeout_secs));
        if let Some(proxy) = &network.proxy {
            let proxy = reqwest::Proxy::all(format!("http://{proxy}"))
                .map_err(|e| DepositError::Rpc(format!("invalid proxy: {e}")))?;
            http_builder = http_builder.proxy(proxy);
        }
        let http = http_builder
            .build()
            .map_err(|e| DepositError::Rpc(format!("failed to build HTTP client: {e}")))?;

        let url: reqwest::Url = network
            .rpc_url
            .parse()
            .map_err(|e| DepositError::Rpc(format!("invalid RPC URL: {e}")))?;
        let transport = Http::with_client(http, url);
        let rpc_client = RpcClient::new(transport, false).boxed();

        let provider = ProviderBuilder::new().wallet(wallet).on_client(rpc_client);

        // Wrap in Arc<dyn Provider> for type erasure
        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        // Validate chain ID at startup
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| DepositError::Rpc(format!("failed to query chain ID: {e}")))?;

        if chain_id != network.chain_id {
            return Err(DepositError::Rpc(format!(
                "expected chain_id={}, got {chain_id}",
                network.chain_id
            )));
        }

        info!(
            chain_id,
            sender = %sender,
            proxied = network.proxy.is_some(),
            "Connected to Scroll RPC"
        );

        Ok(Self {
            provider,
            sender,
            rpc_url: network.rpc_url.clone(),
        })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Address derived from the signing key.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
