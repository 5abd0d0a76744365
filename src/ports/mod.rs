//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the orchestrator requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ChainClient`: transaction lifecycle against the RPC endpoint
//! - `TokenGateway`: ERC-20 reads and unsigned call construction

pub mod chain_client;
pub mod token_gateway;
