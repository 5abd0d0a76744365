//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. One adapter family exists: the Scroll chain
//! layer (RPC provider, ERC-20 gateway, transaction client).

pub mod chain;
