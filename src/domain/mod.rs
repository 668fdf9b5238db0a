//! Domain layer: connection configuration, cache keys and pooled clients.
//!
//! This module contains the value types the pool works with: the broker
//! endpoint description, the key derived from it for cache lookup, and the
//! wrapper that binds a live client to its configuration and role.

pub mod connection_config;
pub mod connection_key;
pub mod pooled_client;

pub use connection_config::ConnectionConfiguration;
pub use connection_key::ConnectionKey;
pub use pooled_client::{PooledClient, Role};
