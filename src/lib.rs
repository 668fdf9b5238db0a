//! # bus-client-pool
//!
//! Shared connection registry for publish/subscribe message-bus clients.
//!
//! Many independent activity executions need a sender or receiver bound to
//! a broker endpoint. Instead of connecting per invocation, they ask a
//! single [`PoolCoordinator`] which connects on first request and hands the
//! same client to every later request for an identical configuration.
//! Sender and receiver clients live in separate caches.
//!
//! ## Architecture
//!
//! ```text
//! Callers (workflow activities)
//!     │
//!     ├── PoolCoordinator (service/)
//!     │      ├── sender cache   ─┐
//!     │      └── receiver cache ─┴── one tokio Mutex
//!     │
//!     ├── ConnectionConfiguration / ConnectionKey / PooledClient (domain/)
//!     │
//!     └── ClientFactory → BusClient (transport/)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use bus_client_pool::{ConnectionConfiguration, PoolCoordinator, PoolSettings};
//! use bus_client_pool::transport::TcpClientFactory;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), bus_client_pool::PoolError> {
//! let settings = PoolSettings::from_env();
//! let pool = PoolCoordinator::new(TcpClientFactory::from_settings(&settings), settings);
//! let config = ConnectionConfiguration::new("broker1", 1883).with_client_id("wf-1");
//!
//! let sender = pool.acquire_sender(&config, &CancellationToken::new()).await?;
//! sender.client().send(b"hello").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod transport;

#[cfg(test)]
mod testutil;

pub use config::PoolSettings;
pub use domain::{ConnectionConfiguration, ConnectionKey, PooledClient, Role};
pub use error::{ConnectionError, PoolError};
pub use service::PoolCoordinator;
