//! Transport boundary: how the pool obtains and tears down live clients.
//!
//! The pool never speaks the broker protocol itself. It asks a
//! [`ClientFactory`] for a connected [`BusClient`] and calls
//! [`BusClient::disconnect`] on release.

pub mod tcp;

use std::fmt;

use async_trait::async_trait;

use crate::error::ConnectionError;

pub use tcp::{TcpBusClient, TcpClientFactory};

/// A connected message-bus client.
///
/// The pool does not serialize use of one client by several holders; an
/// implementation that is not safe for concurrent use must guard itself.
#[async_trait]
pub trait BusClient: Send + Sync + fmt::Debug + 'static {
    /// Releases the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionError`] if the transport fails while closing.
    async fn disconnect(&self) -> Result<(), ConnectionError>;
}

/// Establishes connected clients for a broker endpoint.
#[async_trait]
pub trait ClientFactory: Send + Sync + fmt::Debug {
    /// Client type produced by this factory.
    type Client: BusClient;

    /// Opens a connection to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionError`] on network or protocol failure.
    async fn connect(&self, host: &str, port: u16) -> Result<Self::Client, ConnectionError>;
}
