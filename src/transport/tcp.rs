//! Plain TCP transport.
//!
//! [`TcpClientFactory`] opens one `TcpStream` per connect call, bounded by
//! a timeout. Framing is left to the layer above, which reads and writes
//! raw bytes through [`TcpBusClient`].

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::{BusClient, ClientFactory};
use crate::config::PoolSettings;
use crate::error::ConnectionError;

/// Factory producing [`TcpBusClient`]s.
///
/// Makes a single attempt per call; a failure is reported, not retried.
#[derive(Debug, Clone, Copy)]
pub struct TcpClientFactory {
    connect_timeout: Duration,
}

impl TcpClientFactory {
    /// Creates a factory with the given connect timeout.
    #[must_use]
    pub const fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Creates a factory using [`PoolSettings::connect_timeout`].
    #[must_use]
    pub const fn from_settings(settings: &PoolSettings) -> Self {
        Self::new(settings.connect_timeout)
    }
}

impl Default for TcpClientFactory {
    fn default() -> Self {
        Self::from_settings(&PoolSettings::default())
    }
}

#[async_trait]
impl ClientFactory for TcpClientFactory {
    type Client = TcpBusClient;

    async fn connect(&self, host: &str, port: u16) -> Result<TcpBusClient, ConnectionError> {
        let endpoint = format!("{host}:{port}");
        tracing::debug!(%endpoint, "opening tcp connection");

        let stream = timeout(self.connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| ConnectionError::Timeout {
                endpoint: endpoint.clone(),
                timeout_ms: u64::try_from(self.connect_timeout.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(|source| ConnectionError::Unreachable {
                endpoint: endpoint.clone(),
                source,
            })?;

        Ok(TcpBusClient::new(endpoint, stream))
    }
}

/// A connected TCP stream split into independently locked halves, so one
/// holder may read while another writes.
///
/// [`BusClient::disconnect`] fires `closed`, which ends any pending
/// [`TcpBusClient::receive`] with [`ConnectionError::Closed`].
#[derive(Debug)]
pub struct TcpBusClient {
    endpoint: String,
    closed: CancellationToken,
    reader: Mutex<Option<OwnedReadHalf>>,
    writer: Mutex<Option<OwnedWriteHalf>>,
}

impl TcpBusClient {
    fn new(endpoint: String, stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            endpoint,
            closed: CancellationToken::new(),
            reader: Mutex::new(Some(read_half)),
            writer: Mutex::new(Some(write_half)),
        }
    }

    /// Remote `host:port`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Writes an encoded frame and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Closed`] after disconnect, or
    /// [`ConnectionError::Unreachable`] if the write fails.
    pub async fn send(&self, frame: &[u8]) -> Result<(), ConnectionError> {
        let mut writer = self.writer.lock().await;
        let half = writer.as_mut().ok_or(ConnectionError::Closed)?;
        half.write_all(frame).await.map_err(|e| self.io_error(e))?;
        half.flush().await.map_err(|e| self.io_error(e))
    }

    /// Reads available bytes into `buf`, returning how many were read.
    /// `Ok(0)` means the broker closed the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Closed`] after disconnect, or
    /// [`ConnectionError::Unreachable`] if the read fails.
    pub async fn receive(&self, buf: &mut [u8]) -> Result<usize, ConnectionError> {
        tokio::select! {
            biased;
            () = self.closed.cancelled() => Err(ConnectionError::Closed),
            result = async {
                let mut reader = self.reader.lock().await;
                let Some(half) = reader.as_mut() else {
                    return Err(ConnectionError::Closed);
                };
                half.read(buf).await.map_err(|e| self.io_error(e))
            } => result,
        }
    }

    /// Returns `true` once [`BusClient::disconnect`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn io_error(&self, source: io::Error) -> ConnectionError {
        ConnectionError::Unreachable {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

#[async_trait]
impl BusClient for TcpBusClient {
    async fn disconnect(&self) -> Result<(), ConnectionError> {
        self.closed.cancel();
        let writer = self.writer.lock().await.take();
        let result = match writer {
            Some(mut half) => match half.shutdown().await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
                Err(e) => Err(self.io_error(e)),
            },
            None => Ok(()),
        };
        // Pending reads drop the reader lock as soon as `closed` fires.
        drop(self.reader.lock().await.take());
        result
    }
}
