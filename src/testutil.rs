//! Shared test utilities: a counting mock transport.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use crate::error::ConnectionError;
use crate::transport::{BusClient, ClientFactory};

/// Installs a test subscriber once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client produced by [`MockFactory`].
#[derive(Debug)]
pub struct MockClient {
    serial: usize,
    hang: bool,
    disconnects: Arc<AtomicUsize>,
}

impl MockClient {
    /// A client not tied to any factory.
    pub fn detached(hang: bool) -> Self {
        Self {
            serial: 0,
            hang,
            disconnects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Order in which the factory created this client (1-based).
    pub fn serial(&self) -> usize {
        self.serial
    }

    /// Disconnects recorded on this client's counter.
    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BusClient for MockClient {
    async fn disconnect(&self) -> Result<(), ConnectionError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Factory counting connect attempts, with optional delay and injected
/// failures.
#[derive(Debug, Default)]
pub struct MockFactory {
    connects: AtomicUsize,
    failures_left: AtomicUsize,
    connect_delay: Duration,
    hang_on_disconnect: bool,
    disconnects: Arc<AtomicUsize>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every connect sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    /// Clients never finish disconnecting.
    pub fn with_hanging_disconnect(mut self) -> Self {
        self.hang_on_disconnect = true;
        self
    }

    /// The next `n` connect attempts fail with connection refused.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    /// Connect attempts so far, failed ones included.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Disconnects across all clients from this factory.
    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for MockFactory {
    type Client = MockClient;

    async fn connect(&self, host: &str, port: u16) -> Result<MockClient, ConnectionError> {
        let serial = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }

        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(ConnectionError::Unreachable {
                endpoint: format!("{host}:{port}"),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }

        Ok(MockClient {
            serial,
            hang: self.hang_on_disconnect,
            disconnects: Arc::clone(&self.disconnects),
        })
    }
}
