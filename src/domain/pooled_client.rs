//! Cached live client bound to one configuration and one role.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ConnectionConfiguration;
use crate::transport::BusClient;

/// Which cache a client belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Outbound publishing.
    Sender,
    /// Inbound subscribing.
    Receiver,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sender => f.write_str("sender"),
            Self::Receiver => f.write_str("receiver"),
        }
    }
}

/// A live broker connection together with the configuration it was opened
/// for.
///
/// Handed out as `Arc<PooledClient<C>>`; every holder of the same `Arc`
/// shares one connection. Sender and receiver entries for the same
/// configuration are always distinct instances.
#[derive(Debug)]
pub struct PooledClient<C> {
    id: Uuid,
    role: Role,
    config: ConnectionConfiguration,
    client: C,
    created_at: DateTime<Utc>,
    released: AtomicBool,
}

impl<C: BusClient> PooledClient<C> {
    pub(crate) fn new(role: Role, config: ConnectionConfiguration, client: C) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            config,
            client,
            created_at: Utc::now(),
            released: AtomicBool::new(false),
        }
    }

    /// Unique instance identifier, for logs and identity checks.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Cache this client belongs to.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Configuration the client was created from.
    #[must_use]
    pub const fn config(&self) -> &ConnectionConfiguration {
        &self.config
    }

    /// The underlying transport client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// When the connection was opened.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` once the client has been torn down.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Disconnects the transport, waiting at most `limit`.
    ///
    /// Only the first call disconnects; later calls return `false`
    /// immediately. Transport errors and timeouts are logged, not returned.
    pub(crate) async fn shutdown(&self, limit: Duration) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }

        match tokio::time::timeout(limit, self.client.disconnect()).await {
            Ok(Ok(())) => {
                tracing::debug!(client_id = %self.id, role = %self.role, "client disconnected");
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    client_id = %self.id,
                    role = %self.role,
                    error = %e,
                    "client disconnect failed"
                );
            }
            Err(_) => {
                tracing::warn!(
                    client_id = %self.id,
                    role = %self.role,
                    timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    "client disconnect timed out"
                );
            }
        }
        true
    }
}
