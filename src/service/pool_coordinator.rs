//! Shared sender/receiver client pool.
//!
//! [`PoolCoordinator`] keeps two independent caches, one per [`Role`],
//! keyed by [`ConnectionKey`]. Both live behind a single
//! [`tokio::sync::Mutex`]: every lookup, connect and teardown happens while
//! that lock is held, so at most one client is ever created per
//! (configuration, role) and a slow connect on one role also delays the
//! other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use crate::config::PoolSettings;
use crate::domain::{ConnectionConfiguration, ConnectionKey, PooledClient, Role};
use crate::error::PoolError;
use crate::transport::ClientFactory;

type Shared<C> = Arc<PooledClient<C>>;

#[derive(Debug)]
struct PoolState<C> {
    senders: HashMap<ConnectionKey, Shared<C>>,
    receivers: HashMap<ConnectionKey, Shared<C>>,
}

impl<C> PoolState<C> {
    fn new() -> Self {
        Self {
            senders: HashMap::new(),
            receivers: HashMap::new(),
        }
    }

    fn cache(&self, role: Role) -> &HashMap<ConnectionKey, Shared<C>> {
        match role {
            Role::Sender => &self.senders,
            Role::Receiver => &self.receivers,
        }
    }

    fn cache_mut(&mut self, role: Role) -> &mut HashMap<ConnectionKey, Shared<C>> {
        match role {
            Role::Sender => &mut self.senders,
            Role::Receiver => &mut self.receivers,
        }
    }
}

/// Process-wide registry of open broker clients.
///
/// Construct once at startup and share by `Arc`. Clients are created lazily
/// on the first acquire for a configuration and returned from cache on every
/// later acquire until released.
///
/// # Concurrency
///
/// - Concurrent acquires for the same configuration and role trigger one
///   connect; all callers receive the same instance.
/// - A failed connect caches nothing; the next acquire connects again.
/// - A caller cancelled while waiting for the lock changes nothing.
#[derive(Debug)]
pub struct PoolCoordinator<F: ClientFactory> {
    factory: F,
    settings: PoolSettings,
    state: Mutex<PoolState<F::Client>>,
}

impl<F: ClientFactory> PoolCoordinator<F> {
    /// Creates an empty pool backed by `factory`.
    #[must_use]
    pub fn new(factory: F, settings: PoolSettings) -> Self {
        Self {
            factory,
            settings,
            state: Mutex::new(PoolState::new()),
        }
    }

    /// Returns the settings this pool was built with.
    #[must_use]
    pub const fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Returns the client factory.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns the sender client for `config`, connecting on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Cancelled`] if `cancel` fires before the pool
    /// lock is acquired, or [`PoolError::Connection`] if connecting fails.
    pub async fn acquire_sender(
        &self,
        config: &ConnectionConfiguration,
        cancel: &CancellationToken,
    ) -> Result<Shared<F::Client>, PoolError> {
        self.acquire(Role::Sender, config, cancel).await
    }

    /// Returns the receiver client for `config`, connecting on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Cancelled`] if `cancel` fires before the pool
    /// lock is acquired, or [`PoolError::Connection`] if connecting fails.
    pub async fn acquire_receiver(
        &self,
        config: &ConnectionConfiguration,
        cancel: &CancellationToken,
    ) -> Result<Shared<F::Client>, PoolError> {
        self.acquire(Role::Receiver, config, cancel).await
    }

    /// Removes `client` from the sender cache and disconnects it.
    ///
    /// Releasing a client that is no longer cached is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Cancelled`] if `cancel` fires before the pool
    /// lock is acquired.
    pub async fn release_sender(
        &self,
        client: &Shared<F::Client>,
        cancel: &CancellationToken,
    ) -> Result<(), PoolError> {
        self.release(Role::Sender, client, cancel).await
    }

    /// Removes `client` from the receiver cache and disconnects it.
    ///
    /// Releasing a client that is no longer cached is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Cancelled`] if `cancel` fires before the pool
    /// lock is acquired.
    pub async fn release_receiver(
        &self,
        client: &Shared<F::Client>,
        cancel: &CancellationToken,
    ) -> Result<(), PoolError> {
        self.release(Role::Receiver, client, cancel).await
    }

    /// Number of cached sender clients.
    pub async fn sender_count(&self) -> usize {
        self.state.lock().await.senders.len()
    }

    /// Number of cached receiver clients.
    pub async fn receiver_count(&self) -> usize {
        self.state.lock().await.receivers.len()
    }

    /// Returns `true` if a client for `config` is cached under `role`.
    pub async fn contains(&self, role: Role, config: &ConnectionConfiguration) -> bool {
        self.state
            .lock()
            .await
            .cache(role)
            .contains_key(&ConnectionKey::from(config))
    }

    async fn lock(
        &self,
        cancel: &CancellationToken,
    ) -> Result<MutexGuard<'_, PoolState<F::Client>>, PoolError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PoolError::Cancelled),
            guard = self.state.lock() => Ok(guard),
        }
    }

    async fn acquire(
        &self,
        role: Role,
        config: &ConnectionConfiguration,
        cancel: &CancellationToken,
    ) -> Result<Shared<F::Client>, PoolError> {
        let key = ConnectionKey::from(config);
        let mut state = self.lock(cancel).await?;

        if let Some(existing) = state.cache(role).get(&key) {
            tracing::debug!(%role, endpoint = %key, client_id = %existing.id(), "pooled client reused");
            return Ok(Arc::clone(existing));
        }

        let client = match self.factory.connect(config.host(), config.port()).await {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(%role, endpoint = %key, error = %e, "broker connect failed");
                return Err(e.into());
            }
        };

        let pooled = Arc::new(PooledClient::new(role, config.clone(), client));
        tracing::info!(%role, endpoint = %key, client_id = %pooled.id(), "pooled client created");
        state.cache_mut(role).insert(key, Arc::clone(&pooled));
        Ok(pooled)
    }

    async fn release(
        &self,
        role: Role,
        client: &Shared<F::Client>,
        cancel: &CancellationToken,
    ) -> Result<(), PoolError> {
        let mut state = self.lock(cancel).await?;

        if client.role() != role {
            tracing::debug!(
                %role,
                client_role = %client.role(),
                client_id = %client.id(),
                "release ignored for client of another role"
            );
            return Ok(());
        }

        let key = ConnectionKey::from(client.config());
        let cache = state.cache_mut(role);
        let cached = cache
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, client));
        if cached {
            cache.remove(&key);
        }

        let torn_down = client.shutdown(self.settings.teardown_timeout).await;
        drop(state);

        tracing::info!(
            %role,
            endpoint = %key,
            client_id = %client.id(),
            evicted = cached,
            torn_down,
            "pooled client released"
        );
        Ok(())
    }
}
