//! Cache key derived from a [`ConnectionConfiguration`].
//!
//! The key holds the whole configuration, so a hash only picks a bucket and
//! the final hit is always decided by field-by-field equality. Two distinct
//! configurations can never share a pool entry.

use std::fmt;

use super::ConnectionConfiguration;

/// Lookup key for the sender and receiver caches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey(ConnectionConfiguration);

impl ConnectionKey {
    /// Derives the key for `config`.
    #[must_use]
    pub fn new(config: &ConnectionConfiguration) -> Self {
        Self(config.clone())
    }

    /// Returns the configuration this key was derived from.
    #[must_use]
    pub const fn config(&self) -> &ConnectionConfiguration {
        &self.0
    }
}

impl From<&ConnectionConfiguration> for ConnectionKey {
    fn from(config: &ConnectionConfiguration) -> Self {
        Self::new(config)
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.client_id() {
            Some(id) => write!(f, "{}#{id}", self.0.endpoint()),
            None => write!(f, "{}", self.0.endpoint()),
        }
    }
}
