//! Pool settings loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`) and fall back to defaults when unset or unparsable.

use std::time::Duration;

/// Default upper bound for tearing down one released client.
pub const DEFAULT_TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default upper bound for a single connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-level tunables for the client pool.
///
/// Built once at startup, either with [`PoolSettings::default`] or
/// [`PoolSettings::from_env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// How long a release may spend disconnecting the client while the
    /// pool lock is held.
    pub teardown_timeout: Duration,

    /// How long one connect attempt may take in
    /// [`crate::transport::TcpClientFactory`].
    pub connect_timeout: Duration,
}

impl PoolSettings {
    /// Loads settings from environment variables.
    ///
    /// Reads `BUS_POOL_TEARDOWN_TIMEOUT_MS` and `BUS_POOL_CONNECT_TIMEOUT_MS`.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            teardown_timeout: parse_millis(
                std::env::var("BUS_POOL_TEARDOWN_TIMEOUT_MS").ok(),
                DEFAULT_TEARDOWN_TIMEOUT,
            ),
            connect_timeout: parse_millis(
                std::env::var("BUS_POOL_CONNECT_TIMEOUT_MS").ok(),
                DEFAULT_CONNECT_TIMEOUT,
            ),
        }
    }

    /// Returns a copy with a different teardown bound.
    #[must_use]
    pub const fn with_teardown_timeout(mut self, timeout: Duration) -> Self {
        self.teardown_timeout = timeout;
        self
    }

    /// Returns a copy with a different connect bound.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            teardown_timeout: DEFAULT_TEARDOWN_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Parses a millisecond count, returning `default` on missing, invalid or
/// zero values.
fn parse_millis(raw: Option<String>, default: Duration) -> Duration {
    raw.as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map_or(default, Duration::from_millis)
}
