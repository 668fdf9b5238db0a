//! Pool and transport error types.
//!
//! [`ConnectionError`] is what a transport reports when it cannot hand out
//! a connected client. [`PoolError`] is what callers of the pool see: either
//! that transport error, unchanged, or a cancellation while waiting for the
//! pool's lock.

use std::io;

/// Transport-level failure while connecting or disconnecting a client.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The broker endpoint could not be reached.
    #[error("broker {endpoint} unreachable: {source}")]
    Unreachable {
        /// `host:port` of the endpoint.
        endpoint: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The connect attempt did not complete in time.
    #[error("connect to {endpoint} timed out after {timeout_ms} ms")]
    Timeout {
        /// `host:port` of the endpoint.
        endpoint: String,
        /// Elapsed budget in milliseconds.
        timeout_ms: u64,
    },

    /// The client was already disconnected.
    #[error("connection closed")]
    Closed,
}

/// Error returned by [`crate::service::PoolCoordinator`] operations.
///
/// # Error Code Ranges
///
/// | Range     | Category     |
/// |-----------|--------------|
/// | 1000–1999 | Caller       |
/// | 3000–3999 | Transport    |
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Creating a client failed. Nothing was cached.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The caller cancelled while waiting for the pool lock.
    #[error("operation cancelled before entering the pool")]
    Cancelled,
}

impl PoolError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Cancelled => 1001,
            Self::Connection(ConnectionError::Unreachable { .. }) => 3001,
            Self::Connection(ConnectionError::Timeout { .. }) => 3002,
            Self::Connection(ConnectionError::Closed) => 3003,
        }
    }

    /// Returns `true` if this error came from the transport.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_converts_unchanged() {
        let err: PoolError = ConnectionError::Timeout {
            endpoint: "broker1:1883".to_string(),
            timeout_ms: 250,
        }
        .into();
        assert!(err.is_connection());
        assert_eq!(err.to_string(), "connect to broker1:1883 timed out after 250 ms");
        assert_eq!(err.error_code(), 3002);

        let closed: PoolError = ConnectionError::Closed.into();
        assert_eq!(closed.to_string(), "connection closed");
        assert_eq!(closed.error_code(), 3003);
    }

    #[test]
    fn cancelled_is_not_a_connection_error() {
        let err = PoolError::Cancelled;
        assert!(!err.is_connection());
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn unreachable_keeps_io_source() {
        let err = ConnectionError::Unreachable {
            endpoint: "broker1:1883".to_string(),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("broker broker1:1883 unreachable"));
    }
}
