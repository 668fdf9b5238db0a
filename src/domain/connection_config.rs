//! Broker endpoint description.
//!
//! [`ConnectionConfiguration`] is an immutable value: two configurations
//! with identical fields are the same pool entry. Free-form broker
//! parameters live in a [`BTreeMap`] so equality and hashing do not depend
//! on insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default MQTT keep-alive interval in seconds.
pub const DEFAULT_KEEP_ALIVE_SECS: u16 = 60;

/// Endpoint and session parameters for one broker connection.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionConfiguration {
    host: String,
    port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(default = "default_keep_alive")]
    keep_alive_secs: u16,
    #[serde(default = "default_clean_session")]
    clean_session: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, String>,
}

const fn default_keep_alive() -> u16 {
    DEFAULT_KEEP_ALIVE_SECS
}

const fn default_clean_session() -> bool {
    true
}

impl ConnectionConfiguration {
    /// Creates a configuration for `host:port` with default session
    /// parameters.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: None,
            username: None,
            password: None,
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
            clean_session: true,
            parameters: BTreeMap::new(),
        }
    }

    /// Sets the client identifier presented to the broker.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets username/password credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the keep-alive interval in seconds.
    #[must_use]
    pub const fn with_keep_alive_secs(mut self, secs: u16) -> Self {
        self.keep_alive_secs = secs;
        self
    }

    /// Sets the clean-session flag.
    #[must_use]
    pub const fn with_clean_session(mut self, clean: bool) -> Self {
        self.clean_session = clean;
        self
    }

    /// Adds a broker-specific parameter, replacing any previous value for
    /// the same name.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Broker host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Broker port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Client identifier, if any.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Keep-alive interval in seconds.
    #[must_use]
    pub const fn keep_alive_secs(&self) -> u16 {
        self.keep_alive_secs
    }

    /// Whether the broker should discard prior session state.
    #[must_use]
    pub const fn clean_session(&self) -> bool {
        self.clean_session
    }

    /// Broker-specific parameters, ordered by name.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Renders `host:port` for logging.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ConnectionConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfiguration")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("keep_alive_secs", &self.keep_alive_secs)
            .field("clean_session", &self.clean_session)
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn identical_fields_are_equal() {
        let a = ConnectionConfiguration::new("broker1", 1883).with_client_id("wf-1");
        let b = ConnectionConfiguration::new("broker1", 1883).with_client_id("wf-1");
        assert_eq!(a, b);
    }

    #[test]
    fn accessors_return_builder_values() {
        let config = ConnectionConfiguration::new("broker1", 1883)
            .with_client_id("wf-1")
            .with_credentials("user", "secret")
            .with_keep_alive_secs(30)
            .with_clean_session(false)
            .with_parameter("qos", "1");

        assert_eq!(config.host(), "broker1");
        assert_eq!(config.port(), 1883);
        assert_eq!(config.client_id(), Some("wf-1"));
        assert_eq!(config.username(), Some("user"));
        assert_eq!(config.password(), Some("secret"));
        assert_eq!(config.keep_alive_secs(), 30);
        assert!(!config.clean_session());
        assert_eq!(config.parameters().get("qos").map(String::as_str), Some("1"));
        assert_eq!(config.parameters().len(), 1);
    }

    #[test]
    fn every_field_participates_in_equality() {
        let base = ConnectionConfiguration::new("broker1", 1883);
        assert_ne!(base, ConnectionConfiguration::new("broker1", 1884));
        assert_ne!(base, ConnectionConfiguration::new("broker2", 1883));
        assert_ne!(base, base.clone().with_client_id("wf-1"));
        assert_ne!(base, base.clone().with_credentials("user", "secret"));
        assert_ne!(base, base.clone().with_keep_alive_secs(30));
        assert_ne!(base, base.clone().with_clean_session(false));
        assert_ne!(base, base.clone().with_parameter("qos", "1"));
    }

    #[test]
    fn parameter_order_does_not_matter() {
        let a = ConnectionConfiguration::new("broker1", 1883)
            .with_parameter("qos", "1")
            .with_parameter("retain", "false");
        let b = ConnectionConfiguration::new("broker1", 1883)
            .with_parameter("retain", "false")
            .with_parameter("qos", "1");
        assert_eq!(a, b);
    }

    #[test]
    fn debug_redacts_password() {
        let config = ConnectionConfiguration::new("broker1", 1883).with_credentials("user", "hunter2");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert_eq!(config.password(), Some("hunter2"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"host":"broker1","port":1883}"#;
        let Ok(config) = serde_json::from_str::<ConnectionConfiguration>(json) else {
            panic!("deserialization failed");
        };
        assert_eq!(config, ConnectionConfiguration::new("broker1", 1883));
        assert_eq!(config.keep_alive_secs(), DEFAULT_KEEP_ALIVE_SECS);
        assert!(config.clean_session());
        assert_eq!(config.endpoint(), "broker1:1883");
    }
}
