//! Client configuration.

use std::time::Duration;

/// Default endpoint when none is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8080/";

/// Configuration for a [`ChatClient`](crate::ChatClient).
///
/// Start from [`ClientConfig::default()`], [`ClientConfig::new`] or
/// [`ClientConfig::for_host`] and override what you need:
///
/// ```rust
/// use std::time::Duration;
/// use simplechat::ClientConfig;
///
/// let config = ClientConfig::for_host("chat.example.com:8080")
///     .with_connect_timeout(Some(Duration::from_secs(3)));
/// assert_eq!(config.endpoint, "ws://chat.example.com:8080/");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket URL of the chat server.
    pub endpoint: String,

    /// How long a connect attempt may take before it is abandoned and
    /// reported as closed. `None` waits as long as the transport does.
    ///
    /// Default: 10 seconds.
    pub connect_timeout: Option<Duration>,

    /// How long to wait for the server to acknowledge a close we asked
    /// for before dropping the connection anyway.
    ///
    /// Default: 5 seconds.
    pub close_timeout: Duration,
}

impl ClientConfig {
    /// Creates a config for the given WebSocket URL with default timeouts.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Creates a config pointing at the root path of `host` (`ws://{host}/`).
    ///
    /// This is how a page served by the chat server finds its socket.
    pub fn for_host(host: &str) -> Self {
        Self::new(format!("ws://{host}/"))
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the close acknowledgement timeout.
    #[must_use]
    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Some(Duration::from_secs(10)),
            close_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.close_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_for_host_builds_root_url() {
        let config = ClientConfig::for_host("localhost:9000");
        assert_eq!(config.endpoint, "ws://localhost:9000/");
    }

    #[test]
    fn test_builder_overrides_keep_other_fields() {
        let config = ClientConfig::new("ws://10.0.0.2/chat")
            .with_connect_timeout(None)
            .with_close_timeout(Duration::from_millis(100));
        assert_eq!(config.endpoint, "ws://10.0.0.2/chat");
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.close_timeout, Duration::from_millis(100));
    }
}
