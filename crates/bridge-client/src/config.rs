//! Client configuration and endpoint resolution.
//!
//! Defaults target the local extension (`ws://127.0.0.1:57110`). The
//! environment can move the endpoint (`BRIDGE_HOST` / `BRIDGE_PORT`);
//! explicitly set fields override the environment.

use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use bridge_core::constants::{DEFAULT_HOST, DEFAULT_PORT, HOST_ENV, PORT_ENV};

/// Where the bridge listens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP, normally loopback.
    pub host: String,
    /// TCP port; never zero.
    pub port: u16,
}

impl Endpoint {
    /// Build an endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// WebSocket URL for this endpoint.
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Everything needed to construct a [`BridgeClient`].
///
/// Plain data; fill in the fields that differ from the defaults. The
/// token is redacted from `Debug` output.
///
/// [`BridgeClient`]: crate::BridgeClient
#[derive(Clone)]
pub struct ClientConfig {
    /// Bridge host.
    pub host: String,
    /// Bridge port.
    pub port: u16,
    /// Explicit bearer token, bypassing env and file resolution.
    pub token: Option<String>,
    /// Explicit token file location.
    pub token_file: Option<PathBuf>,
    /// Workspace root anchoring the default token file location.
    pub workspace_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            token: None,
            token_file: None,
            workspace_dir: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("token_file", &self.token_file)
            .field("workspace_dir", &self.workspace_dir)
            .finish()
    }
}

impl ClientConfig {
    /// Defaults plus `BRIDGE_HOST` / `BRIDGE_PORT` overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Apply endpoint overrides from an environment lookup. Invalid
    /// values are ignored with a warning rather than failing startup.
    pub(crate) fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(host) = env(HOST_ENV) {
            if host.is_empty() {
                warn!("ignoring empty {HOST_ENV}");
            } else {
                self.host = host;
            }
        }
        if let Some(raw) = env(PORT_ENV) {
            match parse_port(&raw) {
                Some(port) => self.port = port,
                None => warn!(value = %raw, "ignoring invalid {PORT_ENV}"),
            }
        }
    }

    /// Endpoint this configuration points at.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }
}

/// Parse a port value, rejecting zero.
pub(crate) fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse::<u16>().ok().filter(|port| *port != 0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_local_extension() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint(), Endpoint::new("127.0.0.1", 57110));
        assert_eq!(config.endpoint().url(), "ws://127.0.0.1:57110");
    }

    #[test]
    fn endpoint_display_is_the_url() {
        assert_eq!(Endpoint::new("localhost", 9000).to_string(), "ws://localhost:9000");
    }

    #[test]
    fn env_overrides_both_endpoint_fields() {
        let mut config = ClientConfig::default();
        config.apply_env(|name| match name {
            HOST_ENV => Some("10.0.0.2".into()),
            PORT_ENV => Some("6000".into()),
            _ => None,
        });
        assert_eq!(config.host, "10.0.0.2");
        assert_eq!(config.port, 6000);
    }

    #[test]
    fn invalid_port_values_keep_the_default() {
        for bad in ["", "0", "70000", "ws", "-1"] {
            let mut config = ClientConfig::default();
            config.apply_env(|name| (name == PORT_ENV).then(|| bad.to_owned()));
            assert_eq!(config.port, DEFAULT_PORT, "value {bad:?} should be ignored");
        }
    }

    #[test]
    fn empty_host_keeps_the_default() {
        let mut config = ClientConfig::default();
        config.apply_env(|name| (name == HOST_ENV).then(String::new));
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn parse_port_accepts_the_valid_range() {
        assert_eq!(parse_port("1"), Some(1));
        assert_eq!(parse_port("57110"), Some(57110));
        assert_eq!(parse_port(" 65535 "), Some(65535));
        assert_eq!(parse_port("0"), None);
        assert_eq!(parse_port("65536"), None);
        assert_eq!(parse_port("port"), None);
    }

    #[test]
    fn debug_never_shows_the_token() {
        let config = ClientConfig {
            token: Some("super-secret".into()),
            ..ClientConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }
}
