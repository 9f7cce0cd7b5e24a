//! Client configuration.
//!
//! `ClientConfig` is fixed at construction and read on every call. It derives
//! serde so an embedding application can keep it in its own config file; this
//! crate never loads configuration by itself.

use serde::{Deserialize, Serialize};

/// Proxy the client connects through instead of the origin.
///
/// Fields are not validated until a request is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            username: None,
            password: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// `host[:port]`.
    pub fn target(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.clone(),
        }
    }

    /// `username:password`, only when both are set.
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{user}:{pass}")),
            _ => None,
        }
    }
}

/// Immutable configuration owned by an `HttpClient`.
///
/// The default has no proxy and TLS peer verification turned off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    #[serde(default)]
    pub verify_tls_peer: bool,
}

impl ClientConfig {
    pub fn new(proxy: Option<ProxyConfig>, verify_tls_peer: bool) -> Self {
        Self {
            proxy,
            verify_tls_peer,
        }
    }
}
