//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// HTTP server settings for the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer token required for admin-only endpoints.
    ///
    /// When unset, admin endpoints reject all callers. The surrounding host
    /// application is expected to terminate real authentication in front of
    /// this service.
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}
