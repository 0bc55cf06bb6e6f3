//! Token pool connection configuration.

use serde::{Deserialize, Serialize};

/// Pool endpoint the supplier connects to by default.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8046/ws/supplier";

/// Token pool connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPoolConfig {
    /// Maintain the pool connection automatically
    #[serde(default)]
    pub auto_connect: bool,
    /// Pool endpoint for the connection watchdog
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for TokenPoolConfig {
    fn default() -> Self {
        Self { auto_connect: false, server_url: default_server_url() }
    }
}
