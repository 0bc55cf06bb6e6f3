//! Token pool connection status models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state reported by the pooling service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No connection established
    #[default]
    Disconnected,
    /// Handshake in progress
    Connecting,
    /// Connection established
    Connected,
    /// Connection failed or dropped
    Error(String),
}

impl ConnectionStatus {
    /// A connect attempt should be issued for this status.
    pub fn needs_connect(&self) -> bool {
        matches!(*self, Self::Disconnected | Self::Error(_))
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Error(ref reason) => write!(f, "error: {}", reason),
        }
    }
}

/// Snapshot returned by a status poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PoolStatusReport {
    /// Current connection state
    pub status: ConnectionStatus,
    /// Supplier ID assigned by the pool after a successful handshake
    #[serde(default)]
    pub supplier_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_connect() {
        assert!(ConnectionStatus::Disconnected.needs_connect());
        assert!(ConnectionStatus::Error("timeout".to_string()).needs_connect());
        assert!(!ConnectionStatus::Connecting.needs_connect());
        assert!(!ConnectionStatus::Connected.needs_connect());
    }
}
