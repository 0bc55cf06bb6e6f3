//! Token pool connection errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the remote pooling service.
///
/// All of these are transient from the watchdog's point of view: the failed
/// operation is skipped and retried on a later tick, never escalated.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum PoolError {
    /// Status poll failed (network error, service not reachable)
    #[error("Status query failed: {message}")]
    StatusUnavailable {
        /// Description of the query failure
        message: String,
    },

    /// Connection attempt failed
    #[error("Connect to {server_url} failed: {message}")]
    ConnectFailed {
        /// Endpoint the attempt targeted
        server_url: String,
        /// Description of the connect failure
        message: String,
    },

    /// Teardown of the current connection failed
    #[error("Disconnect failed: {message}")]
    DisconnectFailed {
        /// Description of the disconnect failure
        message: String,
    },
}
