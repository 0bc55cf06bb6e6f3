//! Application-level configuration.

use serde::{Deserialize, Serialize};

use super::pool::TokenPoolConfig;
use super::warmup::ScheduledWarmupConfig;

/// Full application configuration.
///
/// Owned and persisted by the settings surface; the scheduling and
/// connection components only ever read consistent snapshots of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Scheduled warmup configuration
    #[serde(default)]
    pub scheduled_warmup: ScheduledWarmupConfig,
    /// Token pool connection configuration
    #[serde(default)]
    pub token_pool: TokenPoolConfig,
}

impl AppConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self {
            scheduled_warmup: ScheduledWarmupConfig::default(),
            token_pool: TokenPoolConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
