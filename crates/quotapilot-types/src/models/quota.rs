//! Quota observation models.

use serde::{Deserialize, Serialize};

/// One observation of a model's remaining quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelQuota {
    /// Model name
    pub name: String,
    /// Remaining percentage (0-100)
    pub percentage: i32,
}

impl ModelQuota {
    /// Create an observation.
    pub fn new(name: impl Into<String>, percentage: i32) -> Self {
        Self { name: name.into(), percentage }
    }

    /// Quota fully recovered.
    pub fn is_full(&self) -> bool {
        self.percentage >= 100
    }
}
