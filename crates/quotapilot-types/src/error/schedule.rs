//! Schedule validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections produced when mutating the warmup schedule.
///
/// Every variant is advisory: the mutation is refused and the prior
/// configuration is left untouched.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ScheduleError {
    /// Candidate window too close to another enabled window
    #[error(
        "Window {index} would be {distance_minutes}min from window {other_index} (minimum {min_separation}min)"
    )]
    WindowConflict {
        /// Index of the window being placed
        index: usize,
        /// Index of the enabled window it collides with
        other_index: usize,
        /// Circular distance between the two times
        distance_minutes: u16,
        /// Required minimum separation
        min_separation: u16,
    },

    /// Mutation would leave a required selection empty
    #[error("At least one {what} must remain selected")]
    EmptySelection {
        /// Human-readable name of the collection ("peak window", "monitored model")
        what: String,
    },

    /// Window index outside the configured set
    #[error("No window at index {index}")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
    },
}
