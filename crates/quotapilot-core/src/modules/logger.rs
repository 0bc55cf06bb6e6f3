//! Logging convenience wrappers.
//!
//! Thin wrappers around tracing macros used throughout the crate, plus the
//! subscriber bootstrap for host processes.

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::error::{AppError, AppResult};

/// Install the default log subscriber for the host process.
pub fn init() -> AppResult<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Unknown(e.to_string()))
}

/// Log info message (backward compatibility interface).
pub(crate) fn log_info(message: &str) {
    info!("{}", message);
}

/// Log warning message (backward compatibility interface).
pub(crate) fn log_warn(message: &str) {
    warn!("{}", message);
}
