//! # Quotapilot Core
//!
//! Core business logic for Quotapilot: the scheduling and connection loops
//! behind the settings surface of the account manager.
//!
//! ```text
//! quotapilot-core/src/modules/
//! ├── config.rs    # File-backed config store + shared snapshot handle
//! ├── schedule.rs  # Circular-time validation and trigger arithmetic
//! ├── warmup.rs    # Warmup schedule engine (peak windows, quota recovery)
//! ├── scheduler.rs # Background tick loop driving the engine
//! ├── tokenpool.rs # Token pool connection watchdog
//! └── logger.rs    # Tracing wrappers + subscriber bootstrap
//! ```
//!
//! Remote operations (pool handshake, warmup dispatch) are consumed through
//! traits; the host process supplies the implementations.

#![allow(
    clippy::significant_drop_tightening,
    reason = "Lock guards in async code require careful lifetime management"
)]
#![cfg_attr(test, allow(clippy::panic, clippy::print_stdout, clippy::unwrap_used))]

pub mod error;
pub mod modules;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use modules::config::ConfigHandle;
pub use modules::scheduler::{QuotaObserver, WarmupLauncher};
pub use modules::tokenpool::{ConnectionWatchdog, PoolService};
pub use modules::warmup::{WarmupScheduleEngine, WarmupTrigger, WindowPhase};
