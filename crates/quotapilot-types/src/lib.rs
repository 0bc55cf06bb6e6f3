//! # Quotapilot Types
//!
//! Core types, models, and error definitions for Quotapilot.
//!
//! This crate provides the foundational type system for the Quotapilot
//! workspace:
//!
//! - **`error`** - Typed error hierarchy for schedule, pool, and configuration
//! - **`models`** - Domain models (config, quota observations, pool status)
//!
//! ## Architecture Role
//!
//! `quotapilot-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!   quotapilot-types (this crate)
//!           │
//!           ▼
//!   quotapilot-core
//!           │
//!           ▼
//!      host process
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for API/IPC
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, PoolError, Result, ScheduleError, TypedError};

// Re-export core model types
pub use models::{
    AppConfig, ConnectionStatus, ModelQuota, PoolStatusReport, ScheduledWarmupConfig, TimeWindow,
    TokenPoolConfig, WarmupMode,
};
