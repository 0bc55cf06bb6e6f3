//! Application configuration models.

mod app;
mod pool;
mod warmup;

pub use app::AppConfig;
pub use pool::{TokenPoolConfig, DEFAULT_SERVER_URL};
pub use warmup::{
    default_windows, ScheduledWarmupConfig, TimeWindow, WarmupMode, DEFAULT_MODEL_CATALOG,
    MAX_WINDOWS, MINUTES_PER_DAY, MIN_WINDOW_SEPARATION_MINUTES, WARMUP_LEAD_MINUTES,
};
