//! Scheduled warmup configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Length of the time-of-day ring, in minutes.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Lead between a peak window and its warmup trigger (5 hours).
pub const WARMUP_LEAD_MINUTES: u16 = 300;

/// Minimum circular separation between two enabled windows (5 hours).
pub const MIN_WINDOW_SEPARATION_MINUTES: u16 = 300;

/// Upper bound on configured windows. A UI/config guard, not a protocol limit.
pub const MAX_WINDOWS: usize = 6;

/// Built-in model catalog used when warmup is enabled with no selection.
pub const DEFAULT_MODEL_CATALOG: &[&str] =
    &["gemini-3-flash", "claude-sonnet-4-5", "gemini-3-pro-high", "gemini-3-pro-image"];

/// Warmup trigger policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WarmupMode {
    /// Fire as soon as a monitored model's quota recovers to 100%
    Immediate,
    /// Fire five hours ahead of each configured peak window
    #[default]
    PeakBased,
}

impl fmt::Display for WarmupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Immediate => write!(f, "immediate"),
            Self::PeakBased => write!(f, "peak_based"),
        }
    }
}

impl WarmupMode {
    /// Parse from string.
    pub fn from_string(s: &str) -> Self {
        match s {
            "immediate" => Self::Immediate,
            _ => Self::PeakBased,
        }
    }
}

/// A daily peak-usage window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct TimeWindow {
    /// Minutes since local midnight (0..=1439)
    #[validate(range(max = 1439_u16))]
    pub minutes: u16,
    /// Disabled windows impose no separation constraint and never trigger
    pub enabled: bool,
}

impl TimeWindow {
    /// Create an enabled window, normalizing the time onto the daily ring.
    pub fn new(minutes: u16) -> Self {
        Self { minutes: minutes % MINUTES_PER_DAY, enabled: true }
    }

    /// "HH:MM" label for the settings surface.
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// Scheduled warmup configuration.
/// Decides when proactive quota warmups fire for the monitored models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ScheduledWarmupConfig {
    /// Enable scheduled warmup
    #[serde(default)]
    pub enabled: bool,
    /// Trigger policy
    #[serde(default)]
    pub mode: WarmupMode,
    /// Daily peak windows (1-6 entries)
    #[validate(length(min = 1, max = 6))]
    #[validate(nested)]
    #[serde(default = "default_windows")]
    pub windows: Vec<TimeWindow>,
    /// Models whose quota recovery can trigger a warmup
    #[validate(length(min = 1))]
    #[serde(default = "default_monitored_models")]
    pub monitored_models: Vec<String>,
}

/// The three default peak windows: 10:00, 15:00, 21:00.
pub fn default_windows() -> Vec<TimeWindow> {
    vec![TimeWindow::new(600), TimeWindow::new(900), TimeWindow::new(1260)]
}

fn default_monitored_models() -> Vec<String> {
    DEFAULT_MODEL_CATALOG.iter().map(|s| (*s).to_string()).collect()
}

impl ScheduledWarmupConfig {
    /// Create default configuration (disabled, default windows and models).
    pub fn new() -> Self {
        Self {
            enabled: false,
            mode: WarmupMode::default(),
            windows: default_windows(),
            monitored_models: default_monitored_models(),
        }
    }
}

impl Default for ScheduledWarmupConfig {
    fn default() -> Self {
        Self::new()
    }
}
