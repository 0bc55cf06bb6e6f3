//! Warmup schedule engine.
//!
//! Answers, for a wall-clock instant and a set of per-model quota
//! observations, whether a warmup should fire and for which trigger. The
//! host drives it from its periodic tick and executes the actual warmup
//! dispatch; the engine only decides.

use chrono::{DateTime, Local, NaiveDate, Timelike};
use std::collections::HashSet;

use quotapilot_types::error::ScheduleError;
use quotapilot_types::models::{
    default_windows, ModelQuota, ScheduledWarmupConfig, TimeWindow, WarmupMode, MAX_WINDOWS,
    MINUTES_PER_DAY, MIN_WINDOW_SEPARATION_MINUTES,
};

use super::logger;
use super::schedule::{trigger_minutes, validate_window_time};

/// Trigger produced by an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarmupTrigger {
    /// An enabled peak window crossed its trigger instant today
    PeakWindow {
        /// Index of the window that fired
        index: usize,
        /// The window's peak time, minutes since midnight
        peak_minutes: u16,
    },
    /// Monitored models recovered to full quota (immediate mode)
    QuotaRecovered {
        /// Names of the models that just recovered
        models: Vec<String>,
    },
}

/// Daily phase of one configured window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    /// Trigger instant not yet reached today
    Idle,
    /// Trigger instant passed, warmup not yet fired today
    Armed,
    /// Fired today; resets at local midnight
    Fired,
}

#[derive(Debug, Clone, Copy, Default)]
struct WindowRuntime {
    fired_on: Option<NaiveDate>,
}

/// Owns the warmup configuration plus the per-window daily state machine
/// and the per-model observation memory for immediate mode.
///
/// Single-owner and synchronous: all suspension happens in the host loop.
pub struct WarmupScheduleEngine {
    config: ScheduledWarmupConfig,
    catalog: Vec<String>,
    runtime: Vec<WindowRuntime>,
    warmed_at_full: HashSet<String>,
}

impl WarmupScheduleEngine {
    /// Create an engine over a config snapshot and the known model catalog.
    pub fn new(mut config: ScheduledWarmupConfig, catalog: Vec<String>) -> Self {
        for window in &mut config.windows {
            window.minutes %= MINUTES_PER_DAY;
        }
        let runtime = vec![WindowRuntime::default(); config.windows.len()];
        Self { config, catalog, runtime, warmed_at_full: HashSet::new() }
    }

    /// Consistent snapshot of the current configuration, for persistence.
    pub fn config(&self) -> &ScheduledWarmupConfig {
        &self.config
    }

    /// Enable or disable scheduled warmup. Enabling with an empty model
    /// selection adopts the full catalog; enabling with no usable window
    /// adopts the three defaults. Idempotent.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            if self.config.monitored_models.is_empty() {
                self.config.monitored_models = self.catalog.clone();
                logger::log_info("[Scheduler] No models selected, monitoring full catalog");
            }
            if self.config.windows.is_empty() || self.config.windows.iter().all(|w| !w.enabled) {
                self.config.windows = default_windows();
                self.runtime = vec![WindowRuntime::default(); self.config.windows.len()];
                logger::log_info("[Scheduler] No usable windows, restoring defaults");
            }
        }
        self.config.enabled = enabled;
    }

    /// Switch the trigger policy. Pure switch: windows, models, and runtime
    /// state are left as they are.
    pub fn set_mode(&mut self, mode: WarmupMode) {
        self.config.mode = mode;
    }

    /// Move a window to a new time of day.
    ///
    /// Runs the separation check against all other enabled windows; on
    /// rejection nothing changes, including the fired-today flags. On
    /// success the window's fired flag is cleared so it can re-arm.
    pub fn update_window_time(&mut self, index: usize, minutes: u16) -> Result<(), ScheduleError> {
        if index >= self.config.windows.len() {
            return Err(ScheduleError::IndexOutOfRange { index });
        }
        let minutes = minutes % MINUTES_PER_DAY;
        validate_window_time(
            index,
            minutes,
            &self.config.windows,
            MIN_WINDOW_SEPARATION_MINUTES,
        )?;

        self.config.windows[index].minutes = minutes;
        self.runtime[index] = WindowRuntime::default();
        tracing::debug!(
            "[Scheduler] Window {} moved to {}",
            index,
            self.config.windows[index].label()
        );
        Ok(())
    }

    /// Enable or disable one window. Disabling needs no validation;
    /// re-enabling re-runs the separation check and clears the window's
    /// fired flag so it is eligible to re-arm.
    pub fn toggle_window_enabled(&mut self, index: usize, enabled: bool) -> Result<(), ScheduleError> {
        let Some(window) = self.config.windows.get(index).copied() else {
            return Err(ScheduleError::IndexOutOfRange { index });
        };
        if window.enabled == enabled {
            return Ok(());
        }
        if enabled {
            validate_window_time(
                index,
                window.minutes,
                &self.config.windows,
                MIN_WINDOW_SEPARATION_MINUTES,
            )?;
            self.runtime[index] = WindowRuntime::default();
        }
        self.config.windows[index].enabled = enabled;
        Ok(())
    }

    /// Append a window at the given time. At the capacity bound this is a
    /// no-op, not an error; a separation conflict is still a rejection.
    pub fn add_window(&mut self, minutes: u16) -> Result<(), ScheduleError> {
        if self.config.windows.len() >= MAX_WINDOWS {
            tracing::debug!("[Scheduler] Window capacity reached, add ignored");
            return Ok(());
        }
        let minutes = minutes % MINUTES_PER_DAY;
        validate_window_time(
            self.config.windows.len(),
            minutes,
            &self.config.windows,
            MIN_WINDOW_SEPARATION_MINUTES,
        )?;

        self.config.windows.push(TimeWindow::new(minutes));
        self.runtime.push(WindowRuntime::default());
        Ok(())
    }

    /// Remove a window. No-ops at the lower bound, on an out-of-range
    /// index, and when the target is the last enabled window.
    pub fn remove_window(&mut self, index: usize) {
        if self.config.windows.len() <= 1 || index >= self.config.windows.len() {
            return;
        }
        let target = self.config.windows[index];
        let other_enabled = self
            .config
            .windows
            .iter()
            .enumerate()
            .any(|(i, w)| i != index && w.enabled);
        if target.enabled && !other_enabled {
            logger::log_warn("[Scheduler] Refusing to remove the last enabled window");
            return;
        }
        self.config.windows.remove(index);
        self.runtime.remove(index);
    }

    /// Select or deselect a monitored model. Deselecting the last remaining
    /// model is rejected and leaves the selection unchanged.
    pub fn toggle_model(&mut self, name: &str, selected: bool) -> Result<(), ScheduleError> {
        if selected {
            if !self.config.monitored_models.iter().any(|m| m == name) {
                self.config.monitored_models.push(name.to_string());
            }
            return Ok(());
        }
        if self.config.monitored_models.len() == 1
            && self.config.monitored_models[0] == name
        {
            return Err(ScheduleError::EmptySelection { what: "monitored model".to_string() });
        }
        self.config.monitored_models.retain(|m| m != name);
        Ok(())
    }

    /// Daily phase of a window at the given instant.
    pub fn window_phase(&self, index: usize, now: DateTime<Local>) -> Option<WindowPhase> {
        let window = self.config.windows.get(index)?;
        let state = self.runtime.get(index)?;
        if state.fired_on == Some(now.date_naive()) {
            return Some(WindowPhase::Fired);
        }
        if minutes_of_day(now) >= trigger_minutes(window.minutes) {
            Some(WindowPhase::Armed)
        } else {
            Some(WindowPhase::Idle)
        }
    }

    /// One evaluation pass: should a warmup fire now?
    pub fn evaluate(
        &mut self,
        now: DateTime<Local>,
        observations: &[ModelQuota],
    ) -> Option<WarmupTrigger> {
        if !self.config.enabled {
            return None;
        }
        match self.config.mode {
            WarmupMode::PeakBased => self.evaluate_peak(now),
            WarmupMode::Immediate => self.evaluate_immediate(observations),
        }
    }

    /// Time-based trigger: the first enabled window whose trigger instant
    /// has passed today, and which has not fired today, fires regardless of
    /// current quota.
    fn evaluate_peak(&mut self, now: DateTime<Local>) -> Option<WarmupTrigger> {
        let today = now.date_naive();
        let now_minutes = minutes_of_day(now);

        for (index, window) in self.config.windows.iter().enumerate() {
            if !window.enabled {
                continue;
            }
            let state = &mut self.runtime[index];
            if state.fired_on == Some(today) {
                continue;
            }
            if now_minutes >= trigger_minutes(window.minutes) {
                state.fired_on = Some(today);
                logger::log_info(&format!(
                    "[Scheduler] Window {} fired warmup trigger for peak at {}",
                    index,
                    window.label()
                ));
                return Some(WarmupTrigger::PeakWindow { index, peak_minutes: window.minutes });
            }
        }
        None
    }

    /// Quota-based trigger with observation-level edge detection: a
    /// monitored model fires when observed at 100% with no warmup already
    /// pending for it; dropping below 100% clears the pending mark.
    fn evaluate_immediate(&mut self, observations: &[ModelQuota]) -> Option<WarmupTrigger> {
        let mut recovered: Vec<String> = Vec::new();

        for obs in observations {
            let monitored = self
                .config
                .monitored_models
                .iter()
                .any(|m| obs.name.to_lowercase().contains(&m.to_lowercase()));
            if !monitored {
                continue;
            }
            if obs.is_full() {
                if self.warmed_at_full.insert(obs.name.clone()) {
                    recovered.push(obs.name.clone());
                }
            } else {
                self.warmed_at_full.remove(&obs.name);
            }
        }

        if recovered.is_empty() {
            None
        } else {
            logger::log_info(&format!(
                "[Scheduler] Quota recovered for {} model(s): {}",
                recovered.len(),
                recovered.join(", ")
            ));
            Some(WarmupTrigger::QuotaRecovered { models: recovered })
        }
    }
}

fn minutes_of_day(now: DateTime<Local>) -> u16 {
    (now.hour() * 60 + now.minute()) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(day: u32, hour: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
    }

    fn build_engine(config: ScheduledWarmupConfig) -> WarmupScheduleEngine {
        let catalog = vec!["gemini-3-flash".to_string(), "claude-sonnet-4-5".to_string()];
        WarmupScheduleEngine::new(config, catalog)
    }

    fn enabled_peak_config(minutes: &[u16]) -> ScheduledWarmupConfig {
        let mut config = ScheduledWarmupConfig::new();
        config.enabled = true;
        config.mode = WarmupMode::PeakBased;
        config.windows = minutes.iter().map(|&m| TimeWindow::new(m)).collect();
        config
    }

    #[test]
    fn test_enable_populates_empty_selection() {
        let mut config = ScheduledWarmupConfig::new();
        config.monitored_models.clear();
        config.windows.clear();

        let mut engine = build_engine(config);
        engine.set_enabled(true);

        assert_eq!(engine.config().monitored_models.len(), 2);
        assert_eq!(
            engine.config().windows.iter().map(TimeWindow::label).collect::<Vec<_>>(),
            vec!["10:00", "15:00", "21:00"]
        );

        // Idempotent: enabling again changes nothing
        let before = engine.config().clone();
        engine.set_enabled(true);
        assert_eq!(engine.config(), &before);
    }

    #[test]
    fn test_enable_restores_windows_when_all_disabled() {
        let mut config = enabled_peak_config(&[600]);
        config.enabled = false;
        config.windows[0].enabled = false;

        let mut engine = build_engine(config);
        engine.set_enabled(true);
        assert_eq!(engine.config().windows.len(), 3);
        assert!(engine.config().windows.iter().all(|w| w.enabled));
    }

    #[test]
    fn test_peak_window_fires_once_per_day() {
        let mut engine = build_engine(enabled_peak_config(&[600]));

        // Trigger for 10:00 is 05:00
        assert_eq!(engine.evaluate(local(5, 4, 59), &[]), None);
        assert_eq!(engine.window_phase(0, local(5, 4, 59)), Some(WindowPhase::Idle));

        assert_eq!(
            engine.evaluate(local(5, 5, 0), &[]),
            Some(WarmupTrigger::PeakWindow { index: 0, peak_minutes: 600 })
        );
        assert_eq!(engine.window_phase(0, local(5, 5, 0)), Some(WindowPhase::Fired));

        // Same day: no re-fire, even hours later
        assert_eq!(engine.evaluate(local(5, 5, 1), &[]), None);
        assert_eq!(engine.evaluate(local(5, 12, 0), &[]), None);

        // Midnight rollover re-arms it
        assert_eq!(engine.window_phase(0, local(6, 4, 0)), Some(WindowPhase::Idle));
        assert_eq!(
            engine.evaluate(local(6, 5, 0), &[]),
            Some(WarmupTrigger::PeakWindow { index: 0, peak_minutes: 600 })
        );
    }

    #[test]
    fn test_peak_trigger_wraps_into_previous_day() {
        // Peak 02:00 triggers at 21:00 the day before
        let mut engine = build_engine(enabled_peak_config(&[120]));

        assert_eq!(engine.evaluate(local(5, 20, 59), &[]), None);
        assert_eq!(
            engine.evaluate(local(5, 21, 0), &[]),
            Some(WarmupTrigger::PeakWindow { index: 0, peak_minutes: 120 })
        );
    }

    #[test]
    fn test_disabled_window_never_fires() {
        let mut config = enabled_peak_config(&[600]);
        config.windows[0].enabled = false;
        let mut engine = build_engine(config);
        assert_eq!(engine.evaluate(local(5, 12, 0), &[]), None);
    }

    #[test]
    fn test_disabled_engine_never_fires() {
        let mut config = enabled_peak_config(&[600]);
        config.enabled = false;
        let mut engine = build_engine(config);
        assert_eq!(engine.evaluate(local(5, 12, 0), &[]), None);
    }

    #[test]
    fn test_rejected_update_leaves_state_untouched() {
        let mut engine = build_engine(enabled_peak_config(&[600, 900]));

        // Fire window 0 so there is runtime state to preserve
        assert!(engine.evaluate(local(5, 5, 0), &[]).is_some());
        let before = engine.config().clone();

        // 11:40 is 100min from 10:00: rejected
        let err = engine.update_window_time(1, 700).unwrap_err();
        assert!(matches!(err, ScheduleError::WindowConflict { .. }));
        assert_eq!(engine.config(), &before);
        assert_eq!(engine.window_phase(0, local(5, 6, 0)), Some(WindowPhase::Fired));
    }

    #[test]
    fn test_accepted_update_clears_fired_flag() {
        let mut engine = build_engine(enabled_peak_config(&[600]));

        assert!(engine.evaluate(local(5, 5, 0), &[]).is_some());
        assert_eq!(engine.window_phase(0, local(5, 6, 0)), Some(WindowPhase::Fired));

        // Move to 13:00; the retimed window is eligible to re-arm today
        engine.update_window_time(0, 780).unwrap();
        assert_ne!(engine.window_phase(0, local(5, 6, 0)), Some(WindowPhase::Fired));
        assert_eq!(
            engine.evaluate(local(5, 8, 0), &[]),
            Some(WarmupTrigger::PeakWindow { index: 0, peak_minutes: 780 })
        );
    }

    #[test]
    fn test_toggle_enable_revalidates() {
        let mut config = enabled_peak_config(&[600, 700]);
        config.windows[1].enabled = false;
        let mut engine = build_engine(config);

        // Disabling imposed no constraint, but re-enabling at 100min away does
        let err = engine.toggle_window_enabled(1, true).unwrap_err();
        assert!(matches!(err, ScheduleError::WindowConflict { .. }));
        assert!(!engine.config().windows[1].enabled);

        // Disabling is always allowed, even for the last enabled window
        engine.toggle_window_enabled(0, false).unwrap();
        assert!(!engine.config().windows[0].enabled);
    }

    #[test]
    fn test_add_window_bounds_and_validation() {
        let mut engine = build_engine(enabled_peak_config(&[600]));

        // Conflict with the existing 10:00 window
        assert!(engine.add_window(650).is_err());
        assert_eq!(engine.config().windows.len(), 1);

        engine.add_window(1260).unwrap();
        assert_eq!(engine.config().windows.len(), 2);

        // At capacity adds become no-ops (disabled slots count toward the bound)
        let mut config = enabled_peak_config(&[600]);
        config
            .windows
            .extend([100, 200, 300, 400, 500].map(|m| TimeWindow { minutes: m, enabled: false }));
        let mut engine = build_engine(config);
        engine.add_window(1260).unwrap();
        assert_eq!(engine.config().windows.len(), 6);
    }

    #[test]
    fn test_remove_window_no_ops() {
        let mut engine = build_engine(enabled_peak_config(&[600]));

        // Lower bound: the only window stays
        engine.remove_window(0);
        assert_eq!(engine.config().windows.len(), 1);

        // Last enabled window stays even with disabled siblings present
        let mut config = enabled_peak_config(&[600, 1260]);
        config.windows[1].enabled = false;
        let mut engine = build_engine(config);
        engine.remove_window(0);
        assert_eq!(engine.config().windows.len(), 2);

        // A disabled sibling can go
        engine.remove_window(1);
        assert_eq!(engine.config().windows.len(), 1);

        // Out of range: no-op
        engine.remove_window(9);
        assert_eq!(engine.config().windows.len(), 1);
    }

    #[test]
    fn test_deselecting_last_model_rejected() {
        let mut config = ScheduledWarmupConfig::new();
        config.enabled = true;
        config.monitored_models = vec!["gemini-3-flash".to_string()];
        let mut engine = build_engine(config);

        let err = engine.toggle_model("gemini-3-flash", false).unwrap_err();
        assert!(matches!(err, ScheduleError::EmptySelection { .. }));
        assert_eq!(engine.config().monitored_models, vec!["gemini-3-flash".to_string()]);

        engine.toggle_model("claude-sonnet-4-5", true).unwrap();
        engine.toggle_model("gemini-3-flash", false).unwrap();
        assert_eq!(engine.config().monitored_models, vec!["claude-sonnet-4-5".to_string()]);
    }

    #[test]
    fn test_immediate_mode_edge_detection() {
        let mut config = ScheduledWarmupConfig::new();
        config.enabled = true;
        config.mode = WarmupMode::Immediate;
        config.monitored_models = vec!["gemini-3-flash".to_string()];
        let mut engine = build_engine(config);
        let now = local(5, 12, 0);

        // First observation at 100% fires
        let obs = vec![ModelQuota::new("gemini-3-flash", 100)];
        assert_eq!(
            engine.evaluate(now, &obs),
            Some(WarmupTrigger::QuotaRecovered { models: vec!["gemini-3-flash".to_string()] })
        );

        // Staying at 100% does not re-fire every tick
        assert_eq!(engine.evaluate(now, &obs), None);

        // Dropping below 100% clears the mark; recovery fires again
        assert_eq!(engine.evaluate(now, &[ModelQuota::new("gemini-3-flash", 40)]), None);
        assert_eq!(
            engine.evaluate(now, &obs),
            Some(WarmupTrigger::QuotaRecovered { models: vec!["gemini-3-flash".to_string()] })
        );
    }

    #[test]
    fn test_immediate_mode_ignores_unmonitored_models() {
        let mut config = ScheduledWarmupConfig::new();
        config.enabled = true;
        config.mode = WarmupMode::Immediate;
        config.monitored_models = vec!["claude-sonnet-4-5".to_string()];
        let mut engine = build_engine(config);

        let obs = vec![ModelQuota::new("gemini-3-flash", 100)];
        assert_eq!(engine.evaluate(local(5, 12, 0), &obs), None);
    }

    #[test]
    fn test_set_mode_is_pure_switch() {
        let mut engine = build_engine(enabled_peak_config(&[600, 1260]));
        let windows = engine.config().windows.clone();
        let models = engine.config().monitored_models.clone();

        engine.set_mode(WarmupMode::Immediate);
        assert_eq!(engine.config().mode, WarmupMode::Immediate);
        assert_eq!(engine.config().windows, windows);
        assert_eq!(engine.config().monitored_models, models);
    }
}
