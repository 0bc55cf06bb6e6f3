//! Background warmup scheduler.
//!
//! Drives the warmup schedule engine from a periodic tick: observe quotas
//! when the mode needs them, evaluate the trigger decision, and dispatch
//! warmups through the host-supplied launcher. The observation source and
//! the warmup dispatch are opaque remote operations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;

use quotapilot_types::models::{ModelQuota, WarmupMode};

use super::warmup::{WarmupScheduleEngine, WarmupTrigger};
use crate::error::AppResult;

/// Period of the scheduler check loop.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Source of per-model quota observations.
#[async_trait]
pub trait QuotaObserver: Send + Sync {
    /// Fetch the current quota observations for the known models.
    async fn observe(&self) -> AppResult<Vec<ModelQuota>>;
}

/// Executes a warmup for the given models.
#[async_trait]
pub trait WarmupLauncher: Send + Sync {
    /// Dispatch a priming request for each model.
    async fn fire_warmup(&self, models: &[String]) -> AppResult<()>;
}

/// Start the warmup scheduler as a background tokio task.
///
/// Each tick reads a consistent engine snapshot, evaluates the trigger
/// decision synchronously, and only then suspends to dispatch. A failed
/// observation or dispatch is logged and retried on a later tick.
pub fn start(
    engine: Arc<Mutex<WarmupScheduleEngine>>,
    observer: Arc<dyn QuotaObserver>,
    launcher: Arc<dyn WarmupLauncher>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("[Scheduler] Smart warmup scheduler started");
        let mut check_interval = interval(CHECK_INTERVAL);

        loop {
            check_interval.tick().await;

            let mode = {
                let engine = engine.lock().await;
                if !engine.config().enabled {
                    continue;
                }
                engine.config().mode
            };

            // Peak windows are purely time-based; only immediate mode needs
            // fresh quota observations
            let observations = if mode == WarmupMode::Immediate {
                match observer.observe().await {
                    Ok(obs) => obs,
                    Err(e) => {
                        tracing::warn!("[Scheduler] Quota observation failed: {}", e);
                        continue;
                    }
                }
            } else {
                Vec::new()
            };

            let (trigger, monitored) = {
                let mut engine = engine.lock().await;
                let trigger = engine.evaluate(Local::now(), &observations);
                (trigger, engine.config().monitored_models.clone())
            };

            let models = match trigger {
                Some(WarmupTrigger::QuotaRecovered { models }) => models,
                Some(WarmupTrigger::PeakWindow { index, peak_minutes }) => {
                    tracing::info!(
                        "[Scheduler] Peak window {} ({:02}:{:02}) due, warming monitored models",
                        index,
                        peak_minutes / 60,
                        peak_minutes % 60
                    );
                    monitored
                }
                None => continue,
            };

            match launcher.fire_warmup(&models).await {
                Ok(()) => {
                    tracing::info!("[Scheduler] Warm-up dispatched for {} model(s)", models.len());
                }
                Err(e) => {
                    tracing::warn!("[Scheduler] Warm-up failed: {}", e);
                }
            }
        }
    })
}
