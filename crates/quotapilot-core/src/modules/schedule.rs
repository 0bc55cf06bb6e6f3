//! Peak-window schedule validation and trigger arithmetic.
//!
//! Times-of-day live on a 1440-minute ring; distances are circular. The
//! 5-hour warmup lead is computed in exactly one place here.

use quotapilot_types::error::ScheduleError;
use quotapilot_types::models::{TimeWindow, MINUTES_PER_DAY, WARMUP_LEAD_MINUTES};

/// Minimum of the forward and backward distance between two times-of-day.
pub fn circular_distance(a: u16, b: u16) -> u16 {
    let d = a.abs_diff(b) % MINUTES_PER_DAY;
    d.min(MINUTES_PER_DAY - d)
}

/// Instant at which a warmup for the given peak time should fire.
/// Peaks earlier than the lead wrap into the previous day.
pub fn trigger_minutes(peak_minutes: u16) -> u16 {
    (i32::from(peak_minutes % MINUTES_PER_DAY) - i32::from(WARMUP_LEAD_MINUTES))
        .rem_euclid(i32::from(MINUTES_PER_DAY)) as u16
}

/// Check a candidate time against every *other enabled* window.
///
/// Disabled windows impose no constraint; the candidate's own slot is
/// excluded. Rejection is advisory and leaves the caller's state untouched.
pub fn validate_window_time(
    candidate_index: usize,
    candidate_minutes: u16,
    windows: &[TimeWindow],
    min_separation: u16,
) -> Result<(), ScheduleError> {
    for (other_index, other) in windows.iter().enumerate() {
        if other_index == candidate_index || !other.enabled {
            continue;
        }
        let distance = circular_distance(candidate_minutes, other.minutes);
        if distance < min_separation {
            return Err(ScheduleError::WindowConflict {
                index: candidate_index,
                other_index,
                distance_minutes: distance,
                min_separation,
            });
        }
    }
    Ok(())
}
