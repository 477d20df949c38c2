//! Per-Metric Tables
//!
//! Conflict tolerances and expected sampling intervals for each metric type.
//! Values reflect what consumer wearables actually report, not lab-grade
//! instruments: two wrist devices routinely disagree on heart rate by a few
//! beats per minute without either being wrong.

use super::time::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::model::MetricType;

// ===== CONFLICT TOLERANCES =====

/// Heart rate tolerance (bpm).
///
/// Optical wrist sensors typically agree within ±3 bpm at rest and drift
/// further apart during intervals.
pub const HEART_RATE_TOLERANCE_BPM: f64 = 5.0;

/// Step count tolerance (steps).
pub const STEPS_TOLERANCE: f64 = 10.0;

/// Distance tolerance (km).
pub const DISTANCE_TOLERANCE_KM: f64 = 0.1;

/// Pace tolerance (seconds per km).
pub const PACE_TOLERANCE_S_PER_KM: f64 = 30.0;

/// Calories tolerance (kcal).
pub const CALORIES_TOLERANCE_KCAL: f64 = 5.0;

/// Sleep duration tolerance (minutes).
pub const SLEEP_TOLERANCE_MIN: f64 = 30.0;

/// GPS coordinate tolerance (degrees).
///
/// 0.001° is roughly 111 m of latitude.
pub const GPS_TOLERANCE_DEG: f64 = 0.001;

/// Tolerance for metrics without a dedicated entry.
pub const DEFAULT_CONFLICT_TOLERANCE: f64 = 1.0;

// ===== EXPECTED SAMPLING INTERVALS =====

/// Heart rate sampling interval (milliseconds). 1 Hz streams.
pub const HEART_RATE_INTERVAL_MS: i64 = MS_PER_SECOND;

/// Step count sampling interval (milliseconds). Per-minute buckets.
pub const STEPS_INTERVAL_MS: i64 = MS_PER_MINUTE;

/// Distance sampling interval (milliseconds).
pub const DISTANCE_INTERVAL_MS: i64 = 5 * MS_PER_SECOND;

/// Pace sampling interval (milliseconds).
pub const PACE_INTERVAL_MS: i64 = 5 * MS_PER_SECOND;

/// Calories sampling interval (milliseconds).
pub const CALORIES_INTERVAL_MS: i64 = MS_PER_MINUTE;

/// Sleep sampling interval (milliseconds). Hourly summaries.
pub const SLEEP_INTERVAL_MS: i64 = MS_PER_HOUR;

/// GPS sampling interval (milliseconds).
pub const GPS_INTERVAL_MS: i64 = MS_PER_SECOND;

/// Interval for metrics without a dedicated entry (milliseconds).
pub const DEFAULT_INTERVAL_MS: i64 = MS_PER_MINUTE;

/// Largest absolute difference two readings may have before they conflict
pub fn conflict_tolerance(metric: &MetricType) -> f64 {
    match metric {
        MetricType::HeartRate => HEART_RATE_TOLERANCE_BPM,
        MetricType::Steps => STEPS_TOLERANCE,
        MetricType::Distance => DISTANCE_TOLERANCE_KM,
        MetricType::Pace => PACE_TOLERANCE_S_PER_KM,
        MetricType::Calories => CALORIES_TOLERANCE_KCAL,
        MetricType::Sleep => SLEEP_TOLERANCE_MIN,
        MetricType::Gps => GPS_TOLERANCE_DEG,
        MetricType::Other(_) => DEFAULT_CONFLICT_TOLERANCE,
    }
}

/// Cadence at which a metric is expected to be reported
pub fn expected_interval_ms(metric: &MetricType) -> i64 {
    match metric {
        MetricType::HeartRate => HEART_RATE_INTERVAL_MS,
        MetricType::Steps => STEPS_INTERVAL_MS,
        MetricType::Distance => DISTANCE_INTERVAL_MS,
        MetricType::Pace => PACE_INTERVAL_MS,
        MetricType::Calories => CALORIES_INTERVAL_MS,
        MetricType::Sleep => SLEEP_INTERVAL_MS,
        MetricType::Gps => GPS_INTERVAL_MS,
        MetricType::Other(_) => DEFAULT_INTERVAL_MS,
    }
}
