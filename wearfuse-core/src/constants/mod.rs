//! Constants for WearFuse Core
//!
//! This module provides the fixed tables the fusion engine runs on. All
//! numeric values are defined here with their units, so the algorithms never
//! carry magic numbers.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Metrics**: Per-metric conflict tolerances and expected sampling intervals
//! - **Scoring**: Confidence and quality penalties, bonuses and scaling
//! - **Time**: Unit conversions and the grouping window
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Tables are deployment-wide constants, not per-user configuration
//! 3. Use descriptive names that include units

/// Per-metric tolerance and sampling interval tables.
pub mod metrics;

/// Confidence and quality scoring parameters.
pub mod scoring;

/// Time unit conversions and grouping windows.
pub mod time;

pub use metrics::{conflict_tolerance, expected_interval_ms, DEFAULT_CONFLICT_TOLERANCE, DEFAULT_INTERVAL_MS};

pub use scoring::{
    CONFLICT_CONFIDENCE_PENALTY, MAX_CONFLICT_CONFIDENCE_PENALTY,
    AGREEMENT_CONFIDENCE_BONUS, MAX_AGREEMENT_CONFIDENCE_BONUS,
    CONFLICT_QUALITY_PENALTY, INTERPOLATION_CONFIDENCE_FACTOR,
    SCORE_MIN, SCORE_MAX,
};

pub use time::{MS_PER_SECOND, MS_PER_MINUTE, MS_PER_HOUR, GROUPING_TOLERANCE_MS, GAP_THRESHOLD_MULTIPLIER, DEFAULT_MAX_POINTS_PER_GAP};
