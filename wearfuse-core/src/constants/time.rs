//! Time-Related Constants
//!
//! Conversion factors and windows used for grouping and gap detection.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: i64 = 1_000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;

/// Milliseconds per hour.
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

// ===== GROUPING =====

/// Window for tolerance grouping (milliseconds).
///
/// Samples within 30 s of a group's anchor are treated as the same instant
/// by the legacy tolerance grouper.
pub const GROUPING_TOLERANCE_MS: i64 = 30 * MS_PER_SECOND;

// ===== GAP DETECTION =====

/// A gap exists once consecutive points are more than this many expected
/// intervals apart.
pub const GAP_THRESHOLD_MULTIPLIER: i64 = 2;

/// Default cap on synthesized points for a single gap.
///
/// A week-long heart-rate gap at 1 Hz would otherwise synthesize 600k points.
pub const DEFAULT_MAX_POINTS_PER_GAP: usize = 10_000;
