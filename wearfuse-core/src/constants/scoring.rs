//! Confidence and Quality Scoring Parameters
//!
//! All scores live on a 0-100 scale. Confidence starts from the average
//! reported quality of the contributing samples, loses points for every
//! disagreement, and gains a little for corroboration by extra devices.

/// Lower bound of every score.
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score.
pub const SCORE_MAX: f64 = 100.0;

// ===== CONFIDENCE =====

/// Confidence points lost per detected conflict.
pub const CONFLICT_CONFIDENCE_PENALTY: f64 = 10.0;

/// Cap on the total conflict penalty (reached at three conflicts).
pub const MAX_CONFLICT_CONFIDENCE_PENALTY: f64 = 30.0;

/// Confidence points gained per additional contributing sample.
pub const AGREEMENT_CONFIDENCE_BONUS: f64 = 5.0;

/// Cap on the corroboration bonus.
pub const MAX_AGREEMENT_CONFIDENCE_BONUS: f64 = 20.0;

// ===== QUALITY =====

/// Quality points lost per detected conflict (uncapped).
pub const CONFLICT_QUALITY_PENALTY: f64 = 5.0;

// ===== INTERPOLATION =====

/// Scale applied to the weaker endpoint's scores for synthesized points.
///
/// An interpolated value is a guess between two real readings and must never
/// look as trustworthy as either of them.
pub const INTERPOLATION_CONFIDENCE_FACTOR: f64 = 0.8;
