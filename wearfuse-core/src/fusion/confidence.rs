//! Confidence and Quality Scoring for Fused Points
//!
//! ## Overview
//!
//! Every fused point carries two trust scores on a 0-100 scale:
//!
//! - **Confidence**: how much the fused *value* can be trusted. Starts from the
//!   average reported quality of the contributing samples, loses points for
//!   each disagreement and gains a little when extra devices corroborate.
//! - **Quality score**: how clean the underlying *signal* was. Same starting
//!   point, only penalized by disagreements.
//!
//! ## Formulas
//!
//! ```text
//! avgQ        = Σ quality / n
//! penalty     = min(10 × conflicts, 30)
//! bonus       = n > 1 ? min(5 × (n - 1), 20) : 0
//! confidence  = clamp(avgQ - penalty + bonus, 0, 100)
//! quality     = clamp(avgQ - 5 × conflicts, 0, 100)
//! ```
//!
//! Confidence of a multi-sample group is rounded to the nearest whole point,
//! half away from zero, so two devices reporting 85 and 80 with one conflict
//! give 77.5 → 78. Quality scores are kept unrounded.
//!
//! A single-sample group has nothing to penalize or corroborate: both scores
//! are the sample's reported quality, exactly.
//!
//! ## Interpolated Points
//!
//! A synthesized point is never more trustworthy than the weaker of the two
//! real points around it:
//!
//! ```text
//! confidence = min(A.confidence, B.confidence) × 0.8
//! ```
//!
//! These scores are kept unrounded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    AGREEMENT_CONFIDENCE_BONUS, CONFLICT_CONFIDENCE_PENALTY, CONFLICT_QUALITY_PENALTY,
    MAX_AGREEMENT_CONFIDENCE_BONUS, MAX_CONFLICT_CONFIDENCE_PENALTY, SCORE_MAX, SCORE_MIN,
};
use crate::model::RawSample;

/// Trust score in range [0, 100]
///
/// Construction always clamps, so a `Score` can never leave its range.
/// NaN collapses to zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    /// No trust
    pub const ZERO: Self = Self(SCORE_MIN);

    /// Full trust
    pub const MAX: Self = Self(SCORE_MAX);

    /// Create from any value, clamping into [0, 100]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(SCORE_MIN, SCORE_MAX))
    }

    /// Create from a raw value rounded to the nearest whole point
    pub fn rounded(value: f64) -> Self {
        Self::new(value.round())
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Scale by a factor, staying within range
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.0 * factor)
    }

    /// The weaker of two scores
    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Confidence and quality for one fused group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupScores {
    pub confidence: Score,
    pub quality: Score,
}

/// Score a ranked group given how many conflicts it contained
///
/// An empty group scores zero on both axes.
pub fn score_group(samples: &[RawSample], conflicts: usize) -> GroupScores {
    match samples {
        [] => {
            return GroupScores {
                confidence: Score::ZERO,
                quality: Score::ZERO,
            }
        }
        [only] if conflicts == 0 => {
            return GroupScores {
                confidence: Score::new(only.quality),
                quality: Score::new(only.quality),
            }
        }
        _ => {}
    }

    let n = samples.len();
    let avg_quality = samples.iter().map(|s| s.quality).sum::<f64>() / n as f64;
    let conflicts = conflicts as f64;

    let penalty = (CONFLICT_CONFIDENCE_PENALTY * conflicts).min(MAX_CONFLICT_CONFIDENCE_PENALTY);
    let bonus = if n > 1 {
        (AGREEMENT_CONFIDENCE_BONUS * (n - 1) as f64).min(MAX_AGREEMENT_CONFIDENCE_BONUS)
    } else {
        0.0
    };

    GroupScores {
        confidence: Score::rounded(avg_quality - penalty + bonus),
        quality: Score::new(avg_quality - CONFLICT_QUALITY_PENALTY * conflicts),
    }
}

/// Scores for a point synthesized between two real points
pub fn interpolated_scores(
    start: GroupScores,
    end: GroupScores,
    factor: f64,
) -> GroupScores {
    GroupScores {
        confidence: start.confidence.min(end.confidence).scaled(factor),
        quality: start.quality.min(end.quality).scaled(factor),
    }
}
