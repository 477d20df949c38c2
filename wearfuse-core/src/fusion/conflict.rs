//! Pairwise Conflict Detection
//!
//! ## Overview
//!
//! Two devices conflict when their simultaneous readings differ by more than
//! the metric's tolerance. Every unordered pair of a ranked group is compared:
//!
//! ```text
//! ranked:  [x=120, y=140, z=122]      tolerance (heart rate) = 5
//!
//! (x, y) |20| > 5  → conflict
//! (x, z) | 2| ≤ 5  → agree
//! (y, z) |18| > 5  → conflict
//! ```
//!
//! A group of n samples produces at most n(n-1)/2 candidates.
//!
//! Pairs are reported in ranked order: `source_a` is always the higher-ranked
//! sample of the pair.

use serde::{Deserialize, Serialize};

use crate::constants::conflict_tolerance;
use crate::model::{MetricType, RawSample};

/// One disagreement between two samples of the same group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub source_a: String,
    pub source_b: String,
    pub value_a: f64,
    pub value_b: f64,
    /// Absolute difference between the two values
    pub difference: f64,
}

/// Compare every pair of a ranked group against a tolerance
///
/// Differences equal to the tolerance are agreements.
pub fn detect_conflicts(ranked: &[RawSample], tolerance: f64) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, a) in ranked.iter().enumerate() {
        for b in &ranked[i + 1..] {
            let difference = (a.value - b.value).abs();
            if difference > tolerance {
                conflicts.push(Conflict {
                    source_a: a.source_id.clone(),
                    source_b: b.source_id.clone(),
                    value_a: a.value,
                    value_b: b.value,
                    difference,
                });
            }
        }
    }

    conflicts
}

/// Detect conflicts using the metric's tolerance table
pub fn detect_for_metric(ranked: &[RawSample], metric: &MetricType) -> Vec<Conflict> {
    detect_conflicts(ranked, conflict_tolerance(metric))
}
