//! Gap Filling
//!
//! ## Overview
//!
//! Devices drop out: a watch comes off for a shower, a phone dies. When two
//! consecutive fused points are further apart than twice the metric's
//! expected interval, points are synthesized at the expected cadence between
//! them:
//!
//! ```text
//! interval = 60 s (steps)
//!
//! A ●─────────────────────────────────────● B      gap = 600 s > 120 s
//!   A   +60  +120  +180  ...  +480  +540   B      9 synthesized points
//! ```
//!
//! The endpoints are the real points and are never regenerated. A synthesized
//! point lies at `A.t + k × interval` for every k ≥ 1 that stays strictly
//! before `B.t`.
//!
//! ## Curves
//!
//! With `p = elapsed / gap` in (0, 1):
//!
//! ```text
//! linear:   A + (B - A) × p
//! cubic:    A + (B - A) × (3p² - 2p³)      smoothstep, flat at both ends
//! nearest:  p < 0.5 ? A : B
//! ```
//!
//! Linear and cubic values never leave [min(A, B), max(A, B)].
//!
//! ## Trust
//!
//! Synthesized points take `min(A, B) × 0.8` for both confidence and quality,
//! inherit `A`'s primary source and contribute the union of both endpoints'
//! sources. They carry no conflicts.

use chrono::Duration;
use log::warn;

use crate::constants::{
    expected_interval_ms, DEFAULT_MAX_POINTS_PER_GAP, GAP_THRESHOLD_MULTIPLIER,
    INTERPOLATION_CONFIDENCE_FACTOR,
};
use crate::fusion::confidence::{interpolated_scores, GroupScores};
use crate::model::{new_id, FusedPoint, FusionMethod, InterpolationMethod, MetricType};
use crate::time::{delta_ms, Timestamp};

/// Value at fraction `p` of the way from `a` to `b`
pub fn interpolate_value(method: InterpolationMethod, a: f64, b: f64, p: f64) -> f64 {
    match method {
        InterpolationMethod::Linear => a + (b - a) * p,
        InterpolationMethod::Cubic => a + (b - a) * (3.0 * p * p - 2.0 * p * p * p),
        InterpolationMethod::Nearest => {
            if p < 0.5 {
                a
            } else {
                b
            }
        }
    }
}

/// Series after gap filling
#[derive(Debug, Clone, Default)]
pub struct GapFill {
    /// Real and synthesized points, sorted by timestamp
    pub points: Vec<FusedPoint>,
    /// Number of synthesized points
    pub interpolated: usize,
    /// Gaps that hit the per-gap cap
    pub capped_gaps: usize,
}

/// Synthesizes points across gaps in one metric's series
#[derive(Debug, Clone)]
pub struct GapFiller {
    method: InterpolationMethod,
    interval_ms: i64,
    max_points_per_gap: usize,
    confidence_factor: f64,
}

impl GapFiller {
    /// Filler using the metric's expected interval and default limits
    pub fn for_metric(metric: &MetricType, method: InterpolationMethod) -> Self {
        Self {
            method,
            interval_ms: expected_interval_ms(metric),
            max_points_per_gap: DEFAULT_MAX_POINTS_PER_GAP,
            confidence_factor: INTERPOLATION_CONFIDENCE_FACTOR,
        }
    }

    pub fn with_max_points_per_gap(mut self, max: usize) -> Self {
        self.max_points_per_gap = max;
        self
    }

    pub fn with_confidence_factor(mut self, factor: f64) -> Self {
        self.confidence_factor = factor;
        self
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    /// Fill every gap in `series`, stamping synthesized points with `now`
    pub fn fill(&self, mut series: Vec<FusedPoint>, now: Timestamp) -> GapFill {
        series.sort_by_key(|p| p.timestamp);

        if self.interval_ms <= 0 || series.len() < 2 {
            return GapFill {
                points: series,
                ..GapFill::default()
            };
        }

        let threshold = self.interval_ms.saturating_mul(GAP_THRESHOLD_MULTIPLIER);
        let mut out = Vec::with_capacity(series.len());
        let mut interpolated = 0;
        let mut capped_gaps = 0;

        let mut iter = series.into_iter().peekable();
        while let Some(start) = iter.next() {
            let synthesized = match iter.peek() {
                Some(end) if delta_ms(start.timestamp, end.timestamp) > threshold => {
                    let (points, capped) = self.bridge(&start, end, now);
                    if capped {
                        capped_gaps += 1;
                    }
                    points
                }
                _ => Vec::new(),
            };
            interpolated += synthesized.len();
            out.push(start);
            out.extend(synthesized);
        }

        GapFill {
            points: out,
            interpolated,
            capped_gaps,
        }
    }

    /// Points strictly between `start` and `end`, and whether the cap was hit
    fn bridge(&self, start: &FusedPoint, end: &FusedPoint, now: Timestamp) -> (Vec<FusedPoint>, bool) {
        let gap_ms = delta_ms(start.timestamp, end.timestamp);
        let scores = interpolated_scores(
            GroupScores { confidence: start.confidence, quality: start.quality_score },
            GroupScores { confidence: end.confidence, quality: end.quality_score },
            self.confidence_factor,
        );

        let mut sources = start.contributing_sources.clone();
        for source in &end.contributing_sources {
            if !sources.contains(source) {
                sources.push(source.clone());
            }
        }

        let mut points = Vec::new();
        let mut elapsed = self.interval_ms;
        while elapsed < gap_ms {
            if points.len() == self.max_points_per_gap {
                warn!(
                    "Gap of {} ms in {} for user {} capped at {} synthesized points",
                    gap_ms, start.metric, start.user_id, self.max_points_per_gap
                );
                return (points, true);
            }

            let p = elapsed as f64 / gap_ms as f64;
            points.push(FusedPoint {
                id: new_id(),
                user_id: start.user_id.clone(),
                metric: start.metric.clone(),
                value: interpolate_value(self.method, start.value, end.value, p),
                timestamp: start.timestamp + Duration::milliseconds(elapsed),
                primary_source: start.primary_source.clone(),
                contributing_sources: sources.clone(),
                confidence: scores.confidence,
                quality_score: scores.quality,
                fusion_method: FusionMethod::Interpolated,
                conflicts: Vec::new(),
                created_at: now,
            });
            elapsed += self.interval_ms;
        }

        (points, false)
    }
}
