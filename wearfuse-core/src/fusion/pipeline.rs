//! Per-Metric Fusion Pipeline
//!
//! ## Overview
//!
//! Runs every pure stage for one (user, metric) batch:
//!
//! ```text
//! samples ─→ validate ─→ filter ─→ group ─→ ┌ rank ─→ detect ─→ resolve ─→ score ┐ ─→ gap fill ─→ series
//!              │           │                └──────────── per instant ─────────┘
//!           invalid     filtered
//! ```
//!
//! Filtering drops samples that belong to another metric, fall outside the
//! requested time window, come from a source that is not allowed, or report
//! quality strictly below the effective threshold. Nothing is dropped
//! silently: every sample is accounted for in [`FusionCounts`].
//!
//! The pipeline does no I/O and holds no state between runs. Identical inputs
//! produce identical values and scores; only ids and creation stamps differ.
//!
//! ## Usage Example
//!
//! ```rust
//! use wearfuse_core::config::EngineConfig;
//! use wearfuse_core::fusion::MetricFusion;
//! use wearfuse_core::model::{FusionPreferences, FusionRule, MetricType, RawSample, ResolutionStrategy};
//! use wearfuse_core::time::from_millis;
//!
//! let rule = FusionRule::new("u1", MetricType::HeartRate, "strap", ResolutionStrategy::PreferPrimary);
//! let config = EngineConfig::default();
//! let prefs = FusionPreferences::default();
//!
//! let output = MetricFusion::new(&config, &rule, &prefs).run(
//!     vec![
//!         RawSample::new("watch", MetricType::HeartRate, 131.0, from_millis(0)),
//!         RawSample::new("strap", MetricType::HeartRate, 142.0, from_millis(300)),
//!     ],
//!     from_millis(5_000),
//! );
//!
//! assert_eq!(output.points.len(), 1);
//! assert_eq!(output.points[0].value, 142.0);
//! assert_eq!(output.conflicts.len(), 1);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::fusion::confidence::score_group;
use crate::fusion::conflict::detect_for_metric;
use crate::fusion::grouping::group_samples;
use crate::fusion::interpolate::GapFiller;
use crate::fusion::ranking::ranked;
use crate::fusion::resolve::resolve;
use crate::model::{new_id, ConflictRecord, FusedPoint, FusionPreferences, FusionRule, RawSample};
use crate::time::Timestamp;
use crate::validators::partition_valid;

/// Where every input sample and output point went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionCounts {
    /// Samples handed to the run
    pub input: usize,
    /// Samples that failed validation
    pub invalid: usize,
    /// Valid samples excluded by metric, window, source or quality threshold
    pub filtered: usize,
    /// Same-instant groups formed
    pub groups: usize,
    /// Fused points produced from real samples
    pub fused: usize,
    /// Points synthesized by gap filling
    pub interpolated: usize,
    /// Conflict records produced
    pub conflicts: usize,
    /// Gaps that hit the synthesized-point cap
    pub capped_gaps: usize,
    /// Groups with no sample from the rule's primary or fallback sources
    pub groups_without_preferred_source: usize,
}

/// Fused series and conflict log for one metric
#[derive(Debug, Clone, Default)]
pub struct MetricOutput {
    /// Sorted by timestamp
    pub points: Vec<FusedPoint>,
    pub conflicts: Vec<ConflictRecord>,
    pub counts: FusionCounts,
}

/// One (user, metric) fusion run
#[derive(Debug, Clone)]
pub struct MetricFusion<'a> {
    config: &'a EngineConfig,
    rule: &'a FusionRule,
    preferences: &'a FusionPreferences,
    allowed_sources: Option<&'a HashSet<String>>,
    window: Option<(Timestamp, Timestamp)>,
}

impl<'a> MetricFusion<'a> {
    pub fn new(
        config: &'a EngineConfig,
        rule: &'a FusionRule,
        preferences: &'a FusionPreferences,
    ) -> Self {
        Self {
            config,
            rule,
            preferences,
            allowed_sources: None,
            window: None,
        }
    }

    /// Only accept samples from these source ids
    pub fn with_allowed_sources(mut self, sources: &'a HashSet<String>) -> Self {
        self.allowed_sources = Some(sources);
        self
    }

    /// Only accept samples with `start <= timestamp < end`
    pub fn with_window(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.window = Some((start, end));
        self
    }

    /// Fuse a batch, stamping emitted records with `now`
    pub fn run(&self, samples: Vec<RawSample>, now: Timestamp) -> MetricOutput {
        let mut counts = FusionCounts {
            input: samples.len(),
            ..FusionCounts::default()
        };

        let (valid, invalid) = partition_valid(samples);
        counts.invalid = invalid;

        let accepted: Vec<RawSample> = valid.into_iter().filter(|s| self.accepts(s)).collect();
        counts.filtered = counts.input - counts.invalid - accepted.len();

        let groups = group_samples(accepted, self.config.grouping, self.config.tolerance_window_ms);
        counts.groups = groups.len();

        let strategy = self.preferences.strategy_for(self.rule);
        let preferred: HashSet<&str> = self.rule.source_precedence().collect();

        let mut points = Vec::with_capacity(groups.len());
        let mut conflict_log = Vec::new();

        for (instant, members) in groups {
            let group = ranked(members, &self.rule.primary_source);
            let conflicts = detect_for_metric(&group, &self.rule.metric);
            let Some(resolution) = resolve(&group, &conflicts, strategy, self.config.method_labels)
            else {
                continue;
            };
            let scores = score_group(&group, conflicts.len());

            let mut contributing: Vec<String> = Vec::with_capacity(group.len());
            for sample in &group {
                if !contributing.contains(&sample.source_id) {
                    contributing.push(sample.source_id.clone());
                }
            }

            if !contributing.iter().any(|s| preferred.contains(s.as_str())) {
                counts.groups_without_preferred_source += 1;
                debug!(
                    "No preferred source for {} at {} (user {}), contributors {:?}",
                    self.rule.metric, instant, self.rule.user_id, contributing
                );
            }

            let point = FusedPoint {
                id: new_id(),
                user_id: self.rule.user_id.clone(),
                metric: self.rule.metric.clone(),
                value: resolution.value,
                timestamp: instant,
                primary_source: group[0].source_id.clone(),
                contributing_sources: contributing,
                confidence: scores.confidence,
                quality_score: scores.quality,
                fusion_method: resolution.method,
                conflicts,
                created_at: now,
            };

            conflict_log.extend(
                point
                    .conflicts
                    .iter()
                    .map(|c| ConflictRecord::from_conflict(c, &point, strategy)),
            );
            points.push(point);
        }

        counts.fused = points.len();
        counts.conflicts = conflict_log.len();

        if self.preferences.gap_filling_for(self.rule) {
            let filled = GapFiller::for_metric(&self.rule.metric, self.preferences.interpolation_method)
                .with_max_points_per_gap(self.config.max_points_per_gap)
                .with_confidence_factor(self.config.interpolation_confidence_factor)
                .fill(points, now);
            counts.interpolated = filled.interpolated;
            counts.capped_gaps = filled.capped_gaps;
            points = filled.points;
        }

        debug!(
            "Fused {} for user {}: {} groups, {} conflicts, {} interpolated",
            self.rule.metric, self.rule.user_id, counts.groups, counts.conflicts, counts.interpolated
        );

        MetricOutput {
            points,
            conflicts: conflict_log,
            counts,
        }
    }

    fn accepts(&self, sample: &RawSample) -> bool {
        if sample.metric != self.rule.metric {
            debug!("Sample {} is {}, expected {}", sample.id, sample.metric, self.rule.metric);
            return false;
        }

        if let Some((start, end)) = self.window {
            if sample.timestamp < start || sample.timestamp >= end {
                return false;
            }
        }

        if let Some(allowed) = self.allowed_sources {
            if !allowed.contains(&sample.source_id) {
                debug!("Sample {} from unregistered source {}", sample.id, sample.source_id);
                return false;
            }
        }

        let threshold = self.preferences.quality_threshold_for(self.rule);
        if sample.quality < threshold {
            debug!(
                "Sample {} quality {} below threshold {}",
                sample.id, sample.quality, threshold
            );
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FusionMethod, MetricType, ResolutionStrategy};
    use crate::time::from_millis;

    fn hr(source: &str, value: f64, ms: i64, quality: f64) -> RawSample {
        RawSample::new(source, MetricType::HeartRate, value, from_millis(ms)).with_quality(quality)
    }

    fn rule() -> FusionRule {
        FusionRule::new("u1", MetricType::HeartRate, "strap", ResolutionStrategy::PreferPrimary)
            .with_fallbacks(["watch"])
    }

    #[test]
    fn every_sample_is_counted() {
        let config = EngineConfig::default();
        let rule = rule().with_quality_threshold(50.0);
        let prefs = FusionPreferences::default();

        let output = MetricFusion::new(&config, &rule, &prefs).run(
            vec![
                hr("strap", 140.0, 0, 90.0),
                hr("watch", f64::NAN, 0, 90.0),
                hr("watch", 139.0, 200, 20.0),
                RawSample::new("watch", MetricType::Steps, 10.0, from_millis(0)),
                hr("watch", 141.0, 1_500, 90.0),
            ],
            from_millis(0),
        );

        let c = output.counts;
        assert_eq!(c.input, 5);
        assert_eq!(c.invalid, 1);
        assert_eq!(c.filtered, 2);
        assert_eq!(c.groups, 2);
        assert_eq!(c.fused, 2);
        assert_eq!(c.input, c.invalid + c.filtered + 2);
    }

    #[test]
    fn unregistered_sources_are_filtered() {
        let config = EngineConfig::default();
        let rule = rule();
        let prefs = FusionPreferences::default();
        let allowed: HashSet<String> = ["strap".to_string()].into_iter().collect();

        let output = MetricFusion::new(&config, &rule, &prefs)
            .with_allowed_sources(&allowed)
            .run(vec![hr("strap", 140.0, 0, 90.0), hr("ring", 120.0, 0, 90.0)], from_millis(0));

        assert_eq!(output.counts.filtered, 1);
        assert_eq!(output.points[0].contributing_sources, vec!["strap"]);
        assert_eq!(output.points[0].fusion_method, FusionMethod::SingleSource);
    }

    #[test]
    fn window_is_half_open() {
        let config = EngineConfig::default();
        let rule = rule();
        let prefs = FusionPreferences::default();

        let output = MetricFusion::new(&config, &rule, &prefs)
            .with_window(from_millis(1_000), from_millis(3_000))
            .run(
                vec![hr("strap", 1.0, 999, 90.0), hr("strap", 2.0, 1_000, 90.0), hr("strap", 3.0, 3_000, 90.0)],
                from_millis(0),
            );

        assert_eq!(output.points.len(), 1);
        assert_eq!(output.points[0].value, 2.0);
        assert_eq!(output.counts.filtered, 2);
    }

    #[test]
    fn groups_outside_precedence_are_counted() {
        let config = EngineConfig::default();
        let rule = rule();
        let prefs = FusionPreferences::default();

        let output = MetricFusion::new(&config, &rule, &prefs)
            .run(vec![hr("ring", 60.0, 0, 90.0), hr("watch", 61.0, 5_000, 90.0)], from_millis(0));

        assert_eq!(output.counts.groups_without_preferred_source, 1);
    }

    #[test]
    fn conflict_records_point_at_their_fused_point() {
        let config = EngineConfig::default();
        let rule = rule();
        let prefs = FusionPreferences::default();

        let output = MetricFusion::new(&config, &rule, &prefs)
            .run(vec![hr("watch", 120.0, 0, 80.0), hr("strap", 140.0, 0, 85.0)], from_millis(0));

        assert_eq!(output.conflicts.len(), 1);
        let record = &output.conflicts[0];
        assert_eq!(record.fused_point_id, output.points[0].id);
        assert_eq!(record.source_a, "strap");
        assert_eq!(record.resolved_value, 140.0);
        assert!(!record.manually_resolved);
    }

    #[test]
    fn gap_filling_follows_preferences() {
        let config = EngineConfig::default();
        let rule = rule();
        let on = FusionPreferences {
            gap_filling_enabled: Some(true),
            ..Default::default()
        };

        let samples = vec![hr("strap", 60.0, 0, 90.0), hr("strap", 70.0, 10_000, 90.0)];
        let output = MetricFusion::new(&config, &rule, &on).run(samples.clone(), from_millis(0));
        assert_eq!(output.counts.interpolated, 9);
        assert_eq!(output.points.len(), 11);

        let off = FusionPreferences::default();
        let output = MetricFusion::new(&config, &rule, &off).run(samples, from_millis(0));
        assert_eq!(output.counts.interpolated, 0);
    }

    #[test]
    fn empty_batch_is_empty_output() {
        let config = EngineConfig::default();
        let rule = rule();
        let prefs = FusionPreferences::default();
        let output = MetricFusion::new(&config, &rule, &prefs).run(Vec::new(), from_millis(0));
        assert!(output.points.is_empty());
        assert_eq!(output.counts, FusionCounts::default());
    }
}
