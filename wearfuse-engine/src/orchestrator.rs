//! Fusion Orchestrator
//!
//! ## Overview
//!
//! Sequences one fusion run per (user, metric):
//!
//! ```text
//! fetch rule ──(none)──→ skipped
//!     │
//! fetch active sources (when registration is required)
//!     │
//! MetricFusion::run  (validate → filter → group → rank → detect → resolve → score → gap fill)
//!     │
//! store fused points ─→ log conflicts ─→ MetricResult + MetricSummary
//! ```
//!
//! Store calls are awaited one after another. The engine keeps no state
//! between calls, so separate (user, metric) runs can proceed concurrently
//! on a shared engine.
//!
//! [`FusionEngine::fuse_batch`] takes a mixed batch, partitions it by metric
//! in a fixed order and checks a [`CancellationFlag`] before starting each
//! metric.

use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use wearfuse_core::time::{Clock, SystemClock, Timestamp};
use wearfuse_core::{
    ConflictRecord, EngineConfig, FusedPoint, FusionPreferences, MetricFusion, MetricType, RawSample,
};

use crate::cancel::CancellationFlag;
use crate::store::{FusionSink, RuleStore, SourceRegistry};
use crate::summary::{MetricSummary, RunSummary};
use crate::EngineResult;

/// Half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }
}

/// Output of one metric's run
#[derive(Debug, Clone)]
pub struct MetricResult {
    /// Sorted by timestamp, already handed to the sink
    pub points: Vec<FusedPoint>,
    /// Already handed to the sink
    pub conflicts: Vec<ConflictRecord>,
    pub summary: MetricSummary,
}

impl MetricResult {
    fn without_output(summary: MetricSummary) -> Self {
        Self {
            points: Vec::new(),
            conflicts: Vec::new(),
            summary,
        }
    }
}

/// Output of a multi-metric run
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub metrics: Vec<MetricResult>,
    pub summary: RunSummary,
}

/// Runs fusion against a set of collaborator stores
pub struct FusionEngine {
    config: EngineConfig,
    sources: Arc<dyn SourceRegistry>,
    rules: Arc<dyn RuleStore>,
    sink: Arc<dyn FusionSink>,
    clock: Arc<dyn Clock>,
}

impl FusionEngine {
    /// Build an engine; the configuration is validated first
    pub fn new(
        config: EngineConfig,
        sources: Arc<dyn SourceRegistry>,
        rules: Arc<dyn RuleStore>,
        sink: Arc<dyn FusionSink>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sources,
            rules,
            sink,
            clock: Arc::new(SystemClock),
        })
    }

    /// Stamp emitted records from `clock` instead of the wall clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fuse one metric's samples for a user
    pub async fn fuse_metric(
        &self,
        user_id: &str,
        metric: &MetricType,
        samples: Vec<RawSample>,
        preferences: &FusionPreferences,
    ) -> EngineResult<MetricResult> {
        self.run_metric(user_id, metric, samples, preferences, None).await
    }

    /// Fuse one metric's samples, ignoring any outside `window`
    pub async fn fuse_metric_in(
        &self,
        user_id: &str,
        metric: &MetricType,
        samples: Vec<RawSample>,
        preferences: &FusionPreferences,
        window: TimeWindow,
    ) -> EngineResult<MetricResult> {
        self.run_metric(user_id, metric, samples, preferences, Some(window)).await
    }

    /// Fuse a mixed batch, one metric at a time
    ///
    /// Metrics run in a fixed order. If `cancel` is set before a metric
    /// starts, the run stops there and returns what it has with
    /// `summary.cancelled` set. An error from any metric stops the run.
    pub async fn fuse_batch(
        &self,
        user_id: &str,
        samples: Vec<RawSample>,
        preferences: &FusionPreferences,
        cancel: &CancellationFlag,
    ) -> EngineResult<BatchResult> {
        let mut by_metric: BTreeMap<MetricType, Vec<RawSample>> = BTreeMap::new();
        for sample in samples {
            by_metric.entry(sample.metric.clone()).or_default().push(sample);
        }

        let mut summary = RunSummary::new(user_id);
        let mut metrics = Vec::with_capacity(by_metric.len());

        for (metric, batch) in by_metric {
            if cancel.is_cancelled() {
                warn!("Fusion for user {} cancelled before {}", user_id, metric);
                summary.cancelled = true;
                break;
            }

            let result = self.run_metric(user_id, &metric, batch, preferences, None).await?;
            summary.metrics.push(result.summary.clone());
            metrics.push(result);
        }

        let totals = summary.totals();
        info!(
            "Fusion run for user {}: {} metrics, {} fused, {} interpolated, {} conflicts, {} skipped",
            user_id,
            summary.metrics.len(),
            totals.fused,
            totals.interpolated,
            totals.conflicts,
            summary.skipped().count()
        );

        Ok(BatchResult { metrics, summary })
    }

    async fn run_metric(
        &self,
        user_id: &str,
        metric: &MetricType,
        samples: Vec<RawSample>,
        preferences: &FusionPreferences,
        window: Option<TimeWindow>,
    ) -> EngineResult<MetricResult> {
        if samples.is_empty() {
            debug!("No {} samples for user {}", metric, user_id);
            return Ok(MetricResult::without_output(MetricSummary::empty(metric.clone())));
        }

        let Some(rule) = self.rules.get_fusion_rule(user_id, metric).await? else {
            warn!(
                "No fusion rule for {} (user {}), skipping {} samples",
                metric,
                user_id,
                samples.len()
            );
            return Ok(MetricResult::without_output(MetricSummary::skipped(
                metric.clone(),
                samples.len(),
            )));
        };

        let allowed: Option<HashSet<String>> = if self.config.require_registered_sources {
            let sources = self.sources.get_active_sources(user_id, Some(metric)).await?;
            Some(sources.into_iter().map(|s| s.id).collect())
        } else {
            None
        };

        let mut fusion = MetricFusion::new(&self.config, &rule, preferences);
        if let Some(allowed) = &allowed {
            fusion = fusion.with_allowed_sources(allowed);
        }
        if let Some(window) = window {
            fusion = fusion.with_window(window.start, window.end);
        }

        let output = fusion.run(samples, self.clock.now());

        if !output.points.is_empty() {
            self.sink.store_fused_points(&output.points).await?;
        }
        if !output.conflicts.is_empty() {
            self.sink.log_conflicts(&output.conflicts).await?;
        }

        let counts = output.counts;
        info!(
            "Fused {} for user {}: {} in, {} invalid, {} filtered, {} points, {} interpolated, {} conflicts",
            metric,
            user_id,
            counts.input,
            counts.invalid,
            counts.filtered,
            counts.fused,
            counts.interpolated,
            counts.conflicts
        );

        Ok(MetricResult {
            points: output.points,
            conflicts: output.conflicts,
            summary: MetricSummary::fused(metric.clone(), counts),
        })
    }
}
