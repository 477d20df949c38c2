//! Run summaries for the reporting layer

use serde::{Deserialize, Serialize};
use wearfuse_core::{FusionCounts, MetricType};

/// What happened to one metric in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricStatus {
    /// Samples were fused and persisted
    Fused,
    /// No samples arrived for the metric
    Empty,
    /// No fusion rule is configured for the metric
    SkippedNoRule,
}

/// Counts for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    #[serde(rename = "metricType")]
    pub metric: MetricType,
    pub status: MetricStatus,
    #[serde(flatten)]
    pub counts: FusionCounts,
}

impl MetricSummary {
    pub fn empty(metric: MetricType) -> Self {
        Self {
            metric,
            status: MetricStatus::Empty,
            counts: FusionCounts::default(),
        }
    }

    /// Every input sample counted as skipped
    pub fn skipped(metric: MetricType, input: usize) -> Self {
        Self {
            metric,
            status: MetricStatus::SkippedNoRule,
            counts: FusionCounts {
                input,
                ..FusionCounts::default()
            },
        }
    }

    pub fn fused(metric: MetricType, counts: FusionCounts) -> Self {
        Self {
            metric,
            status: MetricStatus::Fused,
            counts,
        }
    }
}

/// Per-metric outcomes of one sync for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub user_id: String,
    pub metrics: Vec<MetricSummary>,
    /// Set when the run stopped at a cancellation checkpoint
    pub cancelled: bool,
}

impl RunSummary {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Metrics skipped for lack of a rule
    pub fn skipped(&self) -> impl Iterator<Item = &MetricType> {
        self.metrics
            .iter()
            .filter(|m| m.status == MetricStatus::SkippedNoRule)
            .map(|m| &m.metric)
    }

    pub fn metric(&self, metric: &MetricType) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| &m.metric == metric)
    }

    /// Counts summed over every metric
    pub fn totals(&self) -> FusionCounts {
        self.metrics.iter().fold(FusionCounts::default(), |mut acc, m| {
            let c = &m.counts;
            acc.input += c.input;
            acc.invalid += c.invalid;
            acc.filtered += c.filtered;
            acc.groups += c.groups;
            acc.fused += c.fused;
            acc.interpolated += c.interpolated;
            acc.conflicts += c.conflicts;
            acc.capped_gaps += c.capped_gaps;
            acc.groups_without_preferred_source += c.groups_without_preferred_source;
            acc
        })
    }
}
