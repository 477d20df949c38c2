//! Collaborator traits
//!
//! The engine reads configuration through [`SourceRegistry`] and
//! [`RuleStore`], and hands its output to a [`FusionSink`]. Manual
//! adjudication of conflicts goes through [`ConflictLog`], which may notify a
//! [`RefusionHook`]. Implementations are responsible for serializing
//! concurrent writes to the same rule or fused-point stream.

use async_trait::async_trait;
use wearfuse_core::{ConflictRecord, FusedPoint, FusionRule, MetricType, Source};

use crate::StoreResult;

/// Per-user device metadata
#[async_trait]
pub trait SourceRegistry: Send + Sync {
    /// Active sources for a user, optionally only those supporting `metric`,
    /// ordered by descending priority then id
    async fn get_active_sources(
        &self,
        user_id: &str,
        metric: Option<&MetricType>,
    ) -> StoreResult<Vec<Source>>;

    /// Change a source's priority; `NotFound` if the user has no such source
    async fn set_source_priority(&self, user_id: &str, source_id: &str, priority: u32) -> StoreResult<()>;

    /// Insert or replace a source
    async fn register_source(&self, source: Source) -> StoreResult<()>;
}

/// Per-(user, metric) fusion rules
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn get_fusion_rule(&self, user_id: &str, metric: &MetricType) -> StoreResult<Option<FusionRule>>;

    /// Update the rule for (user, metric) keeping its id and creation stamp,
    /// or insert it stamped with a creation time; returns the stored rule
    async fn upsert_fusion_rule(&self, rule: FusionRule) -> StoreResult<FusionRule>;
}

/// Destination for fusion output
#[async_trait]
pub trait FusionSink: Send + Sync {
    /// Append fused points; points are immutable once stored
    async fn store_fused_points(&self, points: &[FusedPoint]) -> StoreResult<()>;

    async fn log_conflicts(&self, conflicts: &[ConflictRecord]) -> StoreResult<()>;
}

/// Human adjudication of logged conflicts
#[async_trait]
pub trait ConflictLog: Send + Sync {
    /// Record a person's decision and return the updated record
    async fn resolve_conflict(&self, conflict_id: &str, value: f64) -> StoreResult<ConflictRecord>;

    /// Conflicts still awaiting a decision
    async fn pending_conflicts(&self, user_id: &str) -> StoreResult<Vec<ConflictRecord>>;
}

/// Notified after a conflict is resolved by hand
///
/// Implementations can correct the fused point the conflict refers to. The
/// engine itself never re-fuses.
#[async_trait]
pub trait RefusionHook: Send + Sync {
    async fn on_manual_resolution(&self, conflict: &ConflictRecord);
}
