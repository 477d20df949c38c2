//! In-Memory Stores
//!
//! ## Overview
//!
//! [`MemoryStore`] implements every collaborator trait on top of
//! `tokio::sync::RwLock`-guarded maps. It backs tests and embedded
//! deployments that keep a single user's data in process.
//!
//! ```text
//! MemoryStore
//! ├── sources:   (user, source id)   → Source
//! ├── rules:     (user, metric)      → FusionRule
//! ├── points:    append-only         → FusedPoint
//! └── conflicts: append-only log     → ConflictRecord (mutable by adjudication)
//! ```
//!
//! Writers take the lock for the whole operation, so concurrent upserts to
//! the same rule never interleave.

use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use wearfuse_core::time::{Clock, SystemClock};
use wearfuse_core::{ConflictRecord, FusedPoint, FusionRule, MetricType, Source};

use crate::store::{ConflictLog, FusionSink, RefusionHook, RuleStore, SourceRegistry};
use crate::{StoreError, StoreResult};

type SourceKey = (String, String);
type RuleKey = (String, MetricType);

/// Process-local implementation of every store trait
pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    sources: RwLock<HashMap<SourceKey, Source>>,
    rules: RwLock<HashMap<RuleKey, FusionRule>>,
    points: RwLock<Vec<FusedPoint>>,
    conflicts: RwLock<Vec<ConflictRecord>>,
    hook: Option<Arc<dyn RefusionHook>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Store stamping rule creation and updates from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            sources: RwLock::new(HashMap::new()),
            rules: RwLock::new(HashMap::new()),
            points: RwLock::new(Vec::new()),
            conflicts: RwLock::new(Vec::new()),
            hook: None,
        }
    }

    /// Notify `hook` whenever a conflict is resolved by hand
    pub fn with_refusion_hook(mut self, hook: Arc<dyn RefusionHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Stored fused points for (user, metric), by timestamp
    pub async fn fused_points(&self, user_id: &str, metric: &MetricType) -> Vec<FusedPoint> {
        let mut points: Vec<FusedPoint> = self
            .points
            .read()
            .await
            .iter()
            .filter(|p| p.user_id == user_id && &p.metric == metric)
            .cloned()
            .collect();
        points.sort_by_key(|p| p.timestamp);
        points
    }

    /// Every logged conflict for a user, in logging order
    pub async fn conflicts(&self, user_id: &str) -> Vec<ConflictRecord> {
        self.conflicts
            .read()
            .await
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SourceRegistry for MemoryStore {
    async fn get_active_sources(
        &self,
        user_id: &str,
        metric: Option<&MetricType>,
    ) -> StoreResult<Vec<Source>> {
        let mut active: Vec<Source> = self
            .sources
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id && s.active)
            .filter(|s| metric.map_or(true, |m| s.supports(m)))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        Ok(active)
    }

    async fn set_source_priority(&self, user_id: &str, source_id: &str, priority: u32) -> StoreResult<()> {
        let mut sources = self.sources.write().await;
        let source = sources
            .get_mut(&(user_id.to_string(), source_id.to_string()))
            .ok_or_else(|| StoreError::NotFound(format!("source {source_id} for user {user_id}")))?;
        source.priority = priority;
        debug!("Source {} for user {} now has priority {}", source_id, user_id, priority);
        Ok(())
    }

    async fn register_source(&self, source: Source) -> StoreResult<()> {
        let key = (source.user_id.clone(), source.id.clone());
        self.sources.write().await.insert(key, source);
        Ok(())
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn get_fusion_rule(&self, user_id: &str, metric: &MetricType) -> StoreResult<Option<FusionRule>> {
        Ok(self
            .rules
            .read()
            .await
            .get(&(user_id.to_string(), metric.clone()))
            .cloned())
    }

    async fn upsert_fusion_rule(&self, mut rule: FusionRule) -> StoreResult<FusionRule> {
        let now = self.clock.now();
        let key = (rule.user_id.clone(), rule.metric.clone());
        let mut rules = self.rules.write().await;

        match rules.get(&key) {
            Some(existing) => {
                rule.id = existing.id.clone();
                rule.created_at = existing.created_at;
                debug!("Updating fusion rule {} ({} for user {})", rule.id, rule.metric, rule.user_id);
            }
            None => {
                rule.created_at = Some(now);
                debug!("Creating fusion rule {} ({} for user {})", rule.id, rule.metric, rule.user_id);
            }
        }
        rule.updated_at = Some(now);

        rules.insert(key, rule.clone());
        Ok(rule)
    }
}

#[async_trait]
impl FusionSink for MemoryStore {
    async fn store_fused_points(&self, points: &[FusedPoint]) -> StoreResult<()> {
        self.points.write().await.extend_from_slice(points);
        Ok(())
    }

    async fn log_conflicts(&self, conflicts: &[ConflictRecord]) -> StoreResult<()> {
        self.conflicts.write().await.extend_from_slice(conflicts);
        Ok(())
    }
}

#[async_trait]
impl ConflictLog for MemoryStore {
    async fn resolve_conflict(&self, conflict_id: &str, value: f64) -> StoreResult<ConflictRecord> {
        let resolved = {
            let mut conflicts = self.conflicts.write().await;
            let record = conflicts
                .iter_mut()
                .find(|c| c.id == conflict_id)
                .ok_or_else(|| StoreError::NotFound(format!("conflict {conflict_id}")))?;
            record.resolve_manually(value);
            record.clone()
        };

        info!(
            "Conflict {} on {} resolved by hand to {}",
            resolved.id, resolved.metric, value
        );

        if let Some(hook) = &self.hook {
            hook.on_manual_resolution(&resolved).await;
        }
        Ok(resolved)
    }

    async fn pending_conflicts(&self, user_id: &str) -> StoreResult<Vec<ConflictRecord>> {
        Ok(self
            .conflicts
            .read()
            .await
            .iter()
            .filter(|c| c.user_id == user_id && c.is_pending())
            .cloned()
            .collect())
    }
}
