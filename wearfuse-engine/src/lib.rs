//! Fusion Orchestration and Store Seams
//!
//! ## Overview
//!
//! `wearfuse-core` knows how to fuse one batch. This crate connects it to the
//! systems around it:
//!
//! ```text
//!                     ┌──────────────────┐
//! SourceRegistry ───→ │                  │ ───→ FusionSink (fused points,
//! RuleStore ────────→ │   FusionEngine   │       conflict records)
//! raw samples ──────→ │                  │ ───→ RunSummary
//!                     └──────────────────┘
//! ```
//!
//! Every collaborator is an `async_trait` seam (see [`store`]), so the same
//! engine runs against a database, a remote service, or the in-memory stores
//! in [`memory`].
//!
//! ## Failure Semantics
//!
//! | Condition                        | Outcome                                  |
//! |----------------------------------|------------------------------------------|
//! | Malformed sample                 | dropped, counted as invalid              |
//! | No rule for a metric             | metric skipped, reported in the summary  |
//! | Empty batch                      | empty result                             |
//! | Store or sink failure            | propagated unchanged as [`EngineError`]  |
//! | Unsupported strategy/config name | rejected when the config is parsed       |
//!
//! The engine never retries. Callers own retry policy.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use wearfuse_core::{EngineConfig, FusionPreferences, FusionRule, MetricType, RawSample, ResolutionStrategy, Source};
//! use wearfuse_core::time::from_millis;
//! use wearfuse_engine::{FusionEngine, MemoryStore, RuleStore, SourceRegistry};
//!
//! # async fn example() -> Result<(), wearfuse_engine::EngineError> {
//! let store = Arc::new(MemoryStore::new());
//! store.register_source(Source::new("strap", "u1", "Chest strap").with_metrics([MetricType::HeartRate])).await?;
//! store.upsert_fusion_rule(FusionRule::new("u1", MetricType::HeartRate, "strap", ResolutionStrategy::PreferPrimary)).await?;
//!
//! let engine = FusionEngine::new(EngineConfig::default(), store.clone(), store.clone(), store.clone())?;
//! let result = engine
//!     .fuse_metric("u1", &MetricType::HeartRate, vec![
//!         RawSample::new("strap", MetricType::HeartRate, 64.0, from_millis(1_709_280_000_000)),
//!     ], &FusionPreferences::default())
//!     .await?;
//!
//! assert_eq!(result.points.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod memory;
pub mod orchestrator;
pub mod store;
pub mod summary;

pub use cancel::CancellationFlag;
pub use memory::MemoryStore;
pub use orchestrator::{BatchResult, FusionEngine, MetricResult, TimeWindow};
pub use store::{ConflictLog, FusionSink, RefusionHook, RuleStore, SourceRegistry};
pub use summary::{MetricStatus, MetricSummary, RunSummary};

use thiserror::Error;
use wearfuse_core::ConfigError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures reported by a collaborator store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Failed to decode stored record: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Errors surfaced by the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
