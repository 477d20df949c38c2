//! Shared fixtures for engine tests
//!
//! - A seeded [`MemoryStore`] with a user's devices and rules
//! - Sample builders on a fixed timeline
//! - Sinks that fail on demand

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wearfuse_core::time::{from_millis, FixedClock, Timestamp};
use wearfuse_core::{
    ConflictRecord, EngineConfig, FusedPoint, FusionRule, MetricType, RawSample, ResolutionStrategy,
    Source,
};
use wearfuse_engine::{FusionEngine, FusionSink, MemoryStore, RuleStore, SourceRegistry, StoreError, StoreResult};

pub const USER: &str = "user-1";

/// 2024-03-01T08:00:00Z
pub const T0_MS: i64 = 1_709_280_000_000;

pub fn at(offset_ms: i64) -> Timestamp {
    from_millis(T0_MS + offset_ms)
}

pub fn sample(source: &str, metric: MetricType, value: f64, offset_ms: i64, accuracy: f64, quality: f64) -> RawSample {
    RawSample::new(source, metric, value, at(offset_ms))
        .with_accuracy(accuracy)
        .with_quality(quality)
}

pub fn clock() -> FixedClock {
    FixedClock::new(at(3_600_000))
}

/// Store with a chest strap, a watch and a phone, plus heart-rate and steps rules
pub async fn seeded_store(clock: &FixedClock) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::with_clock(Arc::new(clock.clone())));

    for source in [
        Source::new("x", USER, "Chest strap")
            .with_metrics([MetricType::HeartRate])
            .with_priority(10),
        Source::new("y", USER, "Watch")
            .with_metrics([MetricType::HeartRate, MetricType::Steps, MetricType::Sleep])
            .with_priority(5),
        Source::new("phone", USER, "Phone")
            .with_metrics([MetricType::Steps])
            .with_priority(3),
    ] {
        store.register_source(source).await.unwrap();
    }

    store
        .upsert_fusion_rule(FusionRule::new(USER, MetricType::HeartRate, "x", ResolutionStrategy::PreferPrimary))
        .await
        .unwrap();
    store
        .upsert_fusion_rule(
            FusionRule::new(USER, MetricType::Steps, "phone", ResolutionStrategy::WeightedAverage)
                .with_fallbacks(["y"])
                .with_gap_filling(true),
        )
        .await
        .unwrap();

    store
}

pub fn engine_over(store: &Arc<MemoryStore>, clock: &FixedClock) -> FusionEngine {
    FusionEngine::new(EngineConfig::default(), store.clone(), store.clone(), store.clone())
        .unwrap()
        .with_clock(Arc::new(clock.clone()))
}

/// Sink that fails every write after the first `ok_writes`
pub struct FlakySink {
    ok_writes: usize,
    writes: AtomicUsize,
}

impl FlakySink {
    pub fn failing_after(ok_writes: usize) -> Self {
        Self {
            ok_writes,
            writes: AtomicUsize::new(0),
        }
    }

    fn attempt(&self) -> StoreResult<()> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst);
        if n < self.ok_writes {
            Ok(())
        } else {
            Err(StoreError::Backend("disk full".into()))
        }
    }
}

#[async_trait]
impl FusionSink for FlakySink {
    async fn store_fused_points(&self, _points: &[FusedPoint]) -> StoreResult<()> {
        self.attempt()
    }

    async fn log_conflicts(&self, _conflicts: &[ConflictRecord]) -> StoreResult<()> {
        self.attempt()
    }
}
