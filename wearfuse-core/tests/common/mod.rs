//! Common fixtures for integration tests
//!
//! This module provides:
//! - Sample builders for the devices used across scenarios
//! - Named scenarios with their expected outcomes
//! - A deterministic generator for noisy multi-device streams

#![allow(dead_code)]

use wearfuse_core::model::{FusionRule, MetricType, RawSample, ResolutionStrategy};
use wearfuse_core::time::{from_millis, Timestamp};

pub mod scenarios;

/// Start of every fixture timeline (2024-03-01T08:00:00Z)
pub const T0_MS: i64 = 1_709_280_000_000;

pub fn at(offset_ms: i64) -> Timestamp {
    from_millis(T0_MS + offset_ms)
}

/// Sample from `source` at `offset_ms` past [`T0_MS`]
pub fn sample(
    source: &str,
    metric: MetricType,
    value: f64,
    offset_ms: i64,
    accuracy: f64,
    quality: f64,
) -> RawSample {
    RawSample::new(source, metric, value, at(offset_ms))
        .with_accuracy(accuracy)
        .with_quality(quality)
}

pub fn heart_rate(source: &str, value: f64, offset_ms: i64, accuracy: f64, quality: f64) -> RawSample {
    sample(source, MetricType::HeartRate, value, offset_ms, accuracy, quality)
}

pub fn rule(metric: MetricType, primary: &str, strategy: ResolutionStrategy) -> FusionRule {
    FusionRule::new("user-1", metric, primary, strategy)
}

/// Deterministic xorshift generator
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / 16_777_216.0
    }

    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Heart rate stream from several devices, one reading per device per second
///
/// Each device adds its own jitter around a shared baseline and reports with
/// a sub-second offset, so canonical grouping puts one reading per device in
/// every second.
pub fn heart_rate_session(devices: &[&str], seconds: i64, seed: u32) -> Vec<RawSample> {
    let mut rng = TestRng::new(seed);
    let mut samples = Vec::new();
    for second in 0..seconds {
        let baseline = 120.0 + 10.0 * ((second as f64) / 30.0).sin();
        for device in devices {
            let offset = (rng.gen_range(0.0, 900.0)) as i64;
            samples.push(heart_rate(
                device,
                (baseline + rng.gen_range(-8.0, 8.0)).round(),
                second * 1_000 + offset,
                rng.gen_range(60.0, 100.0).round(),
                rng.gen_range(50.0, 100.0).round(),
            ));
        }
    }
    samples
}
