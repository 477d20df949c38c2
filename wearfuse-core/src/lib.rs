//! Core fusion engine for WearFuse
//!
//! Merges metric samples reported by several wearables for the same person
//! into one trustworthy series per metric, with a conflict log for every
//! disagreement.
//!
//! Everything in this crate is pure and synchronous. Stores, persistence and
//! orchestration across metrics live in `wearfuse-engine`.
//!
//! ```rust
//! use wearfuse_core::{EngineConfig, FusionPreferences, FusionRule, MetricFusion, MetricType, RawSample, ResolutionStrategy};
//! use wearfuse_core::time::from_millis;
//!
//! let rule = FusionRule::new("u1", MetricType::HeartRate, "x", ResolutionStrategy::WeightedAverage);
//! let config = EngineConfig::default();
//! let prefs = FusionPreferences::default();
//!
//! let output = MetricFusion::new(&config, &rule, &prefs).run(
//!     vec![
//!         RawSample::new("x", MetricType::HeartRate, 120.0, from_millis(0)).with_accuracy(90.0).with_quality(85.0),
//!         RawSample::new("y", MetricType::HeartRate, 140.0, from_millis(0)).with_accuracy(85.0).with_quality(80.0),
//!     ],
//!     from_millis(0),
//! );
//!
//! let fused = &output.points[0];
//! assert!((fused.value - 129.7).abs() < 0.01);
//! assert_eq!(fused.confidence.value(), 78.0);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod fusion;
pub mod model;
pub mod time;
pub mod validators;

// Public API
pub use config::EngineConfig;
pub use errors::{ConfigError, ConfigResult, ValidationError, ValidationResult};
pub use fusion::{FusionCounts, MetricFusion, MetricOutput, Score};
pub use model::{
    ConflictRecord, FusedPoint, FusionMethod, FusionPreferences, FusionRule, InterpolationMethod,
    MetricType, RawSample, ResolutionStrategy, Source,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
