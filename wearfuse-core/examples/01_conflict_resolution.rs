//! Conflict Resolution Example
//!
//! A chest strap and a watch report heart rate at the same instant and
//! disagree by 20 bpm. This example runs the same pair through every
//! resolution strategy and prints the fused value, its label and the
//! confidence score.
//!
//! ## What You'll Learn
//!
//! - How a fusion rule names the primary source and the strategy
//! - How per-call preferences override the rule's strategy
//! - Why a conflicted pair scores lower than either device alone
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_conflict_resolution
//! ```

use wearfuse_core::time::from_millis;
use wearfuse_core::{
    EngineConfig, FusionPreferences, FusionRule, MetricFusion, MetricType, RawSample,
    ResolutionStrategy,
};

fn main() {
    println!("WearFuse Conflict Resolution Example");
    println!("====================================\n");

    println!("Chest strap X: 120 bpm (accuracy 90, quality 85)");
    println!("Watch Y:       140 bpm (accuracy 85, quality 80)");
    println!("Tolerance for heart rate is 5 bpm\n");

    let t0 = from_millis(1_709_280_000_000);
    let samples = vec![
        RawSample::new("x", MetricType::HeartRate, 120.0, t0)
            .with_accuracy(90.0)
            .with_quality(85.0),
        RawSample::new("y", MetricType::HeartRate, 140.0, t0)
            .with_accuracy(85.0)
            .with_quality(80.0),
    ];

    let config = EngineConfig::default();
    let rule = FusionRule::new("demo-user", MetricType::HeartRate, "x", ResolutionStrategy::PreferPrimary);

    println!("{:<18} {:>8} {:>12}  {}", "strategy", "value", "confidence", "label");
    println!("{}", "-".repeat(60));

    for strategy in [
        ResolutionStrategy::PreferPrimary,
        ResolutionStrategy::MostRecent,
        ResolutionStrategy::HighestAccuracy,
        ResolutionStrategy::WeightedAverage,
        ResolutionStrategy::Manual,
    ] {
        let prefs = FusionPreferences {
            resolution_strategy: Some(strategy),
            ..Default::default()
        };
        let output = MetricFusion::new(&config, &rule, &prefs).run(samples.clone(), t0);

        for point in &output.points {
            println!(
                "{:<18} {:>8.1} {:>12.1}  {:?}",
                strategy.name(),
                point.value,
                point.confidence.value(),
                point.fusion_method
            );
        }
    }

    println!("\nConflict log for one run:");
    let output = MetricFusion::new(&config, &rule, &FusionPreferences::default()).run(samples, t0);
    for record in &output.conflicts {
        println!(
            "  {} vs {}: {} vs {} (difference {}), resolved to {}",
            record.source_a,
            record.source_b,
            record.value_a,
            record.value_b,
            record.absolute_difference,
            record.resolved_value
        );
    }
}
