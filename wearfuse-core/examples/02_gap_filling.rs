//! Gap Filling Example
//!
//! A phone reports steps, then goes quiet for ten minutes. With gap filling
//! enabled the fused series is bridged at the metric's 60 s cadence, and each
//! synthesized point is marked interpolated with reduced confidence.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_gap_filling
//! ```

use wearfuse_core::time::from_millis;
use wearfuse_core::{
    EngineConfig, FusionPreferences, FusionRule, InterpolationMethod, MetricFusion, MetricType,
    RawSample, ResolutionStrategy,
};

fn main() {
    println!("WearFuse Gap Filling Example");
    println!("============================\n");

    let t0_ms = 1_709_280_000_000;
    let samples = vec![
        RawSample::new("phone", MetricType::Steps, 1_000.0, from_millis(t0_ms))
            .with_accuracy(80.0)
            .with_quality(90.0),
        RawSample::new("phone", MetricType::Steps, 1_900.0, from_millis(t0_ms + 600_000))
            .with_accuracy(80.0)
            .with_quality(70.0),
    ];

    let config = EngineConfig::default();
    let rule = FusionRule::new("demo-user", MetricType::Steps, "phone", ResolutionStrategy::PreferPrimary)
        .with_gap_filling(true);

    for method in [
        InterpolationMethod::Linear,
        InterpolationMethod::Cubic,
        InterpolationMethod::Nearest,
    ] {
        let prefs = FusionPreferences {
            interpolation_method: method,
            ..Default::default()
        };
        let output = MetricFusion::new(&config, &rule, &prefs).run(samples.clone(), from_millis(t0_ms));

        println!("{} ({} real, {} interpolated)", method.name(), output.counts.fused, output.counts.interpolated);
        for point in &output.points {
            let minute = (point.timestamp.timestamp_millis() - t0_ms) / 60_000;
            let marker = if point.is_interpolated() { "~" } else { " " };
            println!(
                "  {} +{:>2} min  {:>7.1} steps  confidence {:.1}",
                marker,
                minute,
                point.value,
                point.confidence.value()
            );
        }
        println!();
    }
}
