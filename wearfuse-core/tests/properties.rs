//! Property tests: fusion invariants hold for arbitrary device readings.

mod common;

use proptest::prelude::*;
use wearfuse_core::config::{EngineConfig, GroupingMode};
use wearfuse_core::fusion::{
    detect_for_metric, group_samples, interpolate_value, ranked, resolve, score_group,
    weighted_average, MethodLabels,
};
use wearfuse_core::model::{
    FusionPreferences, InterpolationMethod, MetricType, RawSample, ResolutionStrategy,
};
use wearfuse_core::MetricFusion;

use common::{at, heart_rate, rule};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_strategy() -> impl Strategy<Value = ResolutionStrategy> {
    prop_oneof![
        Just(ResolutionStrategy::PreferPrimary),
        Just(ResolutionStrategy::MostRecent),
        Just(ResolutionStrategy::HighestAccuracy),
        Just(ResolutionStrategy::WeightedAverage),
        Just(ResolutionStrategy::Manual),
    ]
}

/// (source index, value, offset, accuracy, quality)
fn arb_reading() -> impl Strategy<Value = (usize, f64, i64, f64, f64)> {
    (0usize..4, 40.0f64..200.0, 0i64..10_000, 0.0f64..=100.0, 0.0f64..=100.0)
}

const SOURCES: [&str; 4] = ["strap", "watch", "ring", "phone"];

fn to_samples(readings: &[(usize, f64, i64, f64, f64)]) -> Vec<RawSample> {
    readings
        .iter()
        .map(|&(src, value, offset, accuracy, quality)| {
            heart_rate(SOURCES[src], value, offset, accuracy, quality)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// The primary source always ranks first, whatever its accuracy.
    #[test]
    fn primary_source_ranks_first(readings in prop::collection::vec(arb_reading(), 1..12)) {
        let mut samples = to_samples(&readings);
        samples[0].source_id = "strap".into();
        let group = ranked(samples, "strap");
        prop_assert_eq!(group[0].source_id.as_str(), "strap");
    }

    /// Two readings conflict exactly when they differ by more than the tolerance.
    #[test]
    fn pair_conflicts_iff_beyond_tolerance(a in 40.0f64..200.0, b in 40.0f64..200.0) {
        let group = vec![heart_rate("strap", a, 0, 90.0, 90.0), heart_rate("watch", b, 0, 90.0, 90.0)];
        let conflicts = detect_for_metric(&group, &MetricType::HeartRate);
        let expected = usize::from((a - b).abs() > 5.0);
        prop_assert_eq!(conflicts.len(), expected);
    }

    /// A weighted average of two distinct values lies strictly between them.
    #[test]
    fn weighted_average_is_between(
        a in 40.0f64..200.0,
        gap in 0.5f64..50.0,
        wa in 1.0f64..=100.0,
        wb in 1.0f64..=100.0,
    ) {
        let b = a + gap;
        let group = vec![heart_rate("strap", a, 0, wa, wa), heart_rate("watch", b, 0, wb, wb)];
        let value = weighted_average(&group).unwrap();
        prop_assert!(value > a && value < b, "{} not in ({}, {})", value, a, b);
    }

    /// Linear and smoothstep stay within the endpoints; nearest returns one of them.
    #[test]
    fn interpolation_is_bounded(a in -500.0f64..500.0, b in -500.0f64..500.0, p in 0.001f64..0.999) {
        let (lo, hi) = (a.min(b), a.max(b));
        for method in [InterpolationMethod::Linear, InterpolationMethod::Cubic] {
            let v = interpolate_value(method, a, b, p);
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
        let nearest = interpolate_value(InterpolationMethod::Nearest, a, b, p);
        prop_assert!(nearest == a || nearest == b);
    }

    /// Single-sample groups score exactly their quality, fractions included.
    #[test]
    fn lone_sample_confidence_is_quality(quality in 0.0f64..=100.0) {
        let group = vec![heart_rate("watch", 70.0, 0, 50.0, quality)];
        let scores = score_group(&group, 0);
        prop_assert_eq!(scores.confidence.value(), quality);
        prop_assert_eq!(scores.quality.value(), quality);
    }

    /// A lone sample run end to end keeps its quality as confidence.
    #[test]
    fn lone_sample_survives_the_pipeline(quality in 0.0f64..=100.0, value in 40.0f64..200.0) {
        let rule = rule(MetricType::HeartRate, "strap", ResolutionStrategy::PreferPrimary);
        let config = EngineConfig::default();
        let prefs = FusionPreferences::default();
        let output = MetricFusion::new(&config, &rule, &prefs)
            .run(vec![heart_rate("watch", value, 0, 50.0, quality)], at(0));
        prop_assert_eq!(output.points.len(), 1);
        prop_assert_eq!(output.points[0].confidence.value(), quality);
        prop_assert_eq!(output.points[0].quality_score.value(), quality);
    }

    /// Conflict-free groups take the top-ranked value untouched.
    #[test]
    fn agreement_is_never_averaged(
        base in 40.0f64..200.0,
        spread in prop::collection::vec(0.0f64..5.0, 1..5),
        strategy in arb_strategy(),
    ) {
        let samples: Vec<_> = spread
            .iter()
            .enumerate()
            .map(|(i, d)| heart_rate(SOURCES[i % 4], base + d / 2.0, 0, 90.0 - i as f64, 80.0))
            .collect();
        let group = ranked(samples, "strap");
        let conflicts = detect_for_metric(&group, &MetricType::HeartRate);
        prop_assert!(conflicts.is_empty());
        let resolution = resolve(&group, &conflicts, strategy, MethodLabels::Strategy).unwrap();
        prop_assert_eq!(resolution.value, group[0].value);
    }

    /// Canonical grouping does not depend on input order.
    #[test]
    fn canonical_grouping_ignores_order(readings in prop::collection::vec(arb_reading(), 0..20)) {
        let samples = to_samples(&readings);
        let mut reversed = samples.clone();
        reversed.reverse();

        let forward = group_samples(samples, GroupingMode::Canonical, 0);
        let backward = group_samples(reversed, GroupingMode::Canonical, 0);

        prop_assert_eq!(forward.len(), backward.len());
        for ((ka, ga), (kb, gb)) in forward.iter().zip(backward.iter()) {
            prop_assert_eq!(ka, kb);
            prop_assert_eq!(ga.len(), gb.len());
        }
    }

    /// Full runs are deterministic and keep scores in range.
    #[test]
    fn fusion_is_deterministic(
        readings in prop::collection::vec(arb_reading(), 0..30),
        strategy in arb_strategy(),
        gap_fill in any::<bool>(),
    ) {
        let rule = rule(MetricType::HeartRate, "strap", strategy).with_gap_filling(gap_fill);
        let config = EngineConfig::default();
        let prefs = FusionPreferences::default();
        let samples = to_samples(&readings);

        let first = MetricFusion::new(&config, &rule, &prefs).run(samples.clone(), at(0));
        let second = MetricFusion::new(&config, &rule, &prefs).run(samples, at(0));

        prop_assert_eq!(first.counts, second.counts);
        for (a, b) in first.points.iter().zip(&second.points) {
            prop_assert_eq!(a.value, b.value);
            prop_assert_eq!(a.confidence, b.confidence);
            prop_assert_eq!(a.quality_score, b.quality_score);
            prop_assert!((0.0..=100.0).contains(&a.confidence.value()));
            prop_assert!(!a.contributing_sources.is_empty());
        }
        prop_assert_eq!(first.counts.input, readings.len());
        prop_assert_eq!(first.counts.fused, first.counts.groups);
        prop_assert_eq!(first.points.len(), first.counts.fused + first.counts.interpolated);
    }
}
