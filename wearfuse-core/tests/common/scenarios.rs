//! Named fusion scenarios with expected outcomes

use wearfuse_core::model::{MetricType, RawSample, ResolutionStrategy, FusionRule};

use super::{heart_rate, rule, sample};

pub struct Scenario {
    pub name: &'static str,
    pub rule: FusionRule,
    pub samples: Vec<RawSample>,
}

/// Chest strap X and watch Y disagree by 20 bpm
pub fn two_device_heart_rate(strategy: ResolutionStrategy) -> Scenario {
    Scenario {
        name: "two_device_heart_rate",
        rule: rule(MetricType::HeartRate, "x", strategy),
        samples: vec![
            heart_rate("x", 120.0, 0, 90.0, 85.0),
            heart_rate("y", 140.0, 0, 85.0, 80.0),
        ],
    }
}

/// Phone reports steps, then goes quiet for ten minutes
pub fn steps_with_dropout() -> Scenario {
    Scenario {
        name: "steps_with_dropout",
        rule: rule(MetricType::Steps, "phone", ResolutionStrategy::PreferPrimary).with_gap_filling(true),
        samples: vec![
            sample("phone", MetricType::Steps, 1_000.0, 0, 80.0, 90.0),
            sample("phone", MetricType::Steps, 1_900.0, 600_000, 80.0, 70.0),
        ],
    }
}
