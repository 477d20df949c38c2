//! Conflict Resolution
//!
//! Turns a ranked group into one value. A group without conflicts always
//! takes the top-ranked sample's value unchanged. With conflicts, the rule's
//! [`ResolutionStrategy`] decides:
//!
//! | Strategy           | Value                                         |
//! |--------------------|-----------------------------------------------|
//! | `prefer-primary`   | top-ranked sample                             |
//! | `most-recent`      | latest timestamp, rank breaks ties            |
//! | `highest-accuracy` | highest accuracy, rank breaks ties            |
//! | `weighted-average` | Σ(v·w) / Σw with w = (accuracy + quality) / 2 |
//! | `manual`           | top-ranked sample until a person decides      |

use serde::{Deserialize, Serialize};

use crate::fusion::conflict::Conflict;
use crate::model::{FusionMethod, RawSample, ResolutionStrategy};

/// How fused points are labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodLabels {
    /// Label names what produced the value
    #[default]
    Strategy,
    /// `single-source` for one sample, `weighted-average` for anything else
    Legacy,
}

/// Outcome of resolving one group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub value: f64,
    pub method: FusionMethod,
}

/// Resolve a ranked group to a single value
///
/// Returns `None` only for an empty group.
pub fn resolve(
    ranked: &[RawSample],
    conflicts: &[Conflict],
    strategy: ResolutionStrategy,
    labels: MethodLabels,
) -> Option<Resolution> {
    let top = ranked.first()?;

    let value = if conflicts.is_empty() {
        top.value
    } else {
        match strategy {
            ResolutionStrategy::PreferPrimary | ResolutionStrategy::Manual => top.value,
            ResolutionStrategy::MostRecent => {
                best_by(ranked, top, |candidate, best| candidate.timestamp > best.timestamp).value
            }
            ResolutionStrategy::HighestAccuracy => {
                best_by(ranked, top, |candidate, best| candidate.accuracy > best.accuracy).value
            }
            ResolutionStrategy::WeightedAverage => weighted_average(ranked).unwrap_or(top.value),
        }
    };

    let method = match labels {
        MethodLabels::Strategy if conflicts.is_empty() => FusionMethod::SingleSource,
        MethodLabels::Strategy => FusionMethod::from(strategy),
        MethodLabels::Legacy if ranked.len() == 1 => FusionMethod::SingleSource,
        MethodLabels::Legacy => FusionMethod::WeightedAverage,
    };

    Some(Resolution { value, method })
}

/// First sample that no later sample strictly beats
fn best_by<'a, F>(ranked: &'a [RawSample], top: &'a RawSample, beats: F) -> &'a RawSample
where
    F: Fn(&RawSample, &RawSample) -> bool,
{
    let mut best = top;
    for candidate in ranked.iter().skip(1) {
        if beats(candidate, best) {
            best = candidate;
        }
    }
    best
}

/// Weighted mean, or `None` when every weight is zero
pub fn weighted_average(samples: &[RawSample]) -> Option<f64> {
    let (weighted_sum, total_weight) = samples.iter().fold((0.0, 0.0), |(sum, total), s| {
        let w = s.weight();
        (sum + s.value * w, total + w)
    });

    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}
