//! Temporal Grouping
//!
//! Buckets the samples of one (user, metric) batch into "same instant" groups.
//!
//! ## Modes
//!
//! ### Canonical (default)
//!
//! Every timestamp is floored to its whole second and samples sharing a
//! second form a group. Grouping is symmetric and independent of input order:
//!
//! ```text
//! 12:00:00.120  watch ─┐
//! 12:00:00.870  strap ─┴─→ 12:00:00  [watch, strap]
//! 12:00:01.010  watch ───→ 12:00:01  [watch]
//! ```
//!
//! ### Tolerance (legacy)
//!
//! Samples are visited in input order. Each joins the first existing group
//! whose anchor lies within the window (30 s by default), otherwise it
//! anchors a new group. The result depends on input order: A at 0 s, B at
//! 25 s, C at 50 s gives {A, B} {C}, while C, B, A gives {C, B} {A}.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::ConfigError;
use crate::model::RawSample;
use crate::time::{delta_ms, floor_to_second, Timestamp};

/// How samples are bucketed into instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GroupingMode {
    /// Floor to the whole second
    #[default]
    Canonical,
    /// Join the first anchor within the window
    Tolerance,
}

impl GroupingMode {
    pub const fn name(&self) -> &'static str {
        match self {
            GroupingMode::Canonical => "canonical",
            GroupingMode::Tolerance => "tolerance",
        }
    }
}

impl FromStr for GroupingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(GroupingMode::Canonical),
            "tolerance" => Ok(GroupingMode::Tolerance),
            _ => Err(ConfigError::UnsupportedGroupingMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for GroupingMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupingMode> for String {
    fn from(mode: GroupingMode) -> Self {
        mode.name().to_string()
    }
}

/// Groups keyed by instant, in ascending time order
pub type Groups = BTreeMap<Timestamp, Vec<RawSample>>;

/// Bucket samples into same-instant groups
///
/// Every returned group is non-empty and samples inside a group keep their
/// input order.
pub fn group_samples(samples: Vec<RawSample>, mode: GroupingMode, window_ms: i64) -> Groups {
    match mode {
        GroupingMode::Canonical => group_canonical(samples),
        GroupingMode::Tolerance => group_by_tolerance(samples, window_ms),
    }
}

fn group_canonical(samples: Vec<RawSample>) -> Groups {
    let mut groups = Groups::new();
    for sample in samples {
        groups
            .entry(floor_to_second(sample.timestamp))
            .or_default()
            .push(sample);
    }
    groups
}

fn group_by_tolerance(samples: Vec<RawSample>, window_ms: i64) -> Groups {
    // Anchors in creation order; the first match wins, not the closest
    let mut anchors: Vec<(Timestamp, Vec<RawSample>)> = Vec::new();

    for sample in samples {
        let slot = anchors
            .iter()
            .position(|(anchor, _)| delta_ms(*anchor, sample.timestamp).abs() <= window_ms);
        match slot {
            Some(idx) => anchors[idx].1.push(sample),
            None => anchors.push((sample.timestamp, vec![sample])),
        }
    }

    let mut groups = Groups::new();
    for (anchor, members) in anchors {
        // Distinct anchors are always more than the window apart
        groups.entry(anchor).or_default().extend(members);
    }
    groups
}
