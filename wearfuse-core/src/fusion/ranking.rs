//! Priority ranking within a group
//!
//! Order: primary-source samples first, then descending accuracy, then
//! descending quality. Anything still tied keeps its input position.

use std::cmp::Ordering;

use crate::model::RawSample;

/// Sort a group in place so the top-ranked sample is first
pub fn rank_samples(samples: &mut [RawSample], primary_source: &str) {
    // slice::sort_by is stable
    samples.sort_by(|a, b| compare(a, b, primary_source));
}

/// Ranked copy of a group
pub fn ranked(mut samples: Vec<RawSample>, primary_source: &str) -> Vec<RawSample> {
    rank_samples(&mut samples, primary_source);
    samples
}

fn compare(a: &RawSample, b: &RawSample, primary_source: &str) -> Ordering {
    let a_primary = a.source_id == primary_source;
    let b_primary = b.source_id == primary_source;

    b_primary
        .cmp(&a_primary)
        .then_with(|| b.accuracy.total_cmp(&a.accuracy))
        .then_with(|| b.quality.total_cmp(&a.quality))
}
