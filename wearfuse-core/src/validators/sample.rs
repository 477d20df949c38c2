//! Per-sample checks

use log::warn;

use crate::constants::{SCORE_MAX, SCORE_MIN};
use crate::errors::{ValidationError, ValidationResult};
use crate::model::RawSample;

/// Check a raw sample before fusion
pub fn validate_sample(sample: &RawSample) -> ValidationResult<()> {
    if !sample.value.is_finite() {
        return Err(ValidationError::NonFiniteValue {
            sample_id: sample.id.clone(),
        });
    }

    if sample.source_id.trim().is_empty() {
        return Err(ValidationError::MissingSourceId {
            sample_id: sample.id.clone(),
        });
    }

    check_score(&sample.id, "accuracy", sample.accuracy)?;
    check_score(&sample.id, "quality", sample.quality)?;

    Ok(())
}

/// Check a 0-100 score; NaN is out of range
pub fn check_score(sample_id: &str, field: &'static str, value: f64) -> ValidationResult<()> {
    if (SCORE_MIN..=SCORE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ScoreOutOfRange {
            sample_id: sample_id.to_string(),
            field,
            value,
        })
    }
}

/// Split a batch into valid samples and the number dropped
pub fn partition_valid(samples: Vec<RawSample>) -> (Vec<RawSample>, usize) {
    let mut dropped = 0;
    let valid = samples
        .into_iter()
        .filter(|sample| match validate_sample(sample) {
            Ok(()) => true,
            Err(err) => {
                warn!("Dropping sample: {}", err);
                dropped += 1;
                false
            }
        })
        .collect();
    (valid, dropped)
}
