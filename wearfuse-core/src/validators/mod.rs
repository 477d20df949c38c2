//! Ingress Validation for Raw Samples
//!
//! ## Overview
//!
//! Samples arrive from device syncs that the engine does not control. Before a
//! sample reaches grouping it must pass three checks:
//!
//! 1. **Finite value**: NaN or infinity would poison every average it touches
//! 2. **Scores in range**: accuracy and quality lie in [0, 100]
//! 3. **Attributable**: the sample names the device that produced it
//!
//! A failing sample is dropped on its own. The caller counts the drop and the
//! rest of the batch is fused as usual.
//!
//! ```rust
//! use wearfuse_core::model::{MetricType, RawSample};
//! use wearfuse_core::time::from_millis;
//! use wearfuse_core::validators::validate_sample;
//!
//! let sample = RawSample::new("watch", MetricType::HeartRate, f64::NAN, from_millis(0));
//! assert!(validate_sample(&sample).is_err());
//! ```

pub mod sample;

pub use sample::{check_score, partition_valid, validate_sample};
