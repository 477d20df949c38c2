//! Error Types for Sample Validation and Fusion Configuration
//!
//! ## Error Categories
//!
//! Errors fall into two categories, and they are handled very differently:
//!
//! ### Per-Sample Violations
//! - `NonFiniteValue`: NaN or infinity reported by a device
//! - `ScoreOutOfRange`: accuracy or quality outside [0, 100]
//! - `MissingSourceId`: sample cannot be attributed to a device
//!
//! A bad sample is dropped and counted. The rest of the batch is still fused,
//! so one flaky device never blocks a sync.
//!
//! ### Configuration Failures
//! - `UnsupportedStrategy`: resolution strategy name the engine does not know
//! - `UnsupportedInterpolation`: interpolation method name the engine does not know
//! - `UnsupportedGroupingMode`: grouping mode name the engine does not know
//! - `InvalidConfig`: a configuration value outside its allowed range
//!
//! These are raised when configuration is parsed. A fusion run never falls back
//! to a default strategy; health data is only trusted if the rule that produced
//! it is the rule that was configured.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use wearfuse_core::{ValidationError, validators::validate_sample};
//! # use wearfuse_core::model::RawSample;
//!
//! fn accept(sample: &RawSample) -> bool {
//!     match validate_sample(sample) {
//!         Ok(()) => true,
//!         Err(ValidationError::NonFiniteValue { .. }) => {
//!             // Device firmware glitch - drop and count
//!             false
//!         }
//!         Err(_) => false,
//!     }
//! }
//! ```

use thiserror::Error;

/// Result type for sample validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for configuration parsing
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons a raw sample is rejected at ingress
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is NaN or infinite
    #[error("Sample {sample_id} has a non-finite value")]
    NonFiniteValue {
        /// Identifier of the offending sample
        sample_id: String,
    },

    /// Accuracy or quality outside [0, 100]
    #[error("Sample {sample_id} has {field} {value} outside [0, 100]")]
    ScoreOutOfRange {
        /// Identifier of the offending sample
        sample_id: String,
        /// Which score failed ("accuracy" or "quality")
        field: &'static str,
        /// The reported score
        value: f64,
    },

    /// Source id is empty
    #[error("Sample {sample_id} has no source id")]
    MissingSourceId {
        /// Identifier of the offending sample
        sample_id: String,
    },
}

/// Configuration that cannot be honoured
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Resolution strategy name not implemented by the engine
    #[error("Unsupported resolution strategy: {0}")]
    UnsupportedStrategy(String),

    /// Interpolation method name not implemented by the engine
    #[error("Unsupported interpolation method: {0}")]
    UnsupportedInterpolation(String),

    /// Grouping mode name not implemented by the engine
    #[error("Unsupported grouping mode: {0}")]
    UnsupportedGroupingMode(String),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
