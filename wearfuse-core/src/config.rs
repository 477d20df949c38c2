//! Engine configuration
//!
//! Deployment-wide knobs for a fusion engine. Per-metric tolerance and
//! interval tables are fixed constants (see [`crate::constants`]); only the
//! behaviour switches below are configurable.
//!
//! ```rust
//! use wearfuse_core::config::{EngineConfig, GroupingMode};
//!
//! let config = EngineConfig::from_json_str(r#"{ "grouping": "tolerance" }"#).unwrap();
//! assert_eq!(config.grouping, GroupingMode::Tolerance);
//! assert_eq!(config.tolerance_window_ms, 30_000);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_POINTS_PER_GAP, GROUPING_TOLERANCE_MS, INTERPOLATION_CONFIDENCE_FACTOR,
};
use crate::errors::{ConfigError, ConfigResult};

pub use crate::fusion::grouping::GroupingMode;
pub use crate::fusion::resolve::MethodLabels;

/// Behaviour switches for a fusion engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// How samples are bucketed into instants
    pub grouping: GroupingMode,
    /// Window for [`GroupingMode::Tolerance`] (milliseconds)
    pub tolerance_window_ms: i64,
    /// Labelling convention for fused points
    pub method_labels: MethodLabels,
    /// Scale applied to endpoint scores for synthesized points, in (0, 1]
    pub interpolation_confidence_factor: f64,
    /// Cap on synthesized points per gap
    pub max_points_per_gap: usize,
    /// Drop samples from sources that are not registered, active and
    /// supporting the metric. Off by default: without it every sample is
    /// fused whether or not its source was ever registered.
    pub require_registered_sources: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grouping: GroupingMode::Canonical,
            tolerance_window_ms: GROUPING_TOLERANCE_MS,
            method_labels: MethodLabels::Strategy,
            interpolation_confidence_factor: INTERPOLATION_CONFIDENCE_FACTOR,
            max_points_per_gap: DEFAULT_MAX_POINTS_PER_GAP,
            require_registered_sources: false,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is within its allowed range
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tolerance_window_ms < 0 {
            return Err(ConfigError::InvalidConfig {
                field: "toleranceWindowMs",
                reason: format!("must not be negative, got {}", self.tolerance_window_ms),
            });
        }

        let factor = self.interpolation_confidence_factor;
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(ConfigError::InvalidConfig {
                field: "interpolationConfidenceFactor",
                reason: format!("must be in (0, 1], got {factor}"),
            });
        }

        if self.max_points_per_gap == 0 {
            return Err(ConfigError::InvalidConfig {
                field: "maxPointsPerGap",
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}
