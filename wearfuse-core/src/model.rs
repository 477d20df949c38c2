//! Data Model for Multi-Source Metric Fusion
//!
//! ## Overview
//!
//! Every wearable a person owns reports its own copy of the same physiology.
//! A watch and a chest strap both record heart rate; a phone and a watch both
//! count steps. This module defines the records that flow through fusion:
//!
//! ```text
//! RawSample (per device) ──┐
//! RawSample (per device) ──┼─→ Fusion ─→ FusedPoint (one per instant)
//! RawSample (per device) ──┘       ↓
//!                            ConflictRecord (audit / adjudication)
//! ```
//!
//! Configuration records ([`FusionRule`], [`Source`], [`FusionPreferences`])
//! decide how disagreements are settled.
//!
//! ## Serialization
//!
//! All records derive serde with camelCase field names so collaborators can
//! move them as JSON. Enumerations are closed: an unknown resolution strategy
//! or interpolation method is a parse error, never a silent default.
//! Metric types are the exception - unknown names are kept as
//! [`MetricType::Other`] and fused with default tolerances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ConfigError;
use crate::fusion::confidence::Score;
use crate::time::Timestamp;

pub use crate::fusion::conflict::Conflict;

/// Generate a fresh record identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Kind of measurement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricType {
    HeartRate,
    Steps,
    Distance,
    Pace,
    Calories,
    Sleep,
    Gps,
    /// Metric without dedicated tables
    Other(String),
}

impl MetricType {
    /// Canonical kebab-case name
    pub fn name(&self) -> &str {
        match self {
            MetricType::HeartRate => "heart-rate",
            MetricType::Steps => "steps",
            MetricType::Distance => "distance",
            MetricType::Pace => "pace",
            MetricType::Calories => "calories",
            MetricType::Sleep => "sleep",
            MetricType::Gps => "gps",
            MetricType::Other(name) => name,
        }
    }

    /// Unit of the reported value
    pub fn unit(&self) -> &'static str {
        match self {
            MetricType::HeartRate => "bpm",
            MetricType::Steps => "steps",
            MetricType::Distance => "km",
            MetricType::Pace => "s/km",
            MetricType::Calories => "kcal",
            MetricType::Sleep => "min",
            MetricType::Gps => "deg",
            MetricType::Other(_) => "",
        }
    }
}

impl FromStr for MetricType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MetricType::from(s.to_string()))
    }
}

impl From<String> for MetricType {
    fn from(raw: String) -> Self {
        match normalize(&raw).as_str() {
            "heart-rate" | "heartrate" | "hr" => MetricType::HeartRate,
            "steps" => MetricType::Steps,
            "distance" => MetricType::Distance,
            "pace" => MetricType::Pace,
            "calories" => MetricType::Calories,
            "sleep" => MetricType::Sleep,
            "gps" => MetricType::Gps,
            _ => MetricType::Other(raw),
        }
    }
}

impl From<MetricType> for String {
    fn from(metric: MetricType) -> Self {
        match metric {
            MetricType::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('_', "-")
}

/// One reading from one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSample {
    pub id: String,
    pub source_id: String,
    #[serde(rename = "metricType")]
    pub metric: MetricType,
    pub value: f64,
    pub timestamp: Timestamp,
    /// Device-reported accuracy, 0-100
    pub accuracy: f64,
    /// Device-reported signal quality, 0-100
    pub quality: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl RawSample {
    /// Sample with full accuracy and quality; adjust with the `with_*` methods
    pub fn new(source_id: impl Into<String>, metric: MetricType, value: f64, timestamp: Timestamp) -> Self {
        Self {
            id: new_id(),
            source_id: source_id.into(),
            metric,
            value,
            timestamp,
            accuracy: 100.0,
            quality: 100.0,
            metadata: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Weight of this sample in a weighted average
    pub fn weight(&self) -> f64 {
        (self.accuracy + self.quality) / 2.0
    }
}

/// How conflicting readings are settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResolutionStrategy {
    /// Trust the top-ranked sample
    PreferPrimary,
    /// Trust the latest reading
    MostRecent,
    /// Trust the most accurate device
    HighestAccuracy,
    /// Blend readings by (accuracy + quality) / 2
    WeightedAverage,
    /// Hold the top-ranked value until a human decides
    Manual,
}

impl ResolutionStrategy {
    pub const fn name(&self) -> &'static str {
        match self {
            ResolutionStrategy::PreferPrimary => "prefer-primary",
            ResolutionStrategy::MostRecent => "most-recent",
            ResolutionStrategy::HighestAccuracy => "highest-accuracy",
            ResolutionStrategy::WeightedAverage => "weighted-average",
            ResolutionStrategy::Manual => "manual",
        }
    }
}

impl FromStr for ResolutionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "prefer-primary" => Ok(ResolutionStrategy::PreferPrimary),
            "most-recent" => Ok(ResolutionStrategy::MostRecent),
            "highest-accuracy" => Ok(ResolutionStrategy::HighestAccuracy),
            "weighted-average" => Ok(ResolutionStrategy::WeightedAverage),
            "manual" => Ok(ResolutionStrategy::Manual),
            _ => Err(ConfigError::UnsupportedStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for ResolutionStrategy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResolutionStrategy> for String {
    fn from(strategy: ResolutionStrategy) -> Self {
        strategy.name().to_string()
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Curve used to synthesize points across a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InterpolationMethod {
    #[default]
    Linear,
    /// Smoothstep easing, 3p² - 2p³
    Cubic,
    /// Step to whichever endpoint is closer
    Nearest,
}

impl InterpolationMethod {
    pub const fn name(&self) -> &'static str {
        match self {
            InterpolationMethod::Linear => "linear",
            InterpolationMethod::Cubic => "cubic",
            InterpolationMethod::Nearest => "nearest",
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "linear" => Ok(InterpolationMethod::Linear),
            "cubic" | "smoothstep" => Ok(InterpolationMethod::Cubic),
            "nearest" => Ok(InterpolationMethod::Nearest),
            _ => Err(ConfigError::UnsupportedInterpolation(s.to_string())),
        }
    }
}

impl TryFrom<String> for InterpolationMethod {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InterpolationMethod> for String {
    fn from(method: InterpolationMethod) -> Self {
        method.name().to_string()
    }
}

/// How a fused value was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FusionMethod {
    /// Value taken from one sample without arbitration
    SingleSource,
    PreferPrimary,
    MostRecent,
    HighestAccuracy,
    WeightedAverage,
    /// Interim top-ranked value awaiting human adjudication
    ManualPending,
    /// Synthesized across a gap
    Interpolated,
}

impl From<ResolutionStrategy> for FusionMethod {
    fn from(strategy: ResolutionStrategy) -> Self {
        match strategy {
            ResolutionStrategy::PreferPrimary => FusionMethod::PreferPrimary,
            ResolutionStrategy::MostRecent => FusionMethod::MostRecent,
            ResolutionStrategy::HighestAccuracy => FusionMethod::HighestAccuracy,
            ResolutionStrategy::WeightedAverage => FusionMethod::WeightedAverage,
            ResolutionStrategy::Manual => FusionMethod::ManualPending,
        }
    }
}

/// Per-user, per-metric fusion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionRule {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "metricType")]
    pub metric: MetricType,
    pub primary_source: String,
    /// Ordered, duplicate-free, never contains the primary source
    #[serde(default)]
    pub fallback_sources: Vec<String>,
    pub resolution_strategy: ResolutionStrategy,
    #[serde(default)]
    pub gap_filling_enabled: bool,
    /// Samples below this quality are excluded, 0-100
    #[serde(default)]
    pub quality_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl FusionRule {
    pub fn new(
        user_id: impl Into<String>,
        metric: MetricType,
        primary_source: impl Into<String>,
        resolution_strategy: ResolutionStrategy,
    ) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.into(),
            metric,
            primary_source: primary_source.into(),
            fallback_sources: Vec::new(),
            resolution_strategy,
            gap_filling_enabled: false,
            quality_threshold: 0.0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set fallback sources, dropping duplicates and the primary source
    pub fn with_fallbacks<I, S>(mut self, fallbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_sources.clear();
        for source in fallbacks {
            let source = source.into();
            if source != self.primary_source && !self.fallback_sources.contains(&source) {
                self.fallback_sources.push(source);
            }
        }
        self
    }

    pub fn with_gap_filling(mut self, enabled: bool) -> Self {
        self.gap_filling_enabled = enabled;
        self
    }

    pub fn with_quality_threshold(mut self, threshold: f64) -> Self {
        self.quality_threshold = threshold;
        self
    }

    /// Primary source followed by fallbacks, in configured order
    pub fn source_precedence(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_source.as_str())
            .chain(self.fallback_sources.iter().map(String::as_str))
    }
}

/// A registered device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Higher wins
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub reliability: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub supported_metrics: Vec<MetricType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<Timestamp>,
}

fn default_active() -> bool {
    true
}

impl Source {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            priority: 0,
            accuracy: 0.0,
            reliability: 0.0,
            active: true,
            supported_metrics: Vec::new(),
            last_sync: None,
        }
    }

    pub fn with_metrics<I: IntoIterator<Item = MetricType>>(mut self, metrics: I) -> Self {
        self.supported_metrics = metrics.into_iter().collect();
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn supports(&self, metric: &MetricType) -> bool {
        self.supported_metrics.contains(metric)
    }
}

/// One trustworthy value for one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedPoint {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "metricType")]
    pub metric: MetricType,
    pub value: f64,
    pub timestamp: Timestamp,
    pub primary_source: String,
    /// Never empty
    pub contributing_sources: Vec<String>,
    pub confidence: Score,
    pub quality_score: Score,
    pub fusion_method: FusionMethod,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
    pub created_at: Timestamp,
}

impl FusedPoint {
    pub fn is_interpolated(&self) -> bool {
        self.fusion_method == FusionMethod::Interpolated
    }
}

/// Persisted disagreement between two devices
///
/// `resolved_value` and `manually_resolved` are the only mutable fields; they
/// change when a person adjudicates the conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    pub id: String,
    pub fused_point_id: String,
    pub user_id: String,
    #[serde(rename = "metricType")]
    pub metric: MetricType,
    pub source_a: String,
    pub source_b: String,
    pub value_a: f64,
    pub value_b: f64,
    pub absolute_difference: f64,
    pub resolution_method: ResolutionStrategy,
    pub resolved_value: f64,
    pub manually_resolved: bool,
    pub created_at: Timestamp,
}

impl ConflictRecord {
    /// Record a conflict that was settled while fusing `point`
    pub fn from_conflict(
        conflict: &Conflict,
        point: &FusedPoint,
        strategy: ResolutionStrategy,
    ) -> Self {
        Self {
            id: new_id(),
            fused_point_id: point.id.clone(),
            user_id: point.user_id.clone(),
            metric: point.metric.clone(),
            source_a: conflict.source_a.clone(),
            source_b: conflict.source_b.clone(),
            value_a: conflict.value_a,
            value_b: conflict.value_b,
            absolute_difference: conflict.difference,
            resolution_method: strategy,
            resolved_value: point.value,
            manually_resolved: false,
            created_at: point.created_at,
        }
    }

    /// Apply a human decision
    pub fn resolve_manually(&mut self, value: f64) {
        self.resolved_value = value;
        self.manually_resolved = true;
    }

    /// Still waiting on a human decision
    pub fn is_pending(&self) -> bool {
        self.resolution_method == ResolutionStrategy::Manual && !self.manually_resolved
    }
}

/// Per-call overrides supplied with a sync
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_strategy: Option<ResolutionStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_filling_enabled: Option<bool>,
    #[serde(default)]
    pub interpolation_method: InterpolationMethod,
}

impl FusionPreferences {
    /// Parse preferences from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn strategy_for(&self, rule: &FusionRule) -> ResolutionStrategy {
        self.resolution_strategy.unwrap_or(rule.resolution_strategy)
    }

    pub fn quality_threshold_for(&self, rule: &FusionRule) -> f64 {
        self.quality_threshold.unwrap_or(rule.quality_threshold)
    }

    pub fn gap_filling_for(&self, rule: &FusionRule) -> bool {
        self.gap_filling_enabled.unwrap_or(rule.gap_filling_enabled)
    }
}
