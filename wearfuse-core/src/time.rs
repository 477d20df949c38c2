//! Time management for fusion runs
//!
//! Sample and fused-point timestamps come from the devices; the only time the
//! engine itself reads is the creation stamp on emitted records. That read
//! goes through a [`Clock`] so tests can pin it.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use crate::constants::MS_PER_SECOND;

/// Timestamp type used throughout the engine (UTC wall clock)
pub type Timestamp = DateTime<Utc>;

/// Source of "now" for creation timestamps
pub trait Clock: Send + Sync {
    /// Get the current timestamp
    fn now(&self) -> Timestamp;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Fixed, settable clock for testing
///
/// Clones share the same instant, so a test can hand one copy to the engine
/// and advance another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<Mutex<Timestamp>>,
}

impl FixedClock {
    pub fn new(instant: Timestamp) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    /// Clock pinned to a unix timestamp in milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Self::new(from_millis(millis))
    }

    pub fn set(&self, instant: Timestamp) {
        if let Ok(mut guard) = self.instant.lock() {
            *guard = instant;
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        if let Ok(mut guard) = self.instant.lock() {
            *guard += chrono::Duration::milliseconds(ms);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        match self.instant.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Convert unix milliseconds to a timestamp, saturating at the epoch for
/// values chrono cannot represent
pub fn from_millis(millis: i64) -> Timestamp {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
}

/// Milliseconds from `earlier` to `later` (negative if out of order)
pub fn delta_ms(earlier: Timestamp, later: Timestamp) -> i64 {
    (later - earlier).num_milliseconds()
}

/// Floor a timestamp to its whole second
pub fn floor_to_second(ts: Timestamp) -> Timestamp {
    from_millis(ts.timestamp().saturating_mul(MS_PER_SECOND))
}
