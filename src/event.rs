// 📋 Change Events - Raw records and their classified form
//
// A RawChangeRecord is what the control plane logged. A ClassifiedEvent is the
// same record after the rule table has given it a title, icon and direction.
// Neither is mutated once built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RAW RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChangeRecord {
    pub timestamp: DateTime<Utc>,

    /// Database name. Empty means the change applies to the whole subscription.
    pub entity: String,

    /// Free-text change description, e.g. "Memory Limit changed from 1 GB to 2 GB"
    pub description: String,
}

impl RawChangeRecord {
    pub fn new(timestamp: DateTime<Utc>, entity: impl Into<String>, description: impl Into<String>) -> Self {
        RawChangeRecord {
            timestamp,
            entity: entity.into(),
            description: description.into(),
        }
    }

    pub fn is_subscription_level(&self) -> bool {
        self.entity.is_empty()
    }
}

// ============================================================================
// DIRECTION
// ============================================================================

/// Coarse polarity of a change, used for at-a-glance display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::NotApplicable => "NA",
        }
    }

    /// Direction implied by moving from one value to another.
    /// Equal values have no direction.
    pub fn between(from: i64, to: i64) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::NotApplicable,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NUMERIC DELTA
// ============================================================================

/// Before/after values extracted from a numeric change, unit-normalized
/// (sizes in MB, throughput in ops/sec).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub from: i64,
    pub to: i64,
}

impl Delta {
    pub fn new(from: i64, to: i64) -> Self {
        Delta { from, to }
    }
}

// ============================================================================
// CLASSIFIED EVENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub timestamp: DateTime<Utc>,
    pub entity: String,
    pub description: String,

    /// Id of the rule that matched
    pub rule_id: String,

    pub title: String,
    pub icon: String,
    pub direction: Direction,

    /// Present only for rules that extract numbers. Zeroed when extraction failed.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
}

impl ClassifiedEvent {
    pub fn from_value(&self) -> Option<i64> {
        self.delta.map(|d| d.from)
    }

    pub fn to_value(&self) -> Option<i64> {
        self.delta.map(|d| d.to)
    }

    /// One-line listing form: `RFC3339: entity: [title/direction] description`
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {}: [{}/{}] {}",
            self.timestamp.to_rfc3339(),
            self.entity,
            self.title,
            self.direction,
            self.description
        )
    }
}
