// 🕒 Timeline - Classified events bucketed by time, then by entity
//
// dataset[bucket][entity] -> events, ascending by timestamp.
// Bucket keys are zero-padded date text, so lexical order is chronological.

use crate::event::ClassifiedEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Display key for subscription-level changes (records with no database).
///
/// Reserved: a database literally named "(subscription)" shares this column
/// in both the timeline and the entity list.
pub const SUBSCRIPTION_ENTITY: &str = "(subscription)";

/// Classified events keyed by owning entity, as delivered by ingestion.
pub type EventsByEntity = BTreeMap<String, Vec<ClassifiedEvent>>;

// ============================================================================
// GRANULARITY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Hourly,
}

impl Granularity {
    /// chrono format for the bucket key. Hourly keys keep a ":00" minute
    /// field so they still read as clock times.
    pub fn key_format(&self) -> &'static str {
        match self {
            Granularity::Daily => "%Y-%m-%d",
            Granularity::Hourly => "%Y-%m-%d %H:00",
        }
    }

    pub fn bucket_key(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp.format(self.key_format()).to_string()
    }
}

/// Entity id as shown in the timeline
pub fn display_entity(entity: &str) -> &str {
    if entity.is_empty() {
        SUBSCRIPTION_ENTITY
    } else {
        entity
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Group a flat event list by entity, keeping each entity's events in input order.
pub fn group_by_entity(events: impl IntoIterator<Item = ClassifiedEvent>) -> EventsByEntity {
    let mut grouped = EventsByEntity::new();
    for event in events {
        grouped.entry(event.entity.clone()).or_default().push(event);
    }
    grouped
}

/// Sorted, deduplicated entity ids present in the input (timeline columns).
pub fn entity_list(events: &EventsByEntity) -> Vec<String> {
    events
        .iter()
        .filter(|(_, evs)| !evs.is_empty())
        .map(|(entity, _)| display_entity(entity).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ============================================================================
// TIMELINE DATASET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineDataset {
    buckets: BTreeMap<String, BTreeMap<String, Vec<ClassifiedEvent>>>,
}

impl TimelineDataset {
    /// Bucket every event by timestamp and entity.
    pub fn build(events: &EventsByEntity, granularity: Granularity) -> Self {
        let mut buckets: BTreeMap<String, BTreeMap<String, Vec<ClassifiedEvent>>> = BTreeMap::new();

        for (entity, entity_events) in events {
            let column = display_entity(entity);
            for event in entity_events {
                buckets
                    .entry(granularity.bucket_key(&event.timestamp))
                    .or_default()
                    .entry(column.to_string())
                    .or_default()
                    .push(event.clone());
            }
        }

        // Stable, so same-instant events keep input order
        for columns in buckets.values_mut() {
            for bucket_events in columns.values_mut() {
                bucket_events.sort_by_key(|e| e.timestamp);
            }
        }

        log::debug!("built timeline with {} {:?} buckets", buckets.len(), granularity);
        TimelineDataset { buckets }
    }

    pub fn bucket_keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn bucket(&self, key: &str) -> Option<&BTreeMap<String, Vec<ClassifiedEvent>>> {
        self.buckets.get(key)
    }

    /// Events for an entity in a bucket, oldest first. Empty when absent.
    pub fn events(&self, bucket: &str, entity: &str) -> &[ClassifiedEvent] {
        self.buckets
            .get(bucket)
            .and_then(|columns| columns.get(display_entity(entity)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|columns| columns.values())
            .map(Vec::len)
            .sum()
    }
}
