// 📊 Timeline Report - Everything the renderer needs, in one value

use crate::config::ReportConfig;
use crate::error::ConfigError;
use crate::event::{ClassifiedEvent, RawChangeRecord};
use crate::legend::{paginate, Legend};
use crate::rules::RuleEngine;
use crate::timeline::{entity_list, group_by_entity, Granularity, TimelineDataset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineReport {
    pub title: String,
    pub granularity: Granularity,
    pub timeline: TimelineDataset,
    /// Timeline columns
    pub entities: Vec<String>,
    pub legend: Legend,
}

impl TimelineReport {
    /// Classify raw records with the canonical rules and assemble the report.
    pub fn build(records: &[RawChangeRecord], config: &ReportConfig) -> Result<Self, ConfigError> {
        Self::build_with(RuleEngine::canonical(), records, config)
    }

    pub fn build_with(
        engine: &RuleEngine,
        records: &[RawChangeRecord],
        config: &ReportConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let legend = paginate(engine.rules(), config.legend_width)?;
        let grouped = group_by_entity(engine.classify_all(records));

        Ok(TimelineReport {
            title: config.title.clone(),
            granularity: config.granularity,
            timeline: TimelineDataset::build(&grouped, config.granularity),
            entities: entity_list(&grouped),
            legend,
        })
    }
}

/// Sort for the plain listing: by timestamp, or by entity first when `by_entity`.
pub fn sort_for_listing(events: &mut [ClassifiedEvent], by_entity: bool) {
    if by_entity {
        events.sort_by(|a, b| a.entity.cmp(&b.entity).then(a.timestamp.cmp(&b.timestamp)));
    } else {
        events.sort_by_key(|e| e.timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(day: u32, entity: &str, description: &str) -> RawChangeRecord {
        RawChangeRecord::new(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(), entity, description)
    }

    #[test]
    fn test_build_report() {
        let records = vec![
            record(2, "db2", "Backup enabled"),
            record(1, "db1", "DB activated"),
            record(1, "db1", "Memory Limit changed from 1 GB to 2 GB"),
        ];
        let config = ReportConfig {
            title: "Weekly changes".to_string(),
            ..ReportConfig::default()
        };

        let report = TimelineReport::build(&records, &config).unwrap();
        assert_eq!(report.title, "Weekly changes");
        assert_eq!(report.entities, vec!["db1", "db2"]);
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline.events("2024-01-01", "db1").len(), 2);
        assert_eq!(report.legend.len(), 5);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = ReportConfig {
            legend_width: 0,
            ..ReportConfig::default()
        };
        assert_eq!(TimelineReport::build(&[], &config), Err(ConfigError::ZeroLegendWidth));
    }

    #[test]
    fn test_report_serializes_nested_map() {
        let report = TimelineReport::build(&[record(1, "db1", "DB deleted")], &ReportConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["timeline"]["2024-01-01"]["db1"][0]["icon"], "database-fill-slash");
        assert_eq!(json["timeline"]["2024-01-01"]["db1"][0]["direction"], "down");
        assert_eq!(json["granularity"], "daily");
    }

    #[test]
    fn test_listing_sort() {
        let engine = RuleEngine::canonical();
        let mut events = engine.classify_all(&[record(2, "a", "x"), record(1, "b", "x"), record(3, "a", "x")]);

        sort_for_listing(&mut events, false);
        assert_eq!(events.iter().map(|e| e.entity.as_str()).collect::<Vec<_>>(), vec!["b", "a", "a"]);

        sort_for_listing(&mut events, true);
        assert_eq!(events.iter().map(|e| e.entity.as_str()).collect::<Vec<_>>(), vec!["a", "a", "b"]);
        assert!(events[0].timestamp < events[1].timestamp);
    }
}
