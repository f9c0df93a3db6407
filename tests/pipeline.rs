use change_timeline::{
    read_change_log, ChangeFilter, Direction, Granularity, ReportConfig, TimelineReport, SUBSCRIPTION_ENTITY,
};

const EXPORT: &str = "date,database name,description,activity
2024-01-01T23:59:00Z,db1,Memory Limit changed from 1 GB to 2 GB,Configuration
2024-01-01T10:00:00Z,db1,DB activated,Configuration
2024-01-01T11:15:00Z,,Source ip/subnet added. Ip/subnet - 10.0.0.0/24,Configuration
2024-01-02T08:00:00Z,db2,Database Throughput was changed from 2000 ops/sec to 1000 ops/sec,Configuration
2024-01-02T09:00:00Z,db2,Something unexpected happened,Configuration
2024-01-02T09:30:00Z,db2,User logged in,Login
";

fn load() -> Vec<change_timeline::RawChangeRecord> {
    read_change_log(EXPORT.as_bytes(), "export", &ChangeFilter::default()).unwrap()
}

#[test]
fn test_daily_report_from_export() {
    let report = TimelineReport::build(&load(), &ReportConfig::default()).unwrap();

    assert_eq!(report.entities, vec![SUBSCRIPTION_ENTITY, "db1", "db2"]);
    assert_eq!(report.timeline.bucket_keys().collect::<Vec<_>>(), vec!["2024-01-01", "2024-01-02"]);

    let db1 = report.timeline.events("2024-01-01", "db1");
    assert_eq!(db1.len(), 2);
    assert_eq!(db1[0].title, "Database Activation/Deletions");
    assert_eq!(db1[1].icon, "memory");
    assert_eq!(db1[1].direction, Direction::Up);
    assert_eq!(db1[1].to_value(), Some(2000));

    let subscription = report.timeline.events("2024-01-01", "");
    assert_eq!(subscription[0].title, "Network Change");

    let db2 = report.timeline.events("2024-01-02", "db2");
    assert_eq!(db2[0].direction, Direction::Down);
    assert_eq!(db2[1].title, "Other Change");
}

#[test]
fn test_hourly_report_splits_day() {
    let config = ReportConfig {
        granularity: Granularity::Hourly,
        ..ReportConfig::default()
    };
    let report = TimelineReport::build(&load(), &config).unwrap();

    assert_eq!(report.timeline.events("2024-01-01 10:00", "db1").len(), 1);
    assert_eq!(report.timeline.events("2024-01-01 23:00", "db1").len(), 1);
    assert_eq!(report.timeline.event_count(), 5);
}
