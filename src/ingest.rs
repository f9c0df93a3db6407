// 📂 Ingestion - Control-plane CSV export → RawChangeRecord
//
// Expected columns: date, database name, description, activity.
// Only "Configuration" activity is kept. Bad rows are logged and skipped.
// csv strips a leading UTF-8 BOM from the header row.

use crate::config::ChangeFilter;
use crate::event::RawChangeRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Activity value marking configuration changes
pub const CONFIGURATION_ACTIVITY: &str = "Configuration";

#[derive(Debug, Deserialize)]
struct ChangeLogRow {
    #[serde(rename = "date")]
    date: String,

    #[serde(rename = "database name", default)]
    database: String,

    #[serde(rename = "description")]
    description: String,

    #[serde(rename = "activity", default)]
    activity: String,
}

/// Parse an export timestamp. RFC 3339, or "YYYY-MM-DD HH:MM:SS" taken as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Unrecognised timestamp: {:?}", text))?;
    Ok(naive.and_utc())
}

/// Read change records from any reader. `source` names it in log messages.
pub fn read_change_log<R: Read>(reader: R, source: &str, filter: &ChangeFilter) -> Result<Vec<RawChangeRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (n, result) in rdr.deserialize::<ChangeLogRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) if err.is_io_error() => {
                return Err(err).with_context(|| format!("Failed to read {}", source));
            }
            Err(err) => {
                // e.g. invalid UTF-8 in one field; the rest of the file is still usable
                log::warn!("Parse error in {} row {} - {}", source, n + 1, err);
                skipped += 1;
                continue;
            }
        };

        if row.activity != CONFIGURATION_ACTIVITY || !filter.accepts_database(&row.database) {
            continue;
        }

        let timestamp = match parse_timestamp(&row.date) {
            Ok(ts) => ts,
            Err(err) => {
                log::warn!("Parse error in {} row {} - {:#}", source, n + 1, err);
                skipped += 1;
                continue;
            }
        };

        if !filter.accepts_date(timestamp.date_naive()) {
            continue;
        }

        records.push(RawChangeRecord::new(timestamp, row.database, row.description));
    }

    log::info!("Loaded {} change records from {} ({} skipped)", records.len(), source, skipped);
    Ok(records)
}

/// Load change records from a CSV file
pub fn load_change_log(path: &Path, filter: &ChangeFilter) -> Result<Vec<RawChangeRecord>> {
    let file = fs::File::open(path).with_context(|| format!("Unable to open {:?}", path))?;
    read_change_log(file, &path.display().to_string(), filter)
}

/// Load and concatenate several exports
pub fn load_change_logs<P: AsRef<Path>>(paths: &[P], filter: &ChangeFilter) -> Result<Vec<RawChangeRecord>> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(load_change_log(path.as_ref(), filter)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use std::io::Write;

    const SAMPLE: &str = "\u{feff}date,database name,description,activity\n\
2024-01-01T10:00:00Z,db1,DB activated,Configuration\n\
2024-01-02 08:30:00,db2,Backup enabled,Configuration\n\
2024-01-02T09:00:00Z,db1,User logged in,Login\n\
not-a-date,db1,Backup disabled,Configuration\n\
2024-02-01T00:00:00Z,,API access enabled,Configuration\n";

    #[test]
    fn test_reads_configuration_rows() {
        let records = read_change_log(SAMPLE.as_bytes(), "sample", &ChangeFilter::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].entity, "db1");
        assert_eq!(records[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(records[1].timestamp, Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).unwrap());
        assert!(records[2].is_subscription_level());
    }

    #[test]
    fn test_invalid_utf8_row_skipped() {
        let mut input = b"date,database name,description,activity\n\
2024-01-01T10:00:00Z,db1,DB activated,Configuration\n"
            .to_vec();
        input.extend_from_slice(b"2024-01-01T11:00:00Z,db1,Bad \xff byte,Configuration\n");
        input.extend_from_slice(b"2024-01-01T12:00:00Z,db1,Backup enabled,Configuration\n");

        let records = read_change_log(input.as_slice(), "sample", &ChangeFilter::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "DB activated");
        assert_eq!(records[1].description, "Backup enabled");
    }

    #[test]
    fn test_filter_applied() {
        let filter = ChangeFilter {
            databases: vec!["db1".to_string()],
            since: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            until: Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
        };
        let records = read_change_log(SAMPLE.as_bytes(), "sample", &filter).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "DB activated");
    }

    #[test]
    fn test_parse_timestamp_offsets() {
        let ts = parse_timestamp("2024-01-01T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_load_multiple_files() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        let mut b = tempfile::NamedTempFile::new().unwrap();
        write!(a, "{}", SAMPLE).unwrap();
        write!(b, "date,database name,description,activity\n2024-03-01T00:00:00Z,db3,Module x loaded,Configuration\n").unwrap();

        let records = load_change_logs(&[a.path(), b.path()], &ChangeFilter::default()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[3].entity, "db3");
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(load_change_log(Path::new("/nonexistent/changes.csv"), &ChangeFilter::default()).is_err());
    }
}
