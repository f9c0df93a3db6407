// ⚙️ Report Configuration
// Plain settings struct the binary fills from the command line.

use crate::error::ConfigError;
use crate::legend::DEFAULT_ROW_WIDTH;
use crate::timeline::Granularity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Operator-supplied heading, passed through to the renderer
    pub title: String,

    pub granularity: Granularity,

    /// Legend entries per row
    pub legend_width: usize,

    #[serde(default)]
    pub filter: ChangeFilter,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: String::new(),
            granularity: Granularity::Daily,
            legend_width: DEFAULT_ROW_WIDTH,
            filter: ChangeFilter::default(),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.legend_width == 0 {
            return Err(ConfigError::ZeroLegendWidth);
        }
        self.filter.validate()
    }
}

/// Record selection applied before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    /// Only these databases. Empty keeps everything.
    #[serde(default)]
    pub databases: Vec<String>,

    /// Inclusive date bounds (UTC calendar dates)
    #[serde(default)]
    pub since: Option<NaiveDate>,
    #[serde(default)]
    pub until: Option<NaiveDate>,
}

impl ChangeFilter {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.since, self.until) {
            (Some(since), Some(until)) if since > until => Err(ConfigError::InvertedRange {
                since: since.to_string(),
                until: until.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn accepts_database(&self, database: &str) -> bool {
        self.databases.is_empty() || self.databases.iter().any(|d| d == database)
    }

    pub fn accepts_date(&self, date: NaiveDate) -> bool {
        self.since.map_or(true, |since| date >= since) && self.until.map_or(true, |until| date <= until)
    }
}
