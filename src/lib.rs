// Change Timeline - Core Library
// Classifies control-plane configuration changes and builds per-database timelines

pub mod error;
pub mod event;
pub mod normalize;
pub mod rules;
pub mod legend;
pub mod timeline;
pub mod config;
pub mod ingest;
pub mod report;

// Re-export commonly used types
pub use error::{ConfigError, NormalizeError, RuleTableError};
pub use event::{ClassifiedEvent, Delta, Direction, RawChangeRecord};
pub use normalize::{normalize, parse_count};
pub use rules::{canonical_rules, ClassificationRule, Matcher, RuleEngine, Subject};
pub use legend::{paginate, Legend, LegendEntry, DEFAULT_ROW_WIDTH};
pub use timeline::{
    entity_list, group_by_entity, EventsByEntity, Granularity, TimelineDataset, SUBSCRIPTION_ENTITY,
};
pub use config::{ChangeFilter, ReportConfig};
pub use ingest::{load_change_log, load_change_logs, read_change_log};
pub use report::{sort_for_listing, TimelineReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
