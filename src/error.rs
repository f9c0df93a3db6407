// ⚠️ Error Types
// Per-record failures stay recoverable; table and config problems fail fast.

use thiserror::Error;

/// Failure while turning "<magnitude> <unit>" text into an integer.
///
/// Always recoverable: the dispatcher downgrades the event instead of
/// aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("magnitude '{0}' is not numeric")]
    NotNumeric(String),

    #[error("magnitude '{0}' is out of range")]
    OutOfRange(String),

    #[error("expected values missing from '{0}'")]
    MissingValues(String),
}

/// Rule table misconfiguration. The table is static configuration, so this
/// is raised at startup rather than per record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleTableError {
    #[error("rule table is empty")]
    Empty,

    #[error("last rule '{0}' is not a catch-all")]
    MissingCatchAll(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("legend row width must be greater than zero")]
    ZeroLegendWidth,

    #[error("date range is inverted: {since} is after {until}")]
    InvertedRange { since: String, until: String },
}
