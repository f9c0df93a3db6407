// 🏷️ Classification Rules - Rules as Data
// Ordered rule table for control-plane change descriptions. First match wins.
//
// Each rule is a matcher plus optional resolver slots (values, icon,
// direction) with static fallbacks. The last rule must be a catch-all so
// every record classifies.

use crate::error::{NormalizeError, RuleTableError};
use crate::event::{ClassifiedEvent, Delta, Direction, RawChangeRecord};
use crate::normalize::{normalize, parse_count};
use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// MATCH SUBJECT
// ============================================================================

/// The description under test, with its lowercase form computed once and
/// the extracted delta once the rule's value resolver has run.
#[derive(Debug, Clone)]
pub struct Subject<'a> {
    pub text: &'a str,
    pub lower: String,
    pub delta: Option<Delta>,
}

impl<'a> Subject<'a> {
    pub fn new(text: &'a str) -> Self {
        Subject {
            text,
            lower: text.to_lowercase(),
            delta: None,
        }
    }

    /// Case-insensitive substring test
    pub fn contains(&self, needle: &str) -> bool {
        self.lower.contains(&needle.to_lowercase())
    }

    /// Case-insensitive prefix test
    pub fn starts_with(&self, needle: &str) -> bool {
        self.lower.starts_with(&needle.to_lowercase())
    }
}

// ============================================================================
// MATCHER
// ============================================================================

/// How a rule recognises a description. Everything except `Regex` compares
/// case-insensitively; canonical regexes carry `(?i)`.
#[derive(Debug, Clone)]
pub enum Matcher {
    Regex(Regex),
    /// Whole description equals one of these
    Exact(&'static [&'static str]),
    Prefix(&'static str),
    Contains(&'static str),
    ContainsAny(&'static [&'static str]),
    Always,
}

impl Matcher {
    pub fn matches(&self, subject: &Subject) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(subject.text),
            Matcher::Exact(options) => options.iter().any(|o| subject.lower == o.to_lowercase()),
            Matcher::Prefix(prefix) => subject.starts_with(prefix),
            Matcher::Contains(needle) => subject.contains(needle),
            Matcher::ContainsAny(needles) => needles.iter().any(|n| subject.contains(n)),
            Matcher::Always => true,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Matcher::Always)
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

pub type ValuesFn = fn(&Subject) -> Result<Delta, NormalizeError>;
pub type IconFn = fn(&Subject) -> &'static str;
pub type DirectionFn = fn(&Subject) -> Direction;

#[derive(Debug, Clone)]
pub struct ClassificationRule {
    /// Rule ID for tracking
    pub id: &'static str,

    /// Legend title, copied onto every event the rule matches
    pub title: &'static str,

    /// Icon used when no icon resolver is set
    pub icon: &'static str,

    /// Direction used when no direction resolver is set
    pub direction: Direction,

    pub matcher: Matcher,

    pub extract_values: Option<ValuesFn>,
    pub resolve_icon: Option<IconFn>,
    pub resolve_direction: Option<DirectionFn>,
}

impl ClassificationRule {
    pub fn new(id: &'static str, title: &'static str, icon: &'static str, matcher: Matcher) -> Self {
        ClassificationRule {
            id,
            title,
            icon,
            direction: Direction::NotApplicable,
            matcher,
            extract_values: None,
            resolve_icon: None,
            resolve_direction: None,
        }
    }

    /// Builder pattern: static direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Builder pattern: direction computed from the description (and delta)
    pub fn direction_by(mut self, f: DirectionFn) -> Self {
        self.resolve_direction = Some(f);
        self
    }

    /// Builder pattern: icon computed from the description
    pub fn icon_by(mut self, f: IconFn) -> Self {
        self.resolve_icon = Some(f);
        self
    }

    /// Builder pattern: numeric from/to extraction
    pub fn values_by(mut self, f: ValuesFn) -> Self {
        self.extract_values = Some(f);
        self
    }

    pub fn matches(&self, subject: &Subject) -> bool {
        self.matcher.matches(subject)
    }
}

// ============================================================================
// CANONICAL TABLE
// ============================================================================

static SUBNET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Source ip/subnet (?:deleted|added). Ip/subnet - ([\d./]+)").expect("subnet pattern")
});

static SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Memory Limit changed from ([\d.]+) ([a-zA-Z]+) to ([\d.]+) ([a-zA-Z]+)").expect("size pattern")
});

static THROUGHPUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Database Throughput was changed from (\d+) ops/sec to (\d+) ops/sec").expect("throughput pattern")
});

fn up_if(subject: &Subject, needle: &str) -> Direction {
    if subject.contains(needle) {
        Direction::Up
    } else {
        Direction::Down
    }
}

fn memory_values(subject: &Subject) -> Result<Delta, NormalizeError> {
    let caps = SIZE_RE
        .captures(subject.text)
        .ok_or_else(|| NormalizeError::MissingValues(subject.text.to_string()))?;
    let from = normalize(&caps[1], &caps[2])?;
    let to = normalize(&caps[3], &caps[4])?;
    Ok(Delta::new(from, to))
}

fn throughput_values(subject: &Subject) -> Result<Delta, NormalizeError> {
    let caps = THROUGHPUT_RE
        .captures(subject.text)
        .ok_or_else(|| NormalizeError::MissingValues(subject.text.to_string()))?;
    Ok(Delta::new(parse_count(&caps[1])?, parse_count(&caps[2])?))
}

/// Build the canonical rule table, most specific first.
pub fn canonical_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new(
            "network",
            "Network Change",
            "sign-intersection-side",
            Matcher::Regex(SUBNET_RE.clone()),
        )
        .direction_by(|s| if s.contains("deleted") { Direction::Down } else { Direction::Up }),
        ClassificationRule::new("memory-limit", "Memory Limit Change", "memory", Matcher::Regex(SIZE_RE.clone()))
            .values_by(memory_values)
            .direction_by(|s| match s.delta {
                Some(d) if d.to > d.from => Direction::Up,
                _ => Direction::Down,
            }),
        ClassificationRule::new(
            "db-lifecycle",
            "Database Activation/Deletions",
            "database-fill",
            Matcher::Exact(&["DB activated", "DB deleted"]),
        )
        .icon_by(|s| {
            if s.lower == "db activated" {
                "database-fill-check"
            } else {
                "database-fill-slash"
            }
        })
        .direction_by(|s| {
            if s.lower == "db activated" {
                Direction::Up
            } else {
                Direction::Down
            }
        }),
        ClassificationRule::new(
            "db-rename",
            "Database Change",
            "database-fill-check",
            Matcher::Prefix("db name changed"),
        ),
        ClassificationRule::new(
            "persistence",
            "Persistence Change",
            "shield-exclamation",
            Matcher::Contains("persistence"),
        )
        .direction_by(|s| if s.contains("disabled") { Direction::Down } else { Direction::Up }),
        ClassificationRule::new(
            "clustering",
            "Clustering enabled",
            "hdd-rack-fill",
            Matcher::Contains("Cluster enabled"),
        )
        .with_direction(Direction::Up),
        ClassificationRule::new(
            "replication",
            "Replication Change",
            "share-fill",
            Matcher::Contains("replication policy"),
        )
        .direction_by(|s| up_if(s, "to enabled")),
        ClassificationRule::new("sync-source", "Sync Change", "symmetry-horizontal", Matcher::Contains("sync source"))
            .direction_by(|s| up_if(s, "added")),
        ClassificationRule::new(
            "alerts",
            "Alerts",
            "envelope",
            Matcher::ContainsAny(&["sync lag is changed", "connections limit is changed", "alert is changed"]),
        )
        .direction_by(|s| up_if(s, "active - true")),
        ClassificationRule::new("backup", "Backups", "cloud-download", Matcher::Prefix("backup")).direction_by(|s| {
            if s.contains("enabled") {
                Direction::Up
            } else if s.contains("disabled") {
                Direction::Down
            } else {
                Direction::NotApplicable
            }
        }),
        ClassificationRule::new("module", "Modules", "code-square", Matcher::Prefix("module")).direction_by(|s| {
            if s.contains("loaded") {
                Direction::Up
            } else {
                Direction::NotApplicable
            }
        }),
        ClassificationRule::new("cluster-rule", "Cluster Rules", "regex", Matcher::Contains("Cluster rule"))
            .direction_by(|s| up_if(s, "added")),
        ClassificationRule::new(
            "throughput",
            "Throughput Change",
            "speedometer",
            Matcher::Regex(THROUGHPUT_RE.clone()),
        )
        .values_by(throughput_values)
        .direction_by(|s| match s.delta {
            Some(d) => Direction::between(d.from, d.to),
            None => Direction::NotApplicable,
        }),
        ClassificationRule::new("eviction", "Eviction", "door-open", Matcher::Prefix("eviction policy changed")),
        ClassificationRule::new(
            "default-password",
            "Default Password Change",
            "lock-fill",
            Matcher::Prefix("default redis user"),
        ),
        ClassificationRule::new("vpc-peering", "VPC Peering", "link-45deg", Matcher::Prefix("vpc peering"))
            .direction_by(|s| {
                if s.contains("delete") {
                    Direction::Down
                } else if s.contains("initiated") {
                    Direction::Up
                } else {
                    Direction::NotApplicable
                }
            }),
        ClassificationRule::new(
            "infrastructure",
            "Infrastructure",
            "cloud-plus",
            Matcher::Contains("added infrastructure"),
        )
        .with_direction(Direction::Up),
        ClassificationRule::new("api-key", "API Key", "key", Matcher::Contains("api secret key"))
            .direction_by(|s| up_if(s, "assigned")),
        ClassificationRule::new("api-access", "API Access", "key-fill", Matcher::Contains("api access"))
            .direction_by(|s| up_if(s, "enabled")),
        ClassificationRule::new("oss-cluster", "OSS Cluster API", "boxes", Matcher::Contains("oss cluster"))
            .with_direction(Direction::Up),
        ClassificationRule::new("other", "Other Change", "info-circle-fill", Matcher::Always),
    ]
}

static CANONICAL: Lazy<RuleEngine> =
    Lazy::new(|| RuleEngine::from_rules(canonical_rules()).expect("canonical rule table ends with a catch-all"));

// ============================================================================
// RULE ENGINE
// ============================================================================

/// Matching dispatcher over an ordered rule table.
///
/// Read-only after construction, so one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<ClassificationRule>,
}

impl RuleEngine {
    /// Create engine from a list of rules, keeping their order.
    ///
    /// The table must end with an `Always` rule.
    pub fn from_rules(rules: Vec<ClassificationRule>) -> Result<Self, RuleTableError> {
        match rules.last() {
            None => Err(RuleTableError::Empty),
            Some(last) if !last.matcher.is_catch_all() => Err(RuleTableError::MissingCatchAll(last.id.to_string())),
            Some(_) => Ok(RuleEngine { rules }),
        }
    }

    /// Shared engine over the canonical table
    pub fn canonical() -> &'static RuleEngine {
        &CANONICAL
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Classify one record. Pure: depends only on the description text.
    pub fn classify(&self, record: &RawChangeRecord) -> ClassifiedEvent {
        let mut subject = Subject::new(&record.description);

        // from_rules guarantees a non-empty table ending in a catch-all
        let last = self.rules.len() - 1;
        let rule = self
            .rules
            .iter()
            .find(|r| r.matches(&subject))
            .unwrap_or(&self.rules[last]);

        let mut degraded = false;
        if let Some(extract) = rule.extract_values {
            match extract(&subject) {
                Ok(delta) => subject.delta = Some(delta),
                Err(err) => {
                    log::warn!("unable to extract values from '{}' ({}): {}", record.description, rule.id, err);
                    subject.delta = Some(Delta::default());
                    degraded = true;
                }
            }
        }

        let icon = match rule.resolve_icon {
            Some(f) => f(&subject),
            None => rule.icon,
        };

        let direction = match rule.resolve_direction {
            _ if degraded => Direction::NotApplicable,
            Some(f) => f(&subject),
            None => rule.direction,
        };

        ClassifiedEvent {
            timestamp: record.timestamp,
            entity: record.entity.clone(),
            description: record.description.clone(),
            rule_id: rule.id.to_string(),
            title: rule.title.to_string(),
            icon: icon.to_string(),
            direction,
            delta: subject.delta,
        }
    }

    /// Classify a batch, preserving input order.
    pub fn classify_all(&self, records: &[RawChangeRecord]) -> Vec<ClassifiedEvent> {
        records.iter().map(|r| self.classify(r)).collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        RuleEngine::canonical().clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
