// 🗂️ Legend - Rule table metadata paged into fixed-width rows

use crate::error::ConfigError;
use crate::rules::ClassificationRule;
use serde::{Deserialize, Serialize};

/// Default number of legend entries per row
pub const DEFAULT_ROW_WIDTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub title: String,
    pub icon: String,
}

/// Rows of entries in rule-table order. The last row may be short.
pub type Legend = Vec<Vec<LegendEntry>>;

/// Page the rules' (title, icon) pairs into rows of `row_width`.
pub fn paginate(rules: &[ClassificationRule], row_width: usize) -> Result<Legend, ConfigError> {
    if row_width == 0 {
        return Err(ConfigError::ZeroLegendWidth);
    }

    Ok(rules
        .chunks(row_width)
        .map(|row| {
            row.iter()
                .map(|rule| LegendEntry {
                    title: rule.title.to_string(),
                    icon: rule.icon.to_string(),
                })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Matcher, RuleEngine};

    fn table(size: usize) -> Vec<ClassificationRule> {
        (0..size)
            .map(|_| ClassificationRule::new("r", "Rule", "icon", Matcher::Always))
            .collect()
    }

    #[test]
    fn test_eighteen_rules_width_five() {
        let legend = paginate(&table(18), 5).unwrap();
        assert_eq!(legend.len(), 4);
        assert!(legend[..3].iter().all(|row| row.len() == 5));
        assert_eq!(legend[3].len(), 3);
    }

    #[test]
    fn test_exact_fit_has_no_empty_row() {
        let legend = paginate(&table(10), 5).unwrap();
        assert_eq!(legend.len(), 2);
        assert!(paginate(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_canonical_order_preserved() {
        let legend = paginate(RuleEngine::canonical().rules(), DEFAULT_ROW_WIDTH).unwrap();
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[0][0].title, "Network Change");
        assert_eq!(legend[0][1].icon, "memory");
        let last = legend.last().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "Other Change");
    }

    #[test]
    fn test_zero_width_rejected() {
        assert_eq!(paginate(&table(3), 0), Err(ConfigError::ZeroLegendWidth));
    }
}
