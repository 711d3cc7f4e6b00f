//! Process exclusion ceiling checks

use exclusion_stats_core::{AlertLevel, ThresholdAlert, ThresholdConfig};

use crate::aggregator::ProcessExclusionTable;

/// Flags policies whose process exclusions approach or exceed the limit
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator {
    config: ThresholdConfig,
}

impl ThresholdEvaluator {
    pub fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ThresholdConfig {
        self.config
    }

    /// Level for a single total: warning strictly above the limit, caution
    /// from `limit - caution_band` up to and including the limit.
    pub fn level_for(&self, total: u64) -> Option<AlertLevel> {
        if total > self.config.limit {
            Some(AlertLevel::Warning)
        } else if total >= self.config.caution_floor() {
            Some(AlertLevel::Caution)
        } else {
            None
        }
    }

    /// At most one alert per row, in table order
    pub fn evaluate(&self, table: &ProcessExclusionTable) -> Vec<ThresholdAlert> {
        table
            .rows
            .iter()
            .filter_map(|row| {
                self.level_for(row.total).map(|level| ThresholdAlert {
                    policy_name: row.policy_name.clone(),
                    level,
                    observed_count: row.total,
                    limit: self.config.limit,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exclusion_stats_core::{ProcessExclusionRow, SummaryTable};
    use rstest::rstest;

    fn row(name: &str, file_scan: u64) -> ProcessExclusionRow {
        ProcessExclusionRow {
            policy_name: name.to_string(),
            file_scan,
            total: file_scan,
            ..Default::default()
        }
    }

    #[rstest]
    #[case(0, None)]
    #[case(94, None)]
    #[case(95, Some(AlertLevel::Caution))]
    #[case(100, Some(AlertLevel::Caution))]
    #[case(101, Some(AlertLevel::Warning))]
    #[case(250, Some(AlertLevel::Warning))]
    fn test_default_boundaries(#[case] total: u64, #[case] expected: Option<AlertLevel>) {
        let evaluator = ThresholdEvaluator::default();
        assert_eq!(evaluator.level_for(total), expected);
    }

    #[test]
    fn test_custom_config() {
        let evaluator = ThresholdEvaluator::new(ThresholdConfig::new(10, 10).unwrap());
        assert_eq!(evaluator.level_for(0), Some(AlertLevel::Caution));
        assert_eq!(evaluator.level_for(11), Some(AlertLevel::Warning));
    }

    #[test]
    fn test_evaluate_preserves_order() {
        let table = SummaryTable::from_rows(vec![
            row("over", 110),
            row("quiet", 2),
            row("near", 97),
            row("at-limit", 100),
        ]);
        let alerts = ThresholdEvaluator::default().evaluate(&table);

        let summary: Vec<(&str, AlertLevel)> = alerts
            .iter()
            .map(|a| (a.policy_name.as_str(), a.level))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("over", AlertLevel::Warning),
                ("near", AlertLevel::Caution),
                ("at-limit", AlertLevel::Caution),
            ]
        );
        assert!(alerts.iter().all(|a| a.limit == 100));
        assert_eq!(alerts[0].observed_count, 110);
    }
}
