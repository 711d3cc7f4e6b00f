//! Core domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::table::{FileExclusionRow, ProcessExclusionRow, SummaryTable};
use crate::CoreError;

/// Category of a single exclusion rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionCategory {
    Path,
    FileExtension,
    Wildcard,
    ProcessFileScan,
    ProcessSystemProtection,
    ProcessMaliciousActivity,
}

impl ExclusionCategory {
    pub fn is_process(&self) -> bool {
        matches!(
            self,
            ExclusionCategory::ProcessFileScan
                | ExclusionCategory::ProcessSystemProtection
                | ExclusionCategory::ProcessMaliciousActivity
        )
    }
}

/// One exclusion extracted from a policy document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub category: ExclusionCategory,
    /// Only ever set for process categories
    pub applies_to_child_processes: bool,
}

impl ExclusionRule {
    pub fn file(category: ExclusionCategory) -> Self {
        Self {
            category,
            applies_to_child_processes: false,
        }
    }

    pub fn process(category: ExclusionCategory, applies_to_child_processes: bool) -> Self {
        Self {
            category,
            applies_to_child_processes: category.is_process() && applies_to_child_processes,
        }
    }
}

/// Exclusion counters for one policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyExclusionCount {
    pub policy_name: String,
    pub path_count: u64,
    pub file_extension_count: u64,
    pub wildcard_count: u64,
    pub file_scan_count: u64,
    pub system_protection_count: u64,
    pub malicious_activity_count: u64,
    /// Process exclusions that also cover child processes
    pub child_process_count: u64,
}

impl PolicyExclusionCount {
    pub fn new(policy_name: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            ..Default::default()
        }
    }

    /// Fold one rule into the counters
    pub fn record(&mut self, rule: &ExclusionRule) {
        match rule.category {
            ExclusionCategory::Path => self.path_count += 1,
            ExclusionCategory::FileExtension => self.file_extension_count += 1,
            ExclusionCategory::Wildcard => self.wildcard_count += 1,
            ExclusionCategory::ProcessFileScan => self.file_scan_count += 1,
            ExclusionCategory::ProcessSystemProtection => self.system_protection_count += 1,
            ExclusionCategory::ProcessMaliciousActivity => self.malicious_activity_count += 1,
        }
        if rule.applies_to_child_processes {
            self.child_process_count += 1;
        }
    }

    pub fn total_file_exclusions(&self) -> u64 {
        self.path_count + self.file_extension_count + self.wildcard_count
    }

    pub fn total_process_exclusions(&self) -> u64 {
        self.file_scan_count + self.system_protection_count + self.malicious_activity_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_file_exclusions() == 0 && self.total_process_exclusions() == 0
    }
}

/// Ceiling applied to process exclusion totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Maximum process exclusions the platform accepts
    pub limit: u64,
    /// Width of the caution band below the limit
    pub caution_band: u64,
}

impl ThresholdConfig {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const DEFAULT_CAUTION_BAND: u64 = 5;

    pub fn new(limit: u64, caution_band: u64) -> Result<Self, CoreError> {
        if limit == 0 {
            return Err(CoreError::InvalidThreshold(
                "limit must be greater than zero".to_string(),
            ));
        }
        if caution_band > limit {
            return Err(CoreError::InvalidThreshold(format!(
                "caution band {} is wider than the limit {}",
                caution_band, limit
            )));
        }
        Ok(Self {
            limit,
            caution_band,
        })
    }

    /// Lowest total that raises a caution
    pub fn caution_floor(&self) -> u64 {
        self.limit.saturating_sub(self.caution_band)
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            caution_band: Self::DEFAULT_CAUTION_BAND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Caution,
    Warning,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Caution => f.write_str("CAUTION"),
            AlertLevel::Warning => f.write_str("WARNING"),
        }
    }
}

/// A policy whose process exclusions are near or over the limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdAlert {
    pub policy_name: String,
    pub level: AlertLevel,
    pub observed_count: u64,
    pub limit: u64,
}

impl ThresholdAlert {
    pub fn message(&self) -> String {
        match self.level {
            AlertLevel::Caution => format!(
                "\"{}\" has {} process exclusions, close to the maximum of {}",
                self.policy_name, self.observed_count, self.limit
            ),
            AlertLevel::Warning => format!(
                "\"{}\" has {} process exclusions, exceeding the maximum of {}",
                self.policy_name, self.observed_count, self.limit
            ),
        }
    }
}

impl fmt::Display for ThresholdAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message())
    }
}

/// Raw policy definition as retrieved from a policy source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub name: String,
    pub xml: Vec<u8>,
}

impl PolicyDocument {
    pub fn new(name: impl Into<String>, xml: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            xml: xml.into(),
        }
    }
}

/// A policy that was skipped during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyWarning {
    pub policy_name: String,
    pub message: String,
}

impl PolicyWarning {
    pub fn new(policy_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            message: message.into(),
        }
    }
}

/// Everything a run produces for the reporting layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionReport {
    pub file_exclusions: SummaryTable<FileExclusionRow>,
    pub process_exclusions: SummaryTable<ProcessExclusionRow>,
    pub alerts: Vec<ThresholdAlert>,
    pub warnings: Vec<PolicyWarning>,
    pub generated_at: DateTime<Utc>,
}

impl ExclusionReport {
    pub fn policy_count(&self) -> usize {
        self.file_exclusions.rows.len()
    }
}

/// One policy submitted inline for analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyPayload {
    pub name: String,
    pub xml: String,
}

/// Request to analyze a batch of policy documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub policies: Vec<PolicyPayload>,
    /// Reject the request when no policy could be parsed
    #[serde(default)]
    pub require_policies: bool,
}

impl AnalyzeRequest {
    pub fn into_documents(self) -> Vec<PolicyDocument> {
        self.policies
            .into_iter()
            .map(|p| PolicyDocument::new(p.name, p.xml))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_each_category() {
        let mut counts = PolicyExclusionCount::new("policy");
        counts.record(&ExclusionRule::file(ExclusionCategory::Path));
        counts.record(&ExclusionRule::file(ExclusionCategory::Wildcard));
        counts.record(&ExclusionRule::process(ExclusionCategory::ProcessFileScan, true));
        counts.record(&ExclusionRule::process(
            ExclusionCategory::ProcessMaliciousActivity,
            false,
        ));

        assert_eq!(counts.path_count, 1);
        assert_eq!(counts.wildcard_count, 1);
        assert_eq!(counts.file_scan_count, 1);
        assert_eq!(counts.malicious_activity_count, 1);
        assert_eq!(counts.child_process_count, 1);
        assert_eq!(counts.total_file_exclusions(), 2);
        assert_eq!(counts.total_process_exclusions(), 2);
    }

    #[test]
    fn test_child_flag_ignored_for_file_categories() {
        let rule = ExclusionRule::process(ExclusionCategory::Path, true);
        assert!(!rule.applies_to_child_processes);
    }

    #[test]
    fn test_new_count_is_empty() {
        let counts = PolicyExclusionCount::new("empty");
        assert!(counts.is_empty());
        assert_eq!(counts.child_process_count, 0);
    }

    #[test]
    fn test_threshold_config_validation() {
        assert!(ThresholdConfig::new(0, 0).is_err());
        assert!(ThresholdConfig::new(10, 11).is_err());
        let config = ThresholdConfig::new(100, 5).unwrap();
        assert_eq!(config.caution_floor(), 95);
        assert_eq!(ThresholdConfig::default(), config);
    }

    #[test]
    fn test_alert_display() {
        let alert = ThresholdAlert {
            policy_name: "NAME - Standard".to_string(),
            level: AlertLevel::Warning,
            observed_count: 110,
            limit: 100,
        };
        assert_eq!(
            alert.to_string(),
            "WARNING: \"NAME - Standard\" has 110 process exclusions, exceeding the maximum of 100"
        );
    }
}
