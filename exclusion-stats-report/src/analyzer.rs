//! Batch analysis of policy documents
//!
//! Parses a batch of documents, isolates failures per policy and reduces the
//! successful counts into an [`ExclusionReport`].

use chrono::Utc;
use exclusion_stats_core::{
    CoreError, ExclusionReport, PolicyDocument, PolicyExclusionCount, PolicyWarning,
    ThresholdConfig,
};
use exclusion_stats_parser::parse_policy;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::{Aggregator, ThresholdEvaluator};

/// Parallel parse limit used when none is configured
pub const DEFAULT_MAX_WORKERS: usize = 10;

type Outcome = Result<PolicyExclusionCount, PolicyWarning>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExclusionAnalyzer {
    evaluator: ThresholdEvaluator,
}

impl ExclusionAnalyzer {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self {
            evaluator: ThresholdEvaluator::new(thresholds),
        }
    }

    pub fn thresholds(&self) -> ThresholdConfig {
        self.evaluator.config()
    }

    /// Parse every document in order and build the report.
    ///
    /// A document that fails to parse is reported as a warning and left out
    /// of the tables; it never stops the rest of the batch.
    pub fn analyze(&self, documents: &[PolicyDocument]) -> ExclusionReport {
        let outcomes = documents.iter().map(parse_document).collect();
        self.build_report(outcomes)
    }

    /// Like [`ExclusionAnalyzer::analyze`], but fails with
    /// [`CoreError::EmptyInput`] when no policy could be counted.
    pub fn analyze_non_empty(
        &self,
        documents: &[PolicyDocument],
    ) -> Result<ExclusionReport, CoreError> {
        let report = self.analyze(documents);
        if report.file_exclusions.is_empty() {
            return Err(CoreError::EmptyInput);
        }
        Ok(report)
    }

    /// Parse documents on the blocking pool, at most `max_workers` at a time.
    ///
    /// Results are collected back in source order, so the report is the same
    /// as the one [`ExclusionAnalyzer::analyze`] produces.
    pub async fn analyze_concurrent(
        &self,
        documents: Vec<PolicyDocument>,
        max_workers: usize,
    ) -> ExclusionReport {
        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut handles = Vec::with_capacity(documents.len());

        for document in documents {
            let name = document.name.clone();
            let semaphore = semaphore.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                tokio::task::spawn_blocking(move || parse_document(&document)).await
            });
            handles.push((name, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) | Err(e) => Err(PolicyWarning::new(
                    name,
                    format!("Parse task failed: {}", e),
                )),
            };
            outcomes.push(outcome);
        }

        self.build_report(outcomes)
    }

    fn build_report(&self, outcomes: Vec<Outcome>) -> ExclusionReport {
        let mut records = Vec::with_capacity(outcomes.len());
        let mut warnings = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(warning) => {
                    tracing::warn!(
                        "Skipping policy '{}': {}",
                        warning.policy_name,
                        warning.message
                    );
                    warnings.push(warning);
                }
            }
        }

        let (file_exclusions, process_exclusions) = Aggregator::aggregate(&records);
        let alerts = self.evaluator.evaluate(&process_exclusions);

        tracing::info!(
            "Analyzed {} policies ({} skipped, {} alerts)",
            records.len(),
            warnings.len(),
            alerts.len()
        );

        ExclusionReport {
            file_exclusions,
            process_exclusions,
            alerts,
            warnings,
            generated_at: Utc::now(),
        }
    }
}

fn parse_document(document: &PolicyDocument) -> Outcome {
    parse_policy(&document.name, &document.xml)
        .map_err(|e| PolicyWarning::new(e.policy_name(), e.to_string()))
}
