//! Application state shared across handlers

use exclusion_stats_core::{ExclusionReport, ThresholdConfig};
use exclusion_stats_report::{ExclusionAnalyzer, DEFAULT_MAX_WORKERS};
use exclusion_stats_source::{
    AmpPolicySource, DirectoryPolicySource, InMemoryPolicySource, PolicySource, SourceError,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{AppConfig, SourceSettings};
use crate::ApiError;

/// Shared application state
pub struct AppState {
    pub source: Arc<dyn PolicySource>,
    pub analyzer: ExclusionAnalyzer,
    pub max_workers: usize,
    pub cached_report: Arc<RwLock<Option<ExclusionReport>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_source(Arc::new(InMemoryPolicySource::new()))
    }

    /// Create with a custom policy source and default thresholds
    pub fn with_source(source: Arc<dyn PolicySource>) -> Self {
        Self::with_thresholds(source, ThresholdConfig::default(), DEFAULT_MAX_WORKERS)
    }

    pub fn with_thresholds(
        source: Arc<dyn PolicySource>,
        thresholds: ThresholdConfig,
        max_workers: usize,
    ) -> Self {
        Self {
            source,
            analyzer: ExclusionAnalyzer::new(thresholds),
            max_workers,
            cached_report: Arc::new(RwLock::new(None)),
        }
    }

    /// Build the state described by the service configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let source: Arc<dyn PolicySource> = match &config.source {
            SourceSettings::Memory => {
                tracing::info!("Initializing in-memory policy source...");
                Arc::new(InMemoryPolicySource::new())
            }
            SourceSettings::Directory(dir) => {
                tracing::info!("Reading policies from {}", dir.display());
                Arc::new(DirectoryPolicySource::new(dir.clone())?)
            }
            SourceSettings::Amp(amp) => {
                tracing::info!("Connecting to AMP API at {}", amp.host);
                Arc::new(AmpPolicySource::new(amp.clone())?)
            }
        };
        Ok(Self::with_thresholds(
            source,
            config.thresholds,
            config.max_workers,
        ))
    }

    /// Fetch every policy from the source, analyze them and cache the report
    pub async fn refresh_report(&self) -> Result<ExclusionReport, ApiError> {
        let fetched = self.source.fetch_all(self.max_workers).await?;
        let mut report = self
            .analyzer
            .analyze_concurrent(fetched.documents, self.max_workers)
            .await;

        let mut warnings = fetched.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;

        let mut cache = self.cached_report.write().await;
        *cache = Some(report.clone());

        tracing::info!(
            "Rebuilt exclusion report with {} policies from {} source",
            report.policy_count(),
            self.source.kind()
        );
        Ok(report)
    }

    /// Cached report, built from the source on first use
    pub async fn report(&self) -> Result<ExclusionReport, ApiError> {
        if let Some(report) = self.cached_report.read().await.as_ref() {
            return Ok(report.clone());
        }
        self.refresh_report().await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
