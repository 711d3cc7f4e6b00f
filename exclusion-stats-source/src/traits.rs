//! Source trait defining where policy documents come from

use async_trait::async_trait;
use exclusion_stats_core::{PolicyDocument, PolicyWarning};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SourceError;

/// A policy as enumerated by a source, before its document is fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySummary {
    pub name: String,
    pub guid: Option<Uuid>,
    /// Location of the policy document, when the source has one
    pub document_url: Option<String>,
}

impl PolicySummary {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: None,
            document_url: None,
        }
    }
}

/// Documents fetched from a source, plus the policies that could not be
#[derive(Debug, Default)]
pub struct FetchedPolicies {
    pub documents: Vec<PolicyDocument>,
    pub warnings: Vec<PolicyWarning>,
}

/// Trait for policy retrieval
#[async_trait]
pub trait PolicySource: Send + Sync {
    /// Short name used in logs
    fn kind(&self) -> &'static str;

    /// List all policies, in the source's enumeration order
    async fn list_policies(&self) -> Result<Vec<PolicySummary>, SourceError>;

    /// Fetch the raw document of one listed policy
    async fn fetch_document(&self, policy: &PolicySummary)
        -> Result<PolicyDocument, SourceError>;

    /// Fetch every listed policy, at most `max_workers` downloads at a time.
    ///
    /// Documents come back in enumeration order. Only a failure to list is
    /// fatal; a policy whose document cannot be fetched becomes a warning.
    async fn fetch_all(&self, max_workers: usize) -> Result<FetchedPolicies, SourceError> {
        let policies = self.list_policies().await?;
        tracing::info!(
            "Retrieved list of {} policies from {} source",
            policies.len(),
            self.kind()
        );

        let results: Vec<(PolicySummary, Result<PolicyDocument, SourceError>)> =
            stream::iter(policies)
                .map(move |policy| async move {
                    let result = self.fetch_document(&policy).await;
                    (policy, result)
                })
                .buffered(max_workers.max(1))
                .collect()
                .await;

        let mut fetched = FetchedPolicies::default();
        for (policy, result) in results {
            match result {
                Ok(document) => fetched.documents.push(document),
                Err(e) => {
                    tracing::warn!("Failed to fetch policy '{}': {}", policy.name, e);
                    fetched
                        .warnings
                        .push(PolicyWarning::new(policy.name, e.to_string()));
                }
            }
        }
        Ok(fetched)
    }
}
