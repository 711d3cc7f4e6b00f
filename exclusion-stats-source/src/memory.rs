//! In-memory policy source for development and testing

use async_trait::async_trait;
use exclusion_stats_core::PolicyDocument;
use tokio::sync::RwLock;

use crate::{PolicySource, PolicySummary, SourceError};

/// Ordered in-memory policy documents
pub struct InMemoryPolicySource {
    documents: RwLock<Vec<PolicyDocument>>,
}

impl InMemoryPolicySource {
    pub fn new() -> Self {
        Self::with_documents(Vec::new())
    }

    pub fn with_documents(documents: Vec<PolicyDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Add a document, replacing any document with the same name in place
    pub async fn insert(&self, document: PolicyDocument) {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| d.name == document.name) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
    }
}

impl Default for InMemoryPolicySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicySource for InMemoryPolicySource {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn list_policies(&self) -> Result<Vec<PolicySummary>, SourceError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .map(|d| PolicySummary::named(d.name.clone()))
            .collect())
    }

    async fn fetch_document(&self, policy: &PolicySummary) -> Result<PolicyDocument, SourceError> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .find(|d| d.name == policy.name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("Policy '{}' not found", policy.name)))
    }
}
