//! Directory-backed policy source
//!
//! Treats every `*.xml` file in a directory as one policy document, named
//! after the file stem. Files are enumerated in file-name order.

use async_trait::async_trait;
use exclusion_stats_core::PolicyDocument;
use std::path::{Path, PathBuf};

use crate::{PolicySource, PolicySummary, SourceError};

const POLICY_EXTENSION: &str = "xml";

pub struct DirectoryPolicySource {
    root: PathBuf,
}

impl DirectoryPolicySource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SourceError::Configuration(format!(
                "Policy directory {} does not exist",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, policy: &PolicySummary) -> PathBuf {
        match &policy.document_url {
            Some(path) => PathBuf::from(path),
            None => self.root.join(format!("{}.{}", policy.name, POLICY_EXTENSION)),
        }
    }
}

fn is_policy_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(POLICY_EXTENSION))
        .unwrap_or(false)
}

#[async_trait]
impl PolicySource for DirectoryPolicySource {
    fn kind(&self) -> &'static str {
        "directory"
    }

    async fn list_policies(&self) -> Result<Vec<PolicySummary>, SourceError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && is_policy_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths
            .into_iter()
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                Some(PolicySummary {
                    name,
                    guid: None,
                    document_url: Some(path.display().to_string()),
                })
            })
            .collect())
    }

    async fn fetch_document(&self, policy: &PolicySummary) -> Result<PolicyDocument, SourceError> {
        let path = self.document_path(policy);
        let xml = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                SourceError::NotFound(format!("Policy file {} not found", path.display()))
            }
            _ => SourceError::Io(e),
        })?;
        tracing::debug!("Read {} bytes for policy '{}'", xml.len(), policy.name);
        Ok(PolicyDocument::new(policy.name.clone(), xml))
    }
}
