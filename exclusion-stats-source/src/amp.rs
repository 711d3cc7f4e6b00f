//! AMP for Endpoints policy source
//!
//! Lists policies through the management API and downloads each policy's
//! XML definition. Requests are authenticated with HTTP basic auth using the
//! API client id and key.

use async_trait::async_trait;
use exclusion_stats_core::PolicyDocument;
use reqwest::{Client, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::{PolicySource, PolicySummary, SourceError};

/// AMP API connection settings
#[derive(Debug, Clone)]
pub struct AmpConfig {
    /// API base URL, e.g. `https://api.amp.cisco.com/v1/`
    pub host: String,
    pub client_id: String,
    pub api_key: String,
    /// Maximum number of policies to request
    pub limit: u32,
}

impl AmpConfig {
    pub const DEFAULT_LIMIT: u32 = 500;
}

#[derive(Debug, Deserialize)]
struct PolicyListResponse {
    data: Vec<AmpPolicy>,
}

#[derive(Debug, Deserialize)]
struct AmpPolicy {
    name: String,
    guid: Option<Uuid>,
    links: AmpPolicyLinks,
}

#[derive(Debug, Deserialize)]
struct AmpPolicyLinks {
    policy: String,
}

impl From<AmpPolicy> for PolicySummary {
    fn from(policy: AmpPolicy) -> Self {
        Self {
            name: policy.name,
            guid: policy.guid,
            document_url: Some(policy.links.policy),
        }
    }
}

pub struct AmpPolicySource {
    client: Client,
    config: AmpConfig,
}

impl AmpPolicySource {
    pub fn new(mut config: AmpConfig) -> Result<Self, SourceError> {
        if config.host.trim().is_empty() {
            return Err(SourceError::Configuration("AMP host is empty".to_string()));
        }
        if config.client_id.is_empty() {
            return Err(SourceError::Configuration(
                "AMP client id is empty".to_string(),
            ));
        }
        if !config.host.ends_with('/') {
            config.host.push('/');
        }
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn policies_url(&self) -> String {
        format!("{}policies?limit={}", self.config.host, self.config.limit)
    }

    fn document_url(policy: &PolicySummary) -> Result<String, SourceError> {
        policy
            .document_url
            .as_ref()
            .map(|link| format!("{}.xml", link))
            .ok_or_else(|| {
                SourceError::NotFound(format!("Policy '{}' has no document link", policy.name))
            })
    }

    async fn get(&self, url: &str) -> Result<Response, SourceError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.client_id, Some(&self.config.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Found HTTP {} for {}", status, url);
            return Err(SourceError::Http(format!("HTTP {} for {}", status, url)));
        }
        tracing::debug!("Found HTTP {} for {}", status, url);
        Ok(response)
    }
}

fn parse_policy_list(body: &[u8]) -> Result<Vec<PolicySummary>, SourceError> {
    let list: PolicyListResponse = serde_json::from_slice(body)?;
    Ok(list.data.into_iter().map(PolicySummary::from).collect())
}

#[async_trait]
impl PolicySource for AmpPolicySource {
    fn kind(&self) -> &'static str {
        "amp"
    }

    async fn list_policies(&self) -> Result<Vec<PolicySummary>, SourceError> {
        let url = self.policies_url();
        let body = self.get(&url).await?.bytes().await?;
        parse_policy_list(&body)
    }

    async fn fetch_document(&self, policy: &PolicySummary) -> Result<PolicyDocument, SourceError> {
        let url = Self::document_url(policy)?;
        let xml = self.get(&url).await?.bytes().await?;
        Ok(PolicyDocument::new(policy.name.clone(), xml.to_vec()))
    }
}
