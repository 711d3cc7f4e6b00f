//! Service configuration read from environment variables

use exclusion_stats_core::{CoreError, ThresholdConfig};
use exclusion_stats_report::DEFAULT_MAX_WORKERS;
use exclusion_stats_source::AmpConfig;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Threshold(#[from] CoreError),
}

/// Where the service reads policy documents from
#[derive(Debug, Clone)]
pub enum SourceSettings {
    Memory,
    Directory(PathBuf),
    Amp(AmpConfig),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub source: SourceSettings,
    pub thresholds: ThresholdConfig,
    pub max_workers: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 8080u16)?;

        let source = match lookup("SOURCE_TYPE").as_deref().unwrap_or("memory") {
            "memory" => SourceSettings::Memory,
            "directory" => {
                let dir = lookup("POLICY_DIR").ok_or(ConfigError::Missing("POLICY_DIR"))?;
                SourceSettings::Directory(PathBuf::from(dir))
            }
            "amp" => SourceSettings::Amp(AmpConfig {
                host: lookup("AMP_HOST").ok_or(ConfigError::Missing("AMP_HOST"))?,
                client_id: lookup("AMP_CLIENT_ID").ok_or(ConfigError::Missing("AMP_CLIENT_ID"))?,
                api_key: lookup("AMP_API_KEY").ok_or(ConfigError::Missing("AMP_API_KEY"))?,
                limit: parse_or(&lookup, "AMP_POLICY_LIMIT", AmpConfig::DEFAULT_LIMIT)?,
            }),
            other => {
                return Err(ConfigError::Invalid {
                    key: "SOURCE_TYPE",
                    value: other.to_string(),
                    reason: "expected memory, directory or amp".to_string(),
                })
            }
        };

        let thresholds = ThresholdConfig::new(
            parse_or(&lookup, "EXCLUSION_LIMIT", ThresholdConfig::DEFAULT_LIMIT)?,
            parse_or(
                &lookup,
                "EXCLUSION_CAUTION_BAND",
                ThresholdConfig::DEFAULT_CAUTION_BAND,
            )?,
        )?;

        let max_workers = parse_or(&lookup, "MAX_WORKERS", DEFAULT_MAX_WORKERS)?;

        Ok(Self {
            host,
            port,
            source,
            thresholds,
            max_workers,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
        None => Ok(default),
    }
}
