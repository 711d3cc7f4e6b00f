//! Error types for the core crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No policies were supplied")]
    EmptyInput,

    #[error("Invalid threshold configuration: {0}")]
    InvalidThreshold(String),
}
