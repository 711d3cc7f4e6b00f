//! Parser error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Malformed document for policy '{policy_name}': {reason}")]
    MalformedDocument { policy_name: String, reason: String },
}

impl ParserError {
    pub fn policy_name(&self) -> &str {
        match self {
            ParserError::MalformedDocument { policy_name, .. } => policy_name,
        }
    }
}
