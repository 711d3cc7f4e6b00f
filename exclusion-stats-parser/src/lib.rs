//! Parser for endpoint policy documents
//!
//! This crate walks a policy's XML definition, classifies every
//! exclusion it finds and folds them into per-policy counters.

pub mod classifier;
pub mod error;
pub mod parser;

pub use classifier::classify;
pub use error::ParserError;
pub use parser::parse_policy;
