//! Exclusion Stats reporting
//!
//! Reduces per-policy exclusion counts into summary tables, checks process
//! exclusion totals against the configured ceiling and renders the results
//! as delimited text.

pub mod aggregator;
pub mod analyzer;
pub mod export;
pub mod threshold;

pub use aggregator::{Aggregator, FileExclusionTable, ProcessExclusionTable};
pub use analyzer::{ExclusionAnalyzer, DEFAULT_MAX_WORKERS};
pub use threshold::ThresholdEvaluator;
