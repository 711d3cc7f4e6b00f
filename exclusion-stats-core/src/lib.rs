//! Core domain models for Exclusion Stats
//!
//! This crate contains the shared data structures used across
//! the exclusion engine: ExclusionRule, PolicyExclusionCount,
//! the summary tables and ThresholdAlert.

pub mod error;
pub mod models;
pub mod table;

pub use error::CoreError;
pub use models::*;
pub use table::{Columns, FileExclusionRow, ProcessExclusionRow, SummaryTable, TableRow};
