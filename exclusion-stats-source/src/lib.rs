//! Policy sources for Exclusion Stats
//!
//! Provides retrieval of raw policy documents.
//! Supports in-memory (for development), directory and AMP API backends.

pub mod directory;
pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "amp")]
pub mod amp;

pub use directory::DirectoryPolicySource;
pub use error::SourceError;
pub use memory::InMemoryPolicySource;
pub use traits::{FetchedPolicies, PolicySource, PolicySummary};

#[cfg(feature = "amp")]
pub use amp::{AmpConfig, AmpPolicySource};
