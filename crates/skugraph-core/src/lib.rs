//! Skugraph Core Library
//!
//! Standardizes free-text product descriptions into canonical catalog
//! entries held in a graph-structured store. This crate provides:
//! - Attribute extraction (LLM-backed, fixed JSON schema)
//! - Vocabulary normalization (fuzzy brand matching, lemmatized types)
//! - Canonical matching (exact predicate, ambiguity surfaced)
//! - Store adapters (Neo4j HTTP transaction API, in-memory)
//! - The categorization pipeline tying the stages together

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod store;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{CanonicalProduct, NormalizedAttributes, RawAttributes};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::matcher::MatchOutcome;
    pub use crate::pipeline::{CategorizationReport, Categorizer};
    pub use crate::store::{CatalogStore, MemoryStore, Neo4jStore};
}
