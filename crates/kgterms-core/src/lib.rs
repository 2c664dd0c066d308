//! kgterms Core Library
//!
//! This crate provides the core functionality for kgterms, including:
//! - Text normalization and n-gram construction
//! - Provider adapters (Google Knowledge Graph, Wikidata)
//! - Canonical entity records and syntactic deduplication
//! - Term aggregation (related terms, semantic keywords)
//! - Dominant-phrase extraction from free text
//! - The linear enrichment pipeline driver

pub mod config;
pub mod entity;
pub mod error;
pub mod phrases;
pub mod pipeline;
pub mod providers;
pub mod terms;
pub mod text;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::entity::{Entity, Source, dedupe};
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::{EnrichRequest, Pipeline, Report};
    pub use crate::terms::{AggregatePolicy, TermAggregator, TermCount};
}
