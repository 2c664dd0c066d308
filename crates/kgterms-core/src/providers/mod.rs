//! Provider adapters
//!
//! One explicit adapter per external knowledge source, each implementing a
//! fixed API contract with a total mapping from its wire shape to the
//! canonical [`Entity`](crate::entity::Entity).

pub mod google;
pub mod wikidata;

pub use google::GoogleKgClient;
pub use wikidata::WikidataClient;
