//! Canonical entity records and syntactic deduplication

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Which provider produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Google,
    Wikidata,
    WikidataSparql,
}

/// Canonical record describing one real-world concept returned by any
/// provider.
///
/// Field order is fixed and doubles as the canonical serialization order
/// used for dedupe keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Provider-specific opaque id (`@id` for Google KG, `Q…` for Wikidata)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(
        rename = "detailedDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub source: Source,
}

impl Entity {
    /// Empty record tagged with its provider
    pub fn new(source: Source) -> Self {
        Self {
            identifier: None,
            name: None,
            description: None,
            detailed_description: None,
            types: Vec::new(),
            url: None,
            image: None,
            score: None,
            source,
        }
    }

    /// Records without an identifier or a name carry nothing aggregatable
    /// and are dropped before dedupe
    pub fn is_retainable(&self) -> bool {
        let has = |field: &Option<String>| {
            field.as_deref().is_some_and(|s| !s.trim().is_empty())
        };
        has(&self.identifier) || has(&self.name)
    }

    /// Canonical serialized form: struct field order is fixed, so the JSON
    /// string is a stable, order-independent key
    pub fn dedupe_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Collapse byte-identical records, preserving first-seen order.
///
/// This is a conservative, syntactic dedupe: two records describing the same
/// real-world thing stay separate if any field differs, so a Google KG record
/// and a Wikidata record for one concept remain two entries. Known precision
/// limitation.
pub fn dedupe(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(entities.len());

    for entity in entities {
        if seen.insert(entity.dedupe_key()) {
            out.push(entity);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Entity {
        Entity {
            name: Some(name.to_string()),
            description: Some("a thing".to_string()),
            ..Entity::new(Source::Wikidata)
        }
    }

    #[test]
    fn test_dedupe_collapses_identical() {
        let entities = vec![sample("alpha"), sample("beta"), sample("alpha")];
        let deduped = dedupe(entities);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name.as_deref(), Some("alpha"));
        assert_eq!(deduped[1].name.as_deref(), Some("beta"));
    }

    #[test]
    fn test_dedupe_idempotent() {
        let entities = vec![sample("alpha"), sample("alpha"), sample("beta")];
        let once = dedupe(entities);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedupe_keeps_cross_provider_duplicates() {
        let mut google = sample("alpha");
        google.source = Source::Google;
        let wikidata = sample("alpha");

        let deduped = dedupe(vec![google, wikidata]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_dedupe_key_independent_of_input_field_order() {
        // same record, different key order in the source document
        let a: Entity = serde_json::from_str(
            r#"{"name": "alpha", "description": "a thing", "url": null,
                "types": [], "source": "wikidata"}"#,
        )
        .unwrap();
        let b: Entity = serde_json::from_str(
            r#"{"source": "wikidata", "types": [], "url": null,
                "description": "a thing", "name": "alpha"}"#,
        )
        .unwrap();

        assert_eq!(a.dedupe_key(), b.dedupe_key());
        assert_eq!(dedupe(vec![a, b]).len(), 1);
    }

    #[test]
    fn test_dedupe_key_stable_across_clones() {
        let entity = sample("alpha");
        assert_eq!(entity.dedupe_key(), entity.clone().dedupe_key());
    }

    #[test]
    fn test_retainable_requires_identifier_or_name() {
        assert!(sample("alpha").is_retainable());

        let mut by_id = Entity::new(Source::Google);
        by_id.identifier = Some("kg:/m/0x".to_string());
        assert!(by_id.is_retainable());

        let mut empty = Entity::new(Source::Google);
        empty.description = Some("described but anonymous".to_string());
        assert!(!empty.is_retainable());

        empty.name = Some("   ".to_string());
        assert!(!empty.is_retainable());
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Google).unwrap(), "\"google\"");
        assert_eq!(
            serde_json::to_string(&Source::WikidataSparql).unwrap(),
            "\"wikidata_sparql\""
        );
    }

    #[test]
    fn test_detailed_description_rename() {
        let mut entity = sample("alpha");
        entity.detailed_description = Some("long form".to_string());
        let json = serde_json::to_string(&entity).unwrap();
        assert!(json.contains("\"detailedDescription\""));
        assert!(!json.contains("detailed_description"));
    }
}
