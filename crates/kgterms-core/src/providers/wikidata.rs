//! Wikidata adapter
//!
//! Two-stage protocol against the action API: `wbsearchentities` produces
//! lightweight search records (id, label, description), then a batch
//! `wbgetentities` detail lookup enriches them with a site link URL
//! (requested-language wiki, then English wiki, then the canonical
//! wikidata.org URL) and instance-of (P31) type identifiers. An optional
//! SPARQL lookup fetches richer label/altLabel matches. No credential is
//! required; a descriptive user-agent is sent.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

use crate::config::{USER_AGENT, WikidataConfig};
use crate::entity::{Entity, Source};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Search shape (wbsearchentities)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    search: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<String>,
    label: Option<String>,
    description: Option<String>,
}

/// Map a search response to lightweight entities: no `types` or `url` at
/// this stage, those come from the detail enrichment
pub fn entities_from_search(envelope: SearchEnvelope) -> Vec<Entity> {
    envelope
        .search
        .into_iter()
        .filter_map(|item| {
            let mut entity = Entity::new(Source::Wikidata);
            entity.identifier = item.id;
            entity.name = item.label;
            entity.description = item.description;

            if entity.is_retainable() {
                Some(entity)
            } else {
                debug!("dropping Wikidata search item with no id or label");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Detail shape (wbgetentities)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EntitiesEnvelope {
    #[serde(default)]
    entities: HashMap<String, DetailRecord>,
}

#[derive(Debug, Deserialize, Default)]
struct DetailRecord {
    #[serde(default)]
    labels: HashMap<String, LangValue>,
    #[serde(default)]
    descriptions: HashMap<String, LangValue>,
    #[serde(default)]
    sitelinks: HashMap<String, Sitelink>,
    #[serde(default)]
    claims: HashMap<String, Vec<Claim>>,
}

#[derive(Debug, Deserialize)]
struct LangValue {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Sitelink {
    url: Option<String>,
}

// Claim values vary by datatype; only entity-id values are of interest here,
// so the innermost value stays untyped.
#[derive(Debug, Deserialize)]
struct Claim {
    mainsnak: Option<Mainsnak>,
}

#[derive(Debug, Deserialize)]
struct Mainsnak {
    datavalue: Option<Datavalue>,
}

#[derive(Debug, Deserialize)]
struct Datavalue {
    value: Option<serde_json::Value>,
}

/// Instance-of property
const P31: &str = "P31";

fn lang_value(map: &HashMap<String, LangValue>, language: &str) -> Option<String> {
    map.get(language)
        .and_then(|v| v.value.clone())
        .or_else(|| map.get("en").and_then(|v| v.value.clone()))
}

impl DetailRecord {
    fn site_url(&self, id: &str, language: &str) -> String {
        let wiki = format!("{language}wiki");
        self.sitelinks
            .get(&wiki)
            .and_then(|s| s.url.clone())
            .or_else(|| self.sitelinks.get("enwiki").and_then(|s| s.url.clone()))
            .unwrap_or_else(|| format!("https://www.wikidata.org/wiki/{id}"))
    }

    fn instance_of_ids(&self) -> Vec<String> {
        self.claims
            .get(P31)
            .map(|claims| {
                claims
                    .iter()
                    .filter_map(|claim| {
                        claim
                            .mainsnak
                            .as_ref()?
                            .datavalue
                            .as_ref()?
                            .value
                            .as_ref()?
                            .get("id")?
                            .as_str()
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Map a detail response to full entities, in the order of `ids`.
///
/// Ids absent from the response are skipped.
pub fn entities_from_details(
    envelope: EntitiesEnvelope,
    ids: &[String],
    language: &str,
) -> Vec<Entity> {
    ids.iter()
        .filter_map(|id| {
            let record = envelope.entities.get(id)?;

            let mut entity = Entity::new(Source::Wikidata);
            entity.identifier = Some(id.clone());
            entity.name = lang_value(&record.labels, language)
                .map(|s| crate::text::collapse_whitespace(&s));
            entity.description = lang_value(&record.descriptions, language)
                .map(|s| crate::text::collapse_whitespace(&s));
            entity.url = Some(record.site_url(id, language));
            entity.types = record.instance_of_ids();

            Some(entity)
        })
        .collect()
}

/// Merge detail enrichment into previously-produced search entities by
/// identifier match, filling `url`, `types` and `description` only where the
/// search entity left them empty. Enrichment never overwrites a populated
/// field.
pub fn merge_enrichment(entities: &mut [Entity], details: &[Entity]) {
    let by_id: HashMap<&str, &Entity> = details
        .iter()
        .filter_map(|d| d.identifier.as_deref().map(|id| (id, d)))
        .collect();

    for entity in entities.iter_mut() {
        let Some(id) = entity.identifier.as_deref() else {
            continue;
        };
        let Some(detail) = by_id.get(id) else {
            continue;
        };

        if entity.url.is_none() {
            entity.url = detail.url.clone();
        }
        if entity.types.is_empty() {
            entity.types = detail.types.clone();
        }
        if entity.description.as_deref().is_none_or(str::is_empty) {
            entity.description = detail.description.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// SPARQL shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SparqlEnvelope {
    #[serde(default)]
    results: SparqlResults,
}

#[derive(Debug, Deserialize, Default)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: Option<String>,
}

fn binding_value(binding: &HashMap<String, SparqlValue>, key: &str) -> Option<String> {
    binding
        .get(key)
        .and_then(|v| v.value.clone())
        .map(|s| crate::text::collapse_whitespace(&s))
        .filter(|s| !s.is_empty())
}

/// Map SPARQL bindings to entities; the item URI tail is the identifier
pub fn entities_from_sparql(envelope: SparqlEnvelope) -> Vec<Entity> {
    envelope
        .results
        .bindings
        .into_iter()
        .filter_map(|binding| {
            let mut entity = Entity::new(Source::WikidataSparql);
            entity.identifier = binding_value(&binding, "item")
                .and_then(|uri| uri.rsplit('/').next().map(str::to_string));
            entity.name = binding_value(&binding, "itemLabel");
            entity.description = binding_value(&binding, "description");
            entity.types = binding_value(&binding, "instanceLabel")
                .map(|label| vec![label])
                .unwrap_or_default();

            if entity.is_retainable() {
                Some(entity)
            } else {
                None
            }
        })
        .collect()
}

/// Label/altLabel match in the requested language, with description and
/// instance-of labels resolved in that language falling back to English
pub fn sparql_query(term: &str, language: &str, limit: u32) -> String {
    let escaped = term.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"SELECT ?item ?itemLabel ?description ?instanceLabel WHERE {{
  VALUES ?lang {{ "{language}" "en" }}
  ?item ?lbl "{escaped}"@{language}.
  VALUES ?lbl {{ rdfs:label skos:altLabel }}
  OPTIONAL {{ ?item schema:description ?description FILTER(LANG(?description)=?lang) }}
  OPTIONAL {{
    ?item wdt:P31 ?instance .
    ?instance rdfs:label ?instanceLabel FILTER(LANG(?instanceLabel)=?lang)
  }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language},en". }}
}}
LIMIT {limit}"#
    )
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Wikidata API client
#[derive(Debug, Clone)]
pub struct WikidataClient {
    http_client: HttpClient,
    endpoint: String,
    sparql_endpoint: String,
    search_timeout: Duration,
    detail_timeout: Duration,
    sparql_enabled: bool,
}

impl WikidataClient {
    pub fn new(config: &WikidataConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::NetworkError)?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            sparql_endpoint: config.sparql_endpoint.clone(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            detail_timeout: Duration::from_secs(config.detail_timeout_secs),
            sparql_enabled: config.sparql,
        })
    }

    /// Whether the SPARQL lookup runs alongside the action API
    pub fn sparql_enabled(&self) -> bool {
        self.sparql_enabled
    }

    /// Search entities for one query, as lightweight records
    pub async fn search(
        &self,
        query: &str,
        language: &str,
        limit: u32,
    ) -> Result<Vec<Entity>> {
        debug!(query = %query, language = %language, limit, "Wikidata search");

        let limit = limit.to_string();
        let response = self
            .http_client
            .get(&self.endpoint)
            .timeout(self.search_timeout)
            .query(&[
                ("action", "wbsearchentities"),
                ("search", query),
                ("language", language),
                ("limit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(Error::NetworkError)?
            .error_for_status()
            .map_err(Error::NetworkError)?;

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|e| Error::ProviderError(format!("malformed Wikidata search response: {e}")))?;

        Ok(entities_from_search(envelope))
    }

    /// Batch detail lookup for the given identifiers
    pub async fn fetch_details(&self, ids: &[String], language: &str) -> Result<Vec<Entity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(ids = ids.len(), language = %language, "Wikidata detail lookup");

        let joined_ids = ids.join("|");
        let response = self
            .http_client
            .get(&self.endpoint)
            .timeout(self.detail_timeout)
            .query(&[
                ("action", "wbgetentities"),
                ("ids", joined_ids.as_str()),
                ("languages", language),
                ("format", "json"),
                ("props", "labels|descriptions|sitelinks|claims"),
            ])
            .send()
            .await
            .map_err(Error::NetworkError)?
            .error_for_status()
            .map_err(Error::NetworkError)?;

        let envelope: EntitiesEnvelope = response
            .json()
            .await
            .map_err(|e| Error::ProviderError(format!("malformed Wikidata detail response: {e}")))?;

        Ok(entities_from_details(envelope, ids, language))
    }

    /// Richer label/altLabel match via the SPARQL endpoint
    pub async fn sparql_search(
        &self,
        query: &str,
        language: &str,
        limit: u32,
    ) -> Result<Vec<Entity>> {
        debug!(query = %query, language = %language, limit, "Wikidata SPARQL search");

        let sparql = sparql_query(query, language, limit);
        let response = self
            .http_client
            .get(&self.sparql_endpoint)
            .timeout(self.detail_timeout)
            .header("Accept", "application/sparql-results+json")
            .query(&[("query", sparql.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(Error::NetworkError)?
            .error_for_status()
            .map_err(Error::NetworkError)?;

        let envelope: SparqlEnvelope = response
            .json()
            .await
            .map_err(|e| Error::ProviderError(format!("malformed SPARQL response: {e}")))?;

        Ok(entities_from_sparql(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_from_search() {
        let envelope: SearchEnvelope = serde_json::from_str(
            r#"{
                "search": [
                    {"id": "Q2539", "label": "machine learning",
                     "description": "field of computer science"},
                    {"description": "no id, no label"}
                ]
            }"#,
        )
        .unwrap();

        let entities = entities_from_search(envelope);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].identifier.as_deref(), Some("Q2539"));
        assert_eq!(entities[0].name.as_deref(), Some("machine learning"));
        assert!(entities[0].types.is_empty());
        assert!(entities[0].url.is_none());
    }

    fn detail_envelope() -> EntitiesEnvelope {
        serde_json::from_str(
            r#"{
                "entities": {
                    "Q2539": {
                        "labels": {
                            "en": {"value": "machine learning"},
                            "he": {"value": "למידת מכונה"}
                        },
                        "descriptions": {"en": {"value": "field of computer science"}},
                        "sitelinks": {
                            "enwiki": {"url": "https://en.wikipedia.org/wiki/Machine_learning"},
                            "hewiki": {"url": "https://he.wikipedia.org/wiki/למידת_מכונה"}
                        },
                        "claims": {
                            "P31": [
                                {"mainsnak": {"datavalue": {"value": {"id": "Q11862829"}}}},
                                {"mainsnak": {"datavalue": {"value": {"id": "Q2465832"}}}}
                            ]
                        }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_details_prefer_requested_language() {
        let ids = vec!["Q2539".to_string()];
        let entities = entities_from_details(detail_envelope(), &ids, "he");

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name.as_deref(), Some("למידת מכונה"));
        // description falls back to en
        assert_eq!(
            entities[0].description.as_deref(),
            Some("field of computer science")
        );
        assert!(entities[0].url.as_deref().unwrap().contains("he.wikipedia.org"));
        assert_eq!(entities[0].types, vec!["Q11862829", "Q2465832"]);
    }

    #[test]
    fn test_details_fall_back_to_enwiki_then_canonical() {
        let ids = vec!["Q2539".to_string()];
        let entities = entities_from_details(detail_envelope(), &ids, "fr");
        assert!(entities[0].url.as_deref().unwrap().contains("en.wikipedia.org"));

        let bare: EntitiesEnvelope =
            serde_json::from_str(r#"{"entities": {"Q1": {}}}"#).unwrap();
        let ids = vec!["Q1".to_string()];
        let entities = entities_from_details(bare, &ids, "en");
        assert_eq!(
            entities[0].url.as_deref(),
            Some("https://www.wikidata.org/wiki/Q1")
        );
    }

    #[test]
    fn test_details_skip_missing_ids() {
        let ids = vec!["Q2539".to_string(), "Q404".to_string()];
        let entities = entities_from_details(detail_envelope(), &ids, "en");
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_merge_enrichment_fills_empty_only() {
        let mut search = vec![Entity {
            identifier: Some("Q2539".to_string()),
            name: Some("machine learning".to_string()),
            description: Some("already populated".to_string()),
            ..Entity::new(Source::Wikidata)
        }];
        let details = vec![Entity {
            identifier: Some("Q2539".to_string()),
            description: Some("from enrichment".to_string()),
            url: Some("https://en.wikipedia.org/wiki/Machine_learning".to_string()),
            types: vec!["Q11862829".to_string()],
            ..Entity::new(Source::Wikidata)
        }];

        merge_enrichment(&mut search, &details);

        // populated description kept, empty url/types filled
        assert_eq!(search[0].description.as_deref(), Some("already populated"));
        assert_eq!(
            search[0].url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Machine_learning")
        );
        assert_eq!(search[0].types, vec!["Q11862829"]);
    }

    #[test]
    fn test_merge_enrichment_unmatched_identifier_untouched() {
        let mut search = vec![Entity {
            identifier: Some("Q1".to_string()),
            name: Some("universe".to_string()),
            ..Entity::new(Source::Wikidata)
        }];
        let details = vec![Entity {
            identifier: Some("Q2".to_string()),
            url: Some("https://example.com".to_string()),
            ..Entity::new(Source::Wikidata)
        }];

        merge_enrichment(&mut search, &details);
        assert!(search[0].url.is_none());
    }

    #[test]
    fn test_entities_from_sparql() {
        let envelope: SparqlEnvelope = serde_json::from_str(
            r#"{
                "results": {
                    "bindings": [{
                        "item": {"value": "http://www.wikidata.org/entity/Q2539"},
                        "itemLabel": {"value": "machine learning"},
                        "description": {"value": "field of  computer science"},
                        "instanceLabel": {"value": "academic discipline"}
                    }]
                }
            }"#,
        )
        .unwrap();

        let entities = entities_from_sparql(envelope);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].identifier.as_deref(), Some("Q2539"));
        assert_eq!(entities[0].source, Source::WikidataSparql);
        // whitespace collapsed during mapping
        assert_eq!(
            entities[0].description.as_deref(),
            Some("field of computer science")
        );
        assert_eq!(entities[0].types, vec!["academic discipline"]);
    }

    #[test]
    fn test_sparql_query_escapes_quotes() {
        let q = sparql_query(r#"say "hi""#, "en", 10);
        assert!(q.contains(r#""say \"hi\""@en"#));
        assert!(q.contains("LIMIT 10"));
    }
}
