//! Pipeline driver
//!
//! Linear, single pass: clean the query list, call each configured provider
//! per query, flatten, enrich, dedupe, aggregate twice, assemble the output
//! envelope. Provider failures are captured per query as data; any error
//! escaping the stages becomes a structured failure envelope rather than a
//! process fault. Callers branch on the `success` field.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::entity::{Entity, dedupe};
use crate::error::Result;
use crate::providers::{GoogleKgClient, WikidataClient, wikidata};
use crate::terms::{AggregatePolicy, TermAggregator};
use crate::text::collapse_whitespace;

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_limit() -> u32 {
    5
}

/// Input payload for the enrichment pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichRequest {
    /// Queries to resolve; elements may be strings or nested sequences
    #[serde(default)]
    pub keywords: Vec<Value>,
    /// Preferred response language code
    #[serde(default = "default_language")]
    pub language: String,
    /// Whether to query the linked-data collaborator
    #[serde(rename = "includeWikidata", default = "default_true")]
    pub include_wikidata: bool,
    /// Max results requested per provider per query
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Raw per-query block from the commercial provider
#[derive(Debug, Clone, Serialize)]
pub struct GoogleBlock {
    pub query: String,
    pub items: Vec<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Raw per-query block from the linked-data provider
#[derive(Debug, Clone, Serialize)]
pub struct WikidataBlock {
    pub query: String,
    #[serde(rename = "searchItems")]
    pub search_items: Vec<Entity>,
    #[serde(rename = "sparqlItems")]
    pub sparql_items: Vec<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct EnrichReport {
    pub success: bool,
    pub language: String,
    pub queries: Vec<String>,
    pub entities: Vec<Entity>,
    pub google: Vec<GoogleBlock>,
    pub wikidata: Vec<WikidataBlock>,
    pub related_terms: Vec<String>,
    pub semantic_keywords: Vec<String>,
}

/// Failure envelope; diagnostic counts only, never secrets
#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub success: bool,
    pub error: String,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Serialize)]
pub struct DebugInfo {
    pub queries: Vec<String>,
    pub has_api_key: bool,
}

/// One JSON document out, success or failure
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Success(Box<EnrichReport>),
    Failure(FailureReport),
}

impl Report {
    pub fn success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Clean the user-supplied keyword list into queries: scalars are stringified,
/// sequence elements are joined into one string, empties are dropped
pub fn clean_queries(keywords: &[Value]) -> Vec<String> {
    fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    keywords
        .iter()
        .filter_map(|keyword| match keyword {
            Value::Array(parts) => {
                let joined = parts
                    .iter()
                    .filter_map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(joined)
            }
            other => scalar_text(other),
        })
        .map(|q| collapse_whitespace(&q))
        .filter(|q| !q.is_empty())
        .collect()
}

/// The enrichment pipeline: providers are wired at construction time from
/// the configuration, never discovered at runtime
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    google: Option<GoogleKgClient>,
    wikidata: WikidataClient,
}

impl Pipeline {
    /// Build the pipeline. The commercial provider is attached only when its
    /// credential is present in the environment; its absence is not an error.
    pub fn new(config: Config) -> Result<Self> {
        let google = GoogleKgClient::from_config(&config)?;
        if google.is_none() {
            debug!("no Google KG credential configured, provider disabled");
        }
        let wikidata = WikidataClient::new(&config.wikidata)?;

        Ok(Self {
            config,
            google,
            wikidata,
        })
    }

    /// Build the pipeline with the commercial provider disabled regardless
    /// of the environment
    pub fn without_google(config: Config) -> Result<Self> {
        let wikidata = WikidataClient::new(&config.wikidata)?;
        Ok(Self {
            config,
            google: None,
            wikidata,
        })
    }

    /// Whether the commercial provider is configured
    pub fn has_google(&self) -> bool {
        self.google.is_some()
    }

    /// Run the pipeline. Never returns an error: failures become the
    /// structured failure envelope.
    pub async fn run(&self, request: &EnrichRequest) -> Report {
        let queries = clean_queries(&request.keywords);

        match self.run_inner(&queries, request).await {
            Ok(report) => Report::Success(Box::new(report)),
            Err(e) => {
                warn!(error = %e, code = e.code(), "pipeline failed");
                Report::Failure(FailureReport {
                    success: false,
                    error: e.to_string(),
                    debug_info: DebugInfo {
                        queries,
                        has_api_key: self.google.is_some(),
                    },
                })
            }
        }
    }

    async fn run_inner(
        &self,
        queries: &[String],
        request: &EnrichRequest,
    ) -> Result<EnrichReport> {
        let mut google_blocks: Vec<GoogleBlock> = Vec::new();
        let mut wikidata_blocks: Vec<WikidataBlock> = Vec::new();

        for (index, query) in queries.iter().enumerate() {
            // courtesy pause between consecutive queries
            if index > 0 && self.config.query_pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.query_pause_ms)).await;
            }

            if let Some(client) = &self.google {
                google_blocks.push(match client.search(query, &request.language, request.limit).await {
                    Ok(items) => GoogleBlock {
                        query: query.clone(),
                        items,
                        error: None,
                    },
                    Err(e) => {
                        warn!(query = %query, error = %e, "Google KG query failed");
                        GoogleBlock {
                            query: query.clone(),
                            items: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    }
                });
            }

            if request.include_wikidata {
                wikidata_blocks.push(
                    self.wikidata_block(query, &request.language, request.limit)
                        .await,
                );
            }
        }

        let mut entities: Vec<Entity> = Vec::new();
        for block in &google_blocks {
            entities.extend(block.items.iter().cloned());
        }
        for block in &wikidata_blocks {
            entities.extend(block.search_items.iter().cloned());
            entities.extend(block.sparql_items.iter().cloned());
        }
        entities.retain(Entity::is_retainable);
        let entities = dedupe(entities);

        let aggregator = TermAggregator::new(&request.language);
        let related_terms = aggregator
            .aggregate(&entities, &AggregatePolicy::related_terms())
            .into_iter()
            .map(|tc| tc.phrase)
            .collect();
        let semantic_keywords = aggregator
            .aggregate(&entities, &AggregatePolicy::semantic_keywords())
            .into_iter()
            .map(|tc| tc.phrase)
            .collect();

        Ok(EnrichReport {
            success: true,
            language: request.language.clone(),
            queries: queries.to_vec(),
            entities,
            google: google_blocks,
            wikidata: wikidata_blocks,
            related_terms,
            semantic_keywords,
        })
    }

    /// One query against the linked-data provider: search, detail
    /// enrichment, then the optional SPARQL lookup. Each step's failure is
    /// captured in the block, never propagated.
    async fn wikidata_block(&self, query: &str, language: &str, limit: u32) -> WikidataBlock {
        let mut block = WikidataBlock {
            query: query.to_string(),
            search_items: Vec::new(),
            sparql_items: Vec::new(),
            error: None,
        };

        match self.search_and_enrich(query, language, limit).await {
            Ok(items) => block.search_items = items,
            Err(e) => {
                warn!(query = %query, error = %e, "Wikidata query failed");
                block.error = Some(e.to_string());
            }
        }

        if self.wikidata.sparql_enabled() {
            // SPARQL is a best-effort extra; its failure must not discard
            // the action-API results
            match self.wikidata.sparql_search(query, language, limit).await {
                Ok(items) => block.sparql_items = items,
                Err(e) => {
                    warn!(query = %query, error = %e, "Wikidata SPARQL query failed");
                    if block.error.is_none() {
                        block.error = Some(e.to_string());
                    }
                }
            }
        }

        block
    }

    async fn search_and_enrich(
        &self,
        query: &str,
        language: &str,
        limit: u32,
    ) -> Result<Vec<Entity>> {
        let mut items = self.wikidata.search(query, language, limit).await?;

        let ids: Vec<String> = items
            .iter()
            .filter_map(|e| e.identifier.clone())
            .collect();
        let details = self.wikidata.fetch_details(&ids, language).await?;
        wikidata::merge_enrichment(&mut items, &details);

        Ok(items)
    }
}
