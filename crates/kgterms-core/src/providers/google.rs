//! Google Knowledge Graph Search adapter
//!
//! One fixed API contract: HTTP GET against the entities:search endpoint,
//! credential from the environment. The response nests entity fields under a
//! `result` wrapper with JSON-LD style `@id`/`@type` keys; `resultScore`
//! lives beside the wrapper. Mapping to the canonical [`Entity`] is a total
//! function over that shape with explicit defaulting.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

use crate::config::{Config, GoogleConfig, USER_AGENT};
use crate::entity::{Entity, Source};
use crate::error::{Error, Result};

/// `@type` arrives as a list, but some serializations flatten a single tag
/// to a bare string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "itemListElement", default)]
    item_list_element: Vec<ListElement>,
}

#[derive(Debug, Deserialize)]
struct ListElement {
    result: Option<KgResult>,
    #[serde(rename = "resultScore")]
    result_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct KgResult {
    #[serde(rename = "@id")]
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    #[serde(rename = "@type")]
    types: Option<OneOrMany>,
    url: Option<String>,
    #[serde(rename = "detailedDescription")]
    detailed_description: Option<DetailedDescription>,
    image: Option<Image>,
}

#[derive(Debug, Deserialize)]
struct DetailedDescription {
    #[serde(rename = "articleBody")]
    article_body: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Image {
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

/// Map one search response to canonical entities.
///
/// Malformed elements yield best-effort partial entities; elements with no
/// usable identifying field are dropped silently.
pub fn entities_from_response(response: SearchResponse) -> Vec<Entity> {
    response
        .item_list_element
        .into_iter()
        .filter_map(|element| {
            let result = element.result?;
            let detail = result.detailed_description;

            let mut entity = Entity::new(Source::Google);
            entity.identifier = result.id;
            entity.name = result.name;
            entity.description = result.description;
            entity.types = result.types.map(OneOrMany::into_vec).unwrap_or_default();
            entity.score = element.result_score;
            entity.detailed_description =
                detail.as_ref().and_then(|d| d.article_body.clone());
            // Prefer the detailed-description article URL over the bare one
            entity.url = detail
                .and_then(|d| d.url)
                .or(result.url);
            entity.image = result.image.and_then(|i| i.content_url);

            if entity.is_retainable() {
                Some(entity)
            } else {
                debug!("dropping Google KG element with no identifier or name");
                None
            }
        })
        .collect()
}

/// Google Knowledge Graph Search client
#[derive(Debug, Clone)]
pub struct GoogleKgClient {
    http_client: HttpClient,
    endpoint: String,
    api_key: String,
}

impl GoogleKgClient {
    /// Build a client from configuration.
    ///
    /// Returns `Ok(None)` when no credential is configured: the provider is
    /// then skipped by the driver, which is not an error.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(api_key) = config.google.resolved_api_key()? else {
            return Ok(None);
        };
        Self::new(&config.google, api_key).map(Some)
    }

    /// Build a client with an explicit key
    pub fn new(config: &GoogleConfig, api_key: String) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::NetworkError)?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    /// Search entities for one query, mapped to canonical records
    pub async fn search(
        &self,
        query: &str,
        language: &str,
        limit: u32,
    ) -> Result<Vec<Entity>> {
        debug!(query = %query, language = %language, limit, "Google KG search");

        let limit = limit.to_string();
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("query", query),
                ("key", self.api_key.as_str()),
                ("limit", limit.as_str()),
                ("languages", language),
            ])
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderError(format!(
                "Google KG search failed with HTTP {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::ProviderError(format!("malformed Google KG response: {e}")))?;

        Ok(entities_from_response(parsed))
    }
}
