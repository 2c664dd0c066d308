//! Pipeline configuration
//!
//! All provider capabilities are decided here, at construction time. The
//! Google Knowledge Graph credential is environment-only: it is never read
//! from a file and never stored in a config struct field that serializes.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the Google Knowledge Graph API key
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// User-agent sent to every provider
pub const USER_AGENT: &str = concat!("kgterms/", env!("CARGO_PKG_VERSION"));

/// kgterms pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub google: GoogleConfig,
    pub wikidata: WikidataConfig,
    /// Courtesy pause between consecutive queries, in milliseconds
    pub query_pause_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Credential is resolved from the environment, never persisted
    #[serde(skip)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikidataConfig {
    pub endpoint: String,
    pub sparql_endpoint: String,
    /// Whether the richer SPARQL lookup runs alongside the action API
    pub sparql: bool,
    pub search_timeout_secs: u64,
    pub detail_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google: GoogleConfig {
                api_key: None,
                endpoint: "https://kgsearch.googleapis.com/v1/entities:search".to_string(),
                timeout_secs: 15,
            },
            wikidata: WikidataConfig {
                endpoint: "https://www.wikidata.org/w/api.php".to_string(),
                sparql_endpoint: "https://query.wikidata.org/sparql".to_string(),
                sparql: true,
                search_timeout_secs: 15,
                detail_timeout_secs: 20,
            },
            query_pause_ms: 100,
        }
    }
}

impl GoogleConfig {
    /// Resolve the API key from the environment.
    ///
    /// Returns `Ok(None)` when no key is configured; the provider is then
    /// skipped, which is not an error.
    pub fn resolved_api_key(&self) -> Result<Option<String>> {
        self.enforce_env_only()?;

        Ok(env::var(GOOGLE_API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty()))
    }

    /// Resolve the API key, failing when it is absent.
    ///
    /// For call sites that explicitly require the commercial provider.
    pub fn require_api_key(&self) -> Result<String> {
        self.resolved_api_key()?.ok_or_else(|| {
            Error::ConfigError(format!(
                "Google Knowledge Graph requires the {} environment variable",
                GOOGLE_API_KEY_VAR
            ))
        })
    }

    /// Redacted form of the key, safe for diagnostics
    pub fn redacted_api_key(&self) -> Result<Option<String>> {
        self.resolved_api_key().map(|opt| {
            opt.map(|key| {
                if key.len() <= 4 {
                    "***".to_string()
                } else {
                    format!("***{}", &key[key.len() - 4..])
                }
            })
        })
    }

    /// API keys must come from the environment, not from configuration
    pub fn enforce_env_only(&self) -> Result<()> {
        if self.api_key.is_some() {
            return Err(Error::ConfigError(
                "API keys must be provided via environment variables, not stored in configuration"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
