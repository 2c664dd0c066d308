//! Dominant-phrase extraction from free text
//!
//! The sibling operation to the entity pipeline: given a block of text,
//! count 2–4-gram frequencies and return the top phrases. Function words are
//! kept here — the dominant phrases of a page legitimately include them.

use std::collections::{HashMap, hash_map::Entry};

use serde::{Deserialize, Serialize};

use crate::terms::TermCount;
use crate::text::{TextNormalizer, collapse_whitespace, ngrams_range};

fn default_language() -> String {
    "en".to_string()
}

fn default_top_n() -> usize {
    12
}

/// Input payload for dominant-phrase extraction
#[derive(Debug, Clone, Deserialize)]
pub struct PhrasesRequest {
    #[serde(default)]
    pub text: String,
    /// Accepted for schema parity with the enrichment pipeline; phrase
    /// extraction itself is language-neutral
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Output envelope for dominant-phrase extraction
#[derive(Debug, Serialize)]
pub struct PhrasesReport {
    pub success: bool,
    pub dominant_phrases: Vec<TermCount>,
}

/// Run the extraction for one request
pub fn run(request: &PhrasesRequest) -> PhrasesReport {
    PhrasesReport {
        success: true,
        dominant_phrases: dominant_phrases(&request.text, request.top_n),
    }
}

/// Extract the `top_n` most frequent 2–4-gram phrases from `text`.
///
/// Ordering is count descending with a stable first-occurrence tie-break.
/// Empty input yields an empty vec.
pub fn dominant_phrases(text: &str, top_n: usize) -> Vec<TermCount> {
    let cleaned = collapse_whitespace(text);
    if cleaned.is_empty() {
        return Vec::new();
    }

    let normalizer = TextNormalizer::without_stopwords();
    let tokens = normalizer.tokenize(&cleaned);

    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for phrase in ngrams_range(&tokens, 2, 4) {
        match counts.entry(phrase) {
            Entry::Occupied(mut e) => *e.get_mut() += 1,
            Entry::Vacant(v) => {
                order.push(v.key().clone());
                v.insert(1);
            }
        }
    }

    let mut ranked: Vec<TermCount> = order
        .into_iter()
        .map(|phrase| {
            let count = counts[&phrase];
            TermCount { phrase, count }
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}
