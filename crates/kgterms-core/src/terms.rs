//! Term aggregation
//!
//! Counts n-gram phrase frequency across a collection of entities' textual
//! fields and ranks by frequency. Two shipped policies: related terms
//! (2–3-grams over descriptions) and semantic keywords (2–4-grams plus type
//! tags). Counting is global across the collection, ordering is count
//! descending with a stable first-occurrence tie-break.

use std::collections::{HashMap, HashSet, hash_map::Entry};
use std::ops::RangeInclusive;

use regex::Regex;
use serde::Serialize;

use crate::entity::Entity;
use crate::text::{TextNormalizer, ngrams_range};

/// A phrase and its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub phrase: String,
    pub count: u64,
}

/// Which entity text fields feed the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Description,
    DetailedDescription,
}

impl TextField {
    fn read<'a>(&self, entity: &'a Entity) -> Option<&'a str> {
        match self {
            Self::Name => entity.name.as_deref(),
            Self::Description => entity.description.as_deref(),
            Self::DetailedDescription => entity.detailed_description.as_deref(),
        }
    }
}

/// Field selection, n-gram range and ranking size for one aggregation run
#[derive(Debug, Clone)]
pub struct AggregatePolicy {
    pub fields: Vec<TextField>,
    pub ngram_range: RangeInclusive<usize>,
    /// Fold entity type tags in as phrases of their own
    pub include_types: bool,
    pub top_n: usize,
    pub apply_filter: bool,
}

impl AggregatePolicy {
    /// Related terms: 2–3-grams over the description fields
    pub fn related_terms() -> Self {
        Self {
            fields: vec![TextField::Description, TextField::DetailedDescription],
            ngram_range: 2..=3,
            include_types: false,
            top_n: 10,
            apply_filter: true,
        }
    }

    /// Semantic keywords: 2–4-grams over the description fields plus type tags
    pub fn semantic_keywords() -> Self {
        Self {
            fields: vec![TextField::Description, TextField::DetailedDescription],
            ngram_range: 2..=4,
            include_types: true,
            top_n: 15,
            apply_filter: true,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Removes phrases that are pure opaque identifiers (QID-like codes), phrases
/// on a generic stop-phrase list, and phrases outside the accepted word-count
/// range
#[derive(Debug, Clone)]
pub struct PhraseFilter {
    opaque_code: Regex,
    stop_phrases: HashSet<String>,
    word_range: RangeInclusive<usize>,
}

/// Boilerplate lead-ins that dominate encyclopedic descriptions without
/// carrying topic signal
const STOP_PHRASES: &[&str] = &[
    "may refer",
    "refer to",
    "refers to",
    "see also",
    "list of",
    "one of",
    "such as",
    "known for",
    "type of",
    "form of",
    "part of",
    "based on",
];

impl Default for PhraseFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseFilter {
    pub fn new() -> Self {
        Self {
            // Wikidata P/Q codes, alone or space-joined
            opaque_code: Regex::new(r"(?i)^(?:[pq]\d+)(?:\s+[pq]\d+)*$")
                .expect("opaque-code pattern is valid"),
            stop_phrases: STOP_PHRASES.iter().map(|s| s.to_string()).collect(),
            word_range: 2..=4,
        }
    }

    pub fn accepts(&self, phrase: &str) -> bool {
        let words = phrase.split_whitespace().count();
        if !self.word_range.contains(&words) {
            return false;
        }
        if self.opaque_code.is_match(phrase) {
            return false;
        }
        !self.stop_phrases.contains(phrase)
    }
}

/// Counts n-gram frequencies across a set of entities' textual fields
#[derive(Debug, Clone)]
pub struct TermAggregator {
    normalizer: TextNormalizer,
    filter: PhraseFilter,
}

impl Default for TermAggregator {
    fn default() -> Self {
        Self::new("en")
    }
}

impl TermAggregator {
    pub fn new(language: &str) -> Self {
        Self {
            normalizer: TextNormalizer::new(language),
            filter: PhraseFilter::new(),
        }
    }

    /// Rank phrases across the whole collection.
    ///
    /// Never returns more than `policy.top_n` entries; equal counts keep
    /// first-encountered order.
    pub fn aggregate(&self, entities: &[Entity], policy: &AggregatePolicy) -> Vec<TermCount> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        let mut record = |phrase: String| {
            if phrase.is_empty() {
                return;
            }
            match counts.entry(phrase) {
                Entry::Occupied(mut e) => *e.get_mut() += 1,
                Entry::Vacant(v) => {
                    order.push(v.key().clone());
                    v.insert(1);
                }
            }
        };

        for entity in entities {
            if policy.include_types {
                for tag in &entity.types {
                    record(self.normalizer.tokenize(tag).join(" "));
                }
            }

            let text = policy
                .fields
                .iter()
                .filter_map(|f| f.read(entity))
                .collect::<Vec<_>>()
                .join(" ");
            let tokens = self.normalizer.tokenize(&text);
            for phrase in
                ngrams_range(&tokens, *policy.ngram_range.start(), *policy.ngram_range.end())
            {
                record(phrase);
            }
        }

        let mut ranked: Vec<TermCount> = order
            .into_iter()
            .map(|phrase| {
                let count = counts[&phrase];
                TermCount { phrase, count }
            })
            .collect();

        if policy.apply_filter {
            ranked.retain(|tc| self.filter.accepts(&tc.phrase));
        }

        // stable sort keeps first-occurrence order among equal counts
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(policy.top_n);
        ranked
    }
}
