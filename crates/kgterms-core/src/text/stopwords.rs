//! Stopword filtering
//!
//! Curated per-language function-word lists via the `stop-words` crate, with
//! an in-repo Hebrew list (the crate does not ship one under the mapping we
//! use). Filtering is always case-insensitive against lowercased tokens.

use std::collections::HashSet;

use stop_words::{LANGUAGE, get};

/// A filter for removing function words from token streams
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordFilter {
    /// Create a filter for the given language code.
    ///
    /// Hebrew ("he") uses the curated in-repo list combined with English,
    /// since provider descriptions mix both scripts. Unknown languages fall
    /// back to English.
    pub fn new(language: &str) -> Self {
        let stopwords = Self::load_stopwords(language);
        Self { stopwords }
    }

    /// Create an empty filter (no filtering)
    pub fn empty() -> Self {
        Self {
            stopwords: HashSet::new(),
        }
    }

    /// Create a filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        let stopwords = words.iter().map(|w| w.to_lowercase()).collect();
        Self { stopwords }
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.insert(word.to_lowercase());
        }
    }

    /// Check if a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    fn load_stopwords(language: &str) -> HashSet<String> {
        let lang = match language.to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "ar" | "arabic" => LANGUAGE::Arabic,
            "he" | "iw" | "hebrew" => {
                // Mixed-script corpora: keep English function words out too
                let mut set = Self::hebrew_stopwords();
                set.extend(get(LANGUAGE::English).iter().map(|s| s.to_string()));
                return set;
            }
            _ => LANGUAGE::English,
        };

        get(lang).iter().map(|s| s.to_string()).collect()
    }

    /// Common Hebrew function words
    fn hebrew_stopwords() -> HashSet<String> {
        [
            "של", "את", "עם", "על", "אל", "כל", "לא", "אם", "כי", "זה", "זו", "זאת", "היא",
            "הוא", "הם", "הן", "אצל", "בין", "גם", "רק", "כמו", "להיות", "היה", "היו", "יהיה",
            "יהיו", "יש", "אין", "או", "וגם", "אך", "אבל", "לכן", "כדי", "בגלל", "תוך", "לפי",
            "מאוד", "יותר", "פחות", "כאשר", "כש", "אז", "עוד", "כבר", "שם", "פה", "כאן", "אשר",
            "מה", "מי", "איך", "למה", "מדוע", "איפה", "מתי", "אלה", "אלו", "אותו", "אותה",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}
