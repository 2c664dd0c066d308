//! Text normalization
//!
//! Turns free text from provider descriptions into a clean token stream:
//! whitespace collapsing, case folding, script-aware character filtering
//! (Latin + Hebrew + digits + hyphen), and token-level drops (short tokens,
//! purely numeric tokens, stopwords).

use super::stopwords::StopwordFilter;

/// Collapse whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hebrew block U+0590..=U+05FF
fn is_hebrew(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

/// Characters kept during filtering; everything else becomes a space so that
/// word boundaries are preserved rather than words fused
fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_hebrew(c) || c == '-' || c.is_whitespace()
}

/// Normalizes free text into tokens suitable for n-gram counting
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: StopwordFilter,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new("en")
    }
}

impl TextNormalizer {
    /// Create a normalizer with the stopword list for `language`
    pub fn new(language: &str) -> Self {
        Self {
            stopwords: StopwordFilter::new(language),
        }
    }

    /// Create a normalizer that keeps function words
    pub fn without_stopwords() -> Self {
        Self {
            stopwords: StopwordFilter::empty(),
        }
    }

    /// Use a specific stopword filter
    pub fn with_filter(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    /// Normalize text into tokens.
    ///
    /// Empty input yields an empty vec, never an error. Output tokens are
    /// lowercase, at least 3 characters, never purely numeric, and never
    /// stopwords.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let filtered: String = lowered
            .chars()
            .map(|c| if is_kept(c) { c } else { ' ' })
            .collect();

        filtered
            .split_whitespace()
            .filter(|w| w.chars().count() > 2)
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .filter(|w| !self.stopwords.is_stopword(w))
            .map(|w| w.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\t b \n c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_tokenize_basic() {
        let normalizer = TextNormalizer::new("en");
        let tokens = normalizer.tokenize("Quantum Computing hardware qubits");
        assert_eq!(tokens, vec!["quantum", "computing", "hardware", "qubits"]);
    }

    #[test]
    fn test_tokenize_drops_short_and_numeric() {
        let normalizer = TextNormalizer::without_stopwords();
        let tokens = normalizer.tokenize("ai is 42 but ml-ops works in 2024");
        for token in &tokens {
            assert!(token.chars().count() > 2, "short token survived: {token}");
            assert!(
                !token.chars().all(|c| c.is_ascii_digit()),
                "numeric token survived: {token}"
            );
        }
        assert!(tokens.contains(&"ml-ops".to_string()));
    }

    #[test]
    fn test_tokenize_strips_punctuation_preserving_boundaries() {
        let normalizer = TextNormalizer::without_stopwords();
        // A period between words must split them, not fuse them
        let tokens = normalizer.tokenize("graph.database");
        assert_eq!(tokens, vec!["graph", "database"]);
    }

    #[test]
    fn test_tokenize_hebrew() {
        let normalizer = TextNormalizer::new("he");
        let tokens = normalizer.tokenize("בינה מלאכותית של גוגל");
        assert!(tokens.contains(&"בינה".to_string()));
        assert!(tokens.contains(&"מלאכותית".to_string()));
        // "של" is a Hebrew function word
        assert!(!tokens.contains(&"של".to_string()));
    }

    #[test]
    fn test_tokenize_removes_stopwords() {
        let normalizer = TextNormalizer::new("en");
        let tokens = normalizer.tokenize("the theory of computation");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(tokens.contains(&"theory".to_string()));
        assert!(tokens.contains(&"computation".to_string()));
    }

    #[test]
    fn test_tokenize_empty_input() {
        let normalizer = TextNormalizer::new("en");
        assert!(normalizer.tokenize("").is_empty());
        assert!(normalizer.tokenize("   \t\n ").is_empty());
    }

    #[test]
    fn test_tokenize_deterministic() {
        let normalizer = TextNormalizer::new("en");
        let a = normalizer.tokenize("Search engines rank documents");
        let b = normalizer.tokenize("Search engines rank documents");
        assert_eq!(a, b);
    }
}
