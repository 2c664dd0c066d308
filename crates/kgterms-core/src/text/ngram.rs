//! N-gram construction over token streams

/// Build all contiguous `n`-token phrases, space-joined, left to right.
///
/// Fewer than `n` tokens yields an empty vec, never an error. `n` must be
/// at least 1.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    assert!(n >= 1, "ngram size must be at least 1");
    if tokens.len() < n {
        return Vec::new();
    }
    tokens.windows(n).map(|window| window.join(" ")).collect()
}

/// Build phrases for every n in `[lo, hi]`, ascending n, position order
/// preserved within each n
pub fn ngrams_range(tokens: &[String], lo: usize, hi: usize) -> Vec<String> {
    let mut out = Vec::new();
    for n in lo..=hi {
        out.extend(ngrams(tokens, n));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_bigrams() {
        let tokens = toks(&["knowledge", "graph", "search"]);
        assert_eq!(
            ngrams(&tokens, 2),
            vec!["knowledge graph", "graph search"]
        );
    }

    #[test]
    fn test_ngram_count_property() {
        // len(T) - n + 1 entries, each with exactly n tokens
        let tokens = toks(&["a", "b", "c", "d", "e"]);
        for n in 1..=tokens.len() {
            let grams = ngrams(&tokens, n);
            assert_eq!(grams.len(), tokens.len() - n + 1);
            for gram in &grams {
                assert_eq!(gram.split(' ').count(), n);
            }
        }
    }

    #[test]
    fn test_too_few_tokens_yields_empty() {
        let tokens = toks(&["only", "two"]);
        assert!(ngrams(&tokens, 3).is_empty());
        assert!(ngrams(&[], 1).is_empty());
    }

    #[test]
    fn test_unigrams_allowed() {
        let tokens = toks(&["single"]);
        assert_eq!(ngrams(&tokens, 1), vec!["single"]);
    }

    #[test]
    fn test_range_ascending_order() {
        let tokens = toks(&["a", "b", "c"]);
        assert_eq!(
            ngrams_range(&tokens, 2, 3),
            vec!["a b", "b c", "a b c"]
        );
    }

    #[test]
    fn test_range_with_empty_high_n() {
        let tokens = toks(&["a", "b"]);
        // n = 3 and n = 4 contribute nothing
        assert_eq!(ngrams_range(&tokens, 2, 4), vec!["a b"]);
    }
}
