//! Text processing primitives: normalization, stopwords, n-grams

pub mod ngram;
pub mod normalize;
pub mod stopwords;

pub use ngram::{ngrams, ngrams_range};
pub use normalize::{TextNormalizer, collapse_whitespace};
pub use stopwords::StopwordFilter;
