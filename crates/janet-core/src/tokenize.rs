//! Term extraction for indexing and querying.
//!
//! Text is lower-cased, then split into maximal runs of ASCII letters,
//! digits and `_`. Everything else is a separator. Runs of length one and
//! stopwords are dropped. Order and duplicates are preserved so callers can
//! count term frequencies.
//!
//! ```rust
//! use janet_core::tokenize::tokenize;
//!
//! assert_eq!(tokenize("The quick, brown fox!"), vec!["quick", "brown", "fox"]);
//! ```

use std::collections::{HashMap, HashSet};

/// Common English function words excluded from the index.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "in", "on", "for", "with", "as", "by", "at", "is",
    "are", "was", "were", "be", "been", "being", "from", "that", "this", "it", "its", "but", "not",
    "no", "if", "then", "than", "so", "such", "can", "could", "may", "might", "should", "would",
    "will", "shall", "do", "does", "did", "have", "has", "had", "into", "we", "you", "your", "i",
    "he", "she", "they", "them", "their", "our", "us", "me", "my", "mine", "yours", "his", "her",
];

/// Normalizes text into index terms against a fixed stopword set.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Tokenizer using [`ENGLISH_STOPWORDS`].
    pub fn english() -> Self {
        Self::with_stopwords(ENGLISH_STOPWORDS.iter().copied())
    }

    /// Tokenizer with a caller-supplied stopword set. Entries are lower-cased.
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_stopword(&self, term: &str) -> bool {
        self.stopwords.contains(term)
    }

    /// Split `text` into terms. Never fails; may return an empty vector.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        lowered
            .split(|c: char| !is_term_char(c))
            .filter(|run| run.len() > 1 && !self.stopwords.contains(*run))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}

fn is_term_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize with the default English stopword set.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::english().tokenize(text)
}

/// Count occurrences of each term.
pub fn term_frequencies<I>(terms: I) -> HashMap<String, u32>
where
    I: IntoIterator<Item = String>,
{
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}
