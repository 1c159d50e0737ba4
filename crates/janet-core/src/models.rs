//! Data types shared by the index and the retriever.

use std::collections::HashMap;

use serde::Serialize;

/// A contiguous slice of one document's text, the unit of retrieval.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Process-unique id, assigned in increasing order and never reused.
    pub id: u64,
    /// Owning document (e.g. a file path).
    pub document_id: String,
    pub text: String,
    /// Length of `text` in characters; this is what retrieval budgets count.
    pub char_len: usize,
    /// Term → count within this chunk. Never empty.
    pub term_frequencies: HashMap<String, u32>,
    /// Euclidean norm of the raw term-frequency vector.
    pub norm: f64,
}

impl Chunk {
    pub(crate) fn new(
        id: u64,
        document_id: &str,
        text: &str,
        term_frequencies: HashMap<String, u32>,
    ) -> Self {
        let norm = term_frequencies
            .values()
            .map(|&tf| f64::from(tf) * f64::from(tf))
            .sum::<f64>()
            .sqrt();
        Self {
            id,
            document_id: document_id.to_string(),
            text: text.to_string(),
            char_len: text.chars().count(),
            term_frequencies,
            norm,
        }
    }

    pub fn term_frequency(&self, term: &str) -> u32 {
        self.term_frequencies.get(term).copied().unwrap_or(0)
    }
}

/// One retrieval hit.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub document_id: String,
    pub text: String,
    pub chunk_id: u64,
    pub score: f64,
    /// Scoring breakdown (populated when `explain` is requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ScoreExplanation>,
}

/// Scoring breakdown for a retrieval hit.
///
/// `score = dot / (query_norm * chunk_norm * average_idf)`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreExplanation {
    /// Σ over matched terms of `query_weight * tf * idf`.
    pub dot: f64,
    pub query_norm: f64,
    /// Raw term-frequency norm of the chunk.
    pub chunk_norm: f64,
    /// Mean idf of the query terms found in the chunk.
    pub average_idf: f64,
    /// Query terms present in the chunk, sorted.
    pub matched_terms: Vec<String>,
}
