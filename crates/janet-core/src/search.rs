//! TF-IDF retrieval over an [`IndexStore`] with a character budget.
//!
//! # Scoring Algorithm
//!
//! 1. Tokenize the query; no terms means no results.
//! 2. Query weight per distinct term: `qw[t] = qtf[t] × idf(t)` with
//!    `idf(t) = ln((1 + N) / (1 + df(t))) + 1` (add-one smoothing, so
//!    unseen terms get a finite, maximal idf).
//! 3. `query_norm = ‖qw‖`, at least 1.0.
//! 4. Per chunk, over the query terms it contains:
//!    `dot = Σ qw[t] × tf[t] × idf(t)`. Chunks with `dot ≤ 0` are skipped.
//! 5. `score = dot / (query_norm × chunk.norm × average_idf)` where
//!    `average_idf` is the mean idf of the matched query terms.
//! 6. Sort by score (desc), then chunk id (asc).
//! 7. Walk the ranking, accepting a chunk only if it still fits in
//!    `max_total_chars`. Chunks that do not fit are skipped, not truncated,
//!    and the walk continues looking for smaller ones until `top_k` chunks
//!    are accepted.
//!
//! # Approximate cosine
//!
//! Step 5 is not a textbook TF-IDF cosine. The exact document-side norm is
//! `sqrt(Σ (tf[t] × idf(t))²)` over *every* term in the chunk, which changes
//! whenever any df changes. Instead the raw tf norm (precomputed at ingest)
//! is scaled by the average idf of the matched query terms. Scores are
//! therefore only comparable within one query, and chunks whose other terms
//! are rare score somewhat higher than exact cosine would rank them. This is
//! intentional; `test_score_is_approximate_cosine` pins the behaviour.
//!
//! # Budget
//!
//! If `max_total_chars` is smaller than every matching chunk the result is
//! empty even though matches exist. Callers treat an empty result as "fall
//! back to another strategy".

use std::collections::HashMap;

use crate::index::IndexStore;
use crate::models::{Chunk, RetrievedChunk, ScoreExplanation};
use crate::tokenize::term_frequencies;

/// Bundles all inputs for a single retrieval.
#[derive(Debug, Clone)]
pub struct RetrievalRequest<'a> {
    pub query: &'a str,
    /// Maximum number of chunks to return.
    pub top_k: usize,
    /// Maximum total characters across returned chunk texts.
    pub max_total_chars: usize,
    /// If true, populate [`ScoreExplanation`] on each result.
    pub explain: bool,
}

impl<'a> RetrievalRequest<'a> {
    pub fn new(query: &'a str, top_k: usize, max_total_chars: usize) -> Self {
        Self {
            query,
            top_k,
            max_total_chars,
            explain: false,
        }
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }
}

/// Smoothed inverse document frequency for a term seen in `df` of `n` chunks.
pub fn idf(df: usize, n: usize) -> f64 {
    ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0
}

struct QueryTerm<'q> {
    term: &'q str,
    weight: f64,
    idf: f64,
}

struct ScoredChunk<'s> {
    chunk: &'s Chunk,
    score: f64,
    dot: f64,
    average_idf: f64,
}

/// Rank the store's chunks against `req.query` and return the top hits that
/// fit the character budget.
pub fn retrieve(store: &IndexStore, req: &RetrievalRequest<'_>) -> Vec<RetrievedChunk> {
    if store.is_empty() || req.top_k == 0 {
        return Vec::new();
    }

    let qtf = term_frequencies(store.tokenizer().tokenize(req.query));
    if qtf.is_empty() {
        return Vec::new();
    }

    let n = store.chunk_count();
    let query_terms: Vec<QueryTerm<'_>> = qtf
        .iter()
        .map(|(term, &count)| {
            let term_idf = idf(store.document_frequency(term), n);
            QueryTerm {
                term: term.as_str(),
                weight: f64::from(count) * term_idf,
                idf: term_idf,
            }
        })
        .collect();

    let query_norm = query_terms
        .iter()
        .map(|q| q.weight * q.weight)
        .sum::<f64>()
        .sqrt()
        .max(1.0);

    let mut scored: Vec<ScoredChunk<'_>> = store
        .chunks()
        .filter_map(|chunk| score_chunk(chunk, &query_terms, query_norm))
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.chunk.id.cmp(&b.chunk.id))
    });

    let mut results = Vec::new();
    let mut total_chars = 0;
    for sc in scored {
        if total_chars + sc.chunk.char_len > req.max_total_chars {
            continue;
        }
        total_chars += sc.chunk.char_len;

        let explain = req.explain.then(|| explain_score(&sc, &query_terms, query_norm));
        results.push(RetrievedChunk {
            document_id: sc.chunk.document_id.clone(),
            text: sc.chunk.text.clone(),
            chunk_id: sc.chunk.id,
            score: sc.score,
            explain,
        });
        if results.len() >= req.top_k {
            break;
        }
    }

    results
}

fn score_chunk<'s>(
    chunk: &'s Chunk,
    query_terms: &[QueryTerm<'_>],
    query_norm: f64,
) -> Option<ScoredChunk<'s>> {
    let mut dot = 0.0;
    let mut idf_sum = 0.0;
    let mut present_terms = 0usize;
    for q in query_terms {
        let tf = chunk.term_frequency(q.term);
        if tf > 0 {
            dot += q.weight * f64::from(tf) * q.idf;
            idf_sum += q.idf;
            present_terms += 1;
        }
    }
    if dot <= 0.0 {
        return None;
    }

    // Approximate document norm: raw tf norm scaled by the mean idf of the
    // matched query terms (see module docs).
    let average_idf = idf_sum / present_terms as f64;
    let mut denominator = chunk.norm * average_idf;
    if denominator <= 0.0 {
        denominator = 1.0;
    }

    let score = dot / (query_norm * denominator);
    (score > 0.0).then_some(ScoredChunk {
        chunk,
        score,
        dot,
        average_idf,
    })
}

fn explain_score(
    sc: &ScoredChunk<'_>,
    query_terms: &[QueryTerm<'_>],
    query_norm: f64,
) -> ScoreExplanation {
    let mut matched_terms: Vec<String> = query_terms
        .iter()
        .filter(|q| sc.chunk.term_frequency(q.term) > 0)
        .map(|q| q.term.to_string())
        .collect();
    matched_terms.sort();
    ScoreExplanation {
        dot: sc.dot,
        query_norm,
        chunk_norm: sc.chunk.norm,
        average_idf: sc.average_idf,
        matched_terms,
    }
}

impl IndexStore {
    /// Retrieve up to `top_k` chunks for `query` within `max_total_chars`.
    pub fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        max_total_chars: usize,
    ) -> Vec<RetrievedChunk> {
        retrieve(self, &RetrievalRequest::new(query, top_k, max_total_chars))
    }

    /// Retrieve using the configured `top_k` and `max_total_chars`.
    pub fn retrieve_default(&self, query: &str) -> Vec<RetrievedChunk> {
        let config = self.config();
        self.retrieve(query, config.top_k, config.max_total_chars)
    }

    /// Document frequency lookup for every query term, used for diagnostics.
    pub fn query_term_stats(&self, query: &str) -> HashMap<String, (usize, f64)> {
        let n = self.chunk_count();
        term_frequencies(self.tokenizer().tokenize(query))
            .into_keys()
            .map(|t| {
                let df = self.document_frequency(&t);
                (t, (df, idf(df, n)))
            })
            .collect()
    }
}
