//! In-memory chunk index with exact document-frequency bookkeeping.
//!
//! The store owns every [`Chunk`], the ordered chunk ids of each document,
//! and a sparse `term → df` table where `df` is the number of stored chunks
//! containing the term. After every mutation:
//!
//! - `document_frequency[t]` equals the number of chunks whose
//!   `term_frequencies` contain `t`;
//! - no term maps to zero;
//! - no chunk has an empty term set.
//!
//! Re-ingesting a document first removes its old chunks, so ingestion is
//! idempotent with respect to the final index state (chunk ids aside).
//!
//! The store is a plain value with `&mut self` mutators. Share it across
//! threads by wrapping the whole store in one lock.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::chunk::chunk_text;
use crate::config::IndexConfig;
use crate::error::Result;
use crate::models::Chunk;
use crate::tokenize::{term_frequencies, Tokenizer};

pub struct IndexStore {
    config: IndexConfig,
    tokenizer: Tokenizer,
    chunks: HashMap<u64, Chunk>,
    document_chunk_ids: HashMap<String, Vec<u64>>,
    document_frequency: HashMap<String, usize>,
    next_chunk_id: u64,
}

impl IndexStore {
    /// Build an empty store. Fails with `InvalidConfiguration` if `config`
    /// does not pass [`IndexConfig::validate`].
    pub fn new(config: IndexConfig, tokenizer: Tokenizer) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config, tokenizer))
    }

    fn with_valid_config(config: IndexConfig, tokenizer: Tokenizer) -> Self {
        Self {
            config,
            tokenizer,
            chunks: HashMap::new(),
            document_chunk_ids: HashMap::new(),
            document_frequency: HashMap::new(),
            next_chunk_id: 1,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Replace `document_id`'s chunks with chunks built from `text`.
    ///
    /// Windows with no indexable terms are skipped. Returns the number of
    /// chunks stored; empty or whitespace-only text stores none.
    pub fn ingest(&mut self, document_id: &str, text: &str) -> usize {
        self.remove(document_id);

        let mut ids = Vec::new();
        for piece in chunk_text(text, self.config.chunk_size, self.config.chunk_overlap) {
            let tf = term_frequencies(self.tokenizer.tokenize(piece));
            if tf.is_empty() {
                continue;
            }

            let id = self.next_chunk_id;
            self.next_chunk_id += 1;

            for term in tf.keys() {
                *self.document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            self.chunks.insert(id, Chunk::new(id, document_id, piece, tf));
            ids.push(id);
        }

        let stored = ids.len();
        if !ids.is_empty() {
            self.document_chunk_ids.insert(document_id.to_string(), ids);
        }
        debug!(
            document_id,
            chunks = stored,
            total_chunks = self.chunks.len(),
            "ingested document"
        );
        stored
    }

    /// Drop every chunk owned by `document_id` and roll back its df
    /// contributions. Returns the number of chunks dropped; unknown
    /// documents are a no-op.
    pub fn remove(&mut self, document_id: &str) -> usize {
        let Some(ids) = self.document_chunk_ids.remove(document_id) else {
            return 0;
        };

        let mut removed = 0;
        for id in ids {
            let Some(chunk) = self.chunks.remove(&id) else {
                continue;
            };
            for term in chunk.term_frequencies.keys() {
                if let Some(df) = self.document_frequency.get_mut(term) {
                    *df -= 1;
                    if *df == 0 {
                        self.document_frequency.remove(term);
                    }
                }
            }
            removed += 1;
        }
        debug!(
            document_id,
            chunks = removed,
            total_chunks = self.chunks.len(),
            "removed document"
        );
        removed
    }

    /// Drop all documents. The id counter keeps running.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.document_chunk_ids.clear();
        self.document_frequency.clear();
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of documents that currently own at least one chunk.
    pub fn document_count(&self) -> usize {
        self.document_chunk_ids.len()
    }

    /// Number of distinct terms across all chunks.
    pub fn term_count(&self) -> usize {
        self.document_frequency.len()
    }

    /// Chunks containing `term`; 0 if the term is not indexed.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    pub fn contains_document(&self, document_id: &str) -> bool {
        self.document_chunk_ids.contains_key(document_id)
    }

    /// Indexed document ids, sorted.
    pub fn document_ids(&self) -> Vec<&str> {
        let ids: BTreeSet<&str> = self.document_chunk_ids.keys().map(String::as_str).collect();
        ids.into_iter().collect()
    }

    /// A document's chunks in document order.
    pub fn document_chunks(&self, document_id: &str) -> Vec<&Chunk> {
        self.document_chunk_ids
            .get(document_id)
            .map(|ids| ids.iter().filter_map(|id| self.chunks.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn chunk(&self, id: u64) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// The `n` terms with the highest df, ties broken alphabetically.
    pub fn top_terms(&self, n: usize) -> Vec<(String, usize)> {
        let mut terms: Vec<(String, usize)> = self
            .document_frequency
            .iter()
            .map(|(t, df)| (t.clone(), *df))
            .collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(n);
        terms
    }

    /// Recompute df from the stored chunks and compare with the maintained
    /// table. Used by tests.
    pub fn frequencies_consistent(&self) -> bool {
        let mut recomputed: HashMap<&str, usize> = HashMap::new();
        for chunk in self.chunks.values() {
            if chunk.term_frequencies.is_empty() {
                return false;
            }
            for term in chunk.term_frequencies.keys() {
                *recomputed.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let owned: HashSet<u64> = self.document_chunk_ids.values().flatten().copied().collect();
        recomputed.len() == self.document_frequency.len()
            && recomputed
                .iter()
                .all(|(t, df)| self.document_frequency.get(*t) == Some(df))
            && owned.len() == self.chunks.len()
            && owned.iter().all(|id| self.chunks.contains_key(id))
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::with_valid_config(IndexConfig::default(), Tokenizer::english())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;

    fn small_store() -> IndexStore {
        IndexStore::new(IndexConfig::new(40, 5).unwrap(), Tokenizer::english()).unwrap()
    }

    fn df_snapshot(store: &IndexStore) -> Vec<(String, usize)> {
        let mut all = store.top_terms(usize::MAX);
        all.sort();
        all
    }

    fn chunk_texts(store: &IndexStore, doc: &str) -> Vec<String> {
        store
            .document_chunks(doc)
            .iter()
            .map(|c| c.text.clone())
            .collect()
    }

    #[test]
    fn test_new_rejects_unvalidated_config() {
        let bad = IndexConfig {
            chunk_size: 10,
            chunk_overlap: 10,
            top_k: 4,
            max_total_chars: 100,
        };
        assert!(matches!(
            IndexStore::new(bad, Tokenizer::english()),
            Err(IndexError::InvalidConfiguration(_))
        ));

        let zero_budget = IndexConfig {
            max_total_chars: 0,
            ..IndexConfig::default()
        };
        assert!(IndexStore::new(zero_budget, Tokenizer::english()).is_err());
    }

    #[test]
    fn test_ingest_counts_chunks_and_df() {
        let mut store = small_store();
        let n = store.ingest("doc1", "The quick brown fox jumps over the lazy dog. The dog barks.");
        assert_eq!(n, 2);
        assert_eq!(store.chunk_count(), 2);
        assert_eq!(store.document_count(), 1);
        // windows: "The quick brown fox jumps over the lazy " and "lazy dog. The dog barks."
        assert_eq!(store.document_frequency("lazy"), 2);
        assert_eq!(store.document_frequency("dog"), 1);
        assert_eq!(store.document_frequency("fox"), 1);
        assert_eq!(store.document_frequency("the"), 0);
        assert!(store.frequencies_consistent());
    }

    #[test]
    fn test_df_counts_chunks_not_occurrences() {
        let mut store = IndexStore::default();
        store.ingest("doc", "dog dog dog dog");
        assert_eq!(store.document_frequency("dog"), 1);
        let chunk = store.document_chunks("doc")[0];
        assert_eq!(chunk.term_frequency("dog"), 4);
        assert!((chunk.norm - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_reingest_is_idempotent() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota kappa lambda mu.";
        let mut once = small_store();
        once.ingest("doc", text);

        let mut twice = small_store();
        twice.ingest("doc", text);
        twice.ingest("doc", text);

        assert_eq!(df_snapshot(&once), df_snapshot(&twice));
        assert_eq!(chunk_texts(&once, "doc"), chunk_texts(&twice, "doc"));
        assert_eq!(once.chunk_count(), twice.chunk_count());
        assert!(twice.frequencies_consistent());
    }

    #[test]
    fn test_reingest_replaces_old_terms() {
        let mut store = IndexStore::default();
        store.ingest("doc", "alpha beta");
        store.ingest("doc", "gamma delta");
        assert_eq!(store.document_frequency("alpha"), 0);
        assert_eq!(store.document_frequency("gamma"), 1);
        assert_eq!(store.chunk_count(), 1);
    }

    #[test]
    fn test_chunk_ids_never_reused() {
        let mut store = IndexStore::default();
        store.ingest("doc", "alpha beta");
        let first = store.document_chunks("doc")[0].id;
        store.ingest("doc", "alpha beta");
        let second = store.document_chunks("doc")[0].id;
        assert!(second > first);
        assert!(store.chunk(first).is_none());
    }

    #[test]
    fn test_remove_rolls_back_frequencies() {
        let mut store = IndexStore::default();
        store.ingest("A", "The xylophone plays music");
        store.ingest("B", "Music from the orchestra");
        assert_eq!(store.document_frequency("music"), 2);

        assert_eq!(store.remove("A"), 1);
        assert_eq!(store.document_frequency("xylophone"), 0);
        assert!(store.top_terms(usize::MAX).iter().all(|(t, _)| t != "xylophone"));
        assert_eq!(store.document_frequency("music"), 1);
        assert!(!store.contains_document("A"));
        assert!(store.frequencies_consistent());
    }

    #[test]
    fn test_remove_unknown_document_is_noop() {
        let mut store = IndexStore::default();
        store.ingest("doc", "alpha beta");
        assert_eq!(store.remove("missing"), 0);
        assert_eq!(store.chunk_count(), 1);
    }

    #[test]
    fn test_empty_and_stopword_text_store_nothing() {
        let mut store = IndexStore::default();
        assert_eq!(store.ingest("empty", ""), 0);
        assert_eq!(store.ingest("blank", "   \n\t  "), 0);
        assert_eq!(store.ingest("stop", "the and of a it is"), 0);
        assert_eq!(store.chunk_count(), 0);
        assert_eq!(store.document_count(), 0);
        assert_eq!(store.term_count(), 0);
    }

    #[test]
    fn test_stopword_only_window_skipped() {
        let config = IndexConfig::new(10, 0).unwrap();
        let mut store = IndexStore::new(config, Tokenizer::english()).unwrap();
        // windows: "the and of", " aardvarks"
        let n = store.ingest("doc", "the and of aardvarks");
        assert_eq!(n, 1);
        assert_eq!(store.document_chunks("doc")[0].text, " aardvarks");
    }

    #[test]
    fn test_document_chunks_in_order() {
        let mut store = small_store();
        let text = "one two three four five six seven eight nine ten eleven twelve thirteen";
        store.ingest("doc", text);
        let chunks = store.document_chunks("doc");
        assert!(chunks.len() > 1);
        assert!(chunks.windows(2).all(|w| w[0].id < w[1].id));
        assert!(chunks[0].text.starts_with("one"));
    }

    #[test]
    fn test_top_terms_and_clear() {
        let mut store = IndexStore::default();
        store.ingest("a", "rust cargo");
        store.ingest("b", "rust crates");
        let top = store.top_terms(2);
        assert_eq!(top[0], ("rust".to_string(), 2));
        assert_eq!(top[1], ("cargo".to_string(), 1));
        assert_eq!(store.document_ids(), vec!["a", "b"]);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.term_count(), 0);
        assert!(store.document_ids().is_empty());
    }

    #[test]
    fn test_many_documents_stay_consistent() {
        let mut store = small_store();
        for i in 0..20 {
            let text = format!("shared term{} common words appear here and there {}", i % 5, i);
            store.ingest(&format!("doc{}", i % 7), &text);
        }
        for i in 0..7 {
            if i % 2 == 0 {
                store.remove(&format!("doc{}", i));
            }
        }
        assert!(store.frequencies_consistent());
        assert_eq!(store.document_count(), 3);
    }
}
