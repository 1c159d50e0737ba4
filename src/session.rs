//! A document session: the raw-text cache plus the retrieval index.
//!
//! One [`DocumentSession`] owns one [`IndexStore`] and the text of every
//! loaded document. Both sit behind a single mutex, so a load or a query
//! always completes before the next one starts. Sessions are independent;
//! two sessions never see each other's documents.
//!
//! # Context building
//!
//! [`DocumentSession::build_context`] produces the text an answer generator
//! would receive for a question:
//!
//! 1. Retrieve with the configured `top_k` / `max_total_chars`.
//! 2. Label each chunk `[Source: <file name>]` and join with blank lines.
//! 3. If retrieval found nothing, fall back to all cached text joined by
//!    newlines and cut to `max_total_chars` characters.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Context, Result};
use janet_core::{IndexConfig, IndexStore, RetrievalRequest, RetrievedChunk, Tokenizer};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::extract::TextExtractor;

struct CachedDocument {
    text: String,
    hash: String,
}

struct SessionState {
    index: IndexStore,
    cache: BTreeMap<String, CachedDocument>,
}

pub struct DocumentSession {
    state: Mutex<SessionState>,
}

/// What happened when a document was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Text was (re-)indexed.
    Indexed { chars: usize, chunks: usize },
    /// Text matched the cached copy; the index was left alone.
    Unchanged,
}

/// Result of loading a batch of files.
#[derive(Debug, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<(String, LoadOutcome)>,
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextStrategy {
    /// Built from retrieved chunks.
    Retrieved,
    /// Retrieval found nothing; built from the raw cached text.
    FullText,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextBlock {
    pub strategy: ContextStrategy,
    pub sources: Vec<RetrievedChunk>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermStat {
    pub term: String,
    pub document_frequency: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub indexed_documents: usize,
    pub chunks: usize,
    pub terms: usize,
    pub cached_chars: usize,
    pub top_terms: Vec<TermStat>,
}

impl DocumentSession {
    pub fn new(config: IndexConfig, tokenizer: Tokenizer) -> Result<Self> {
        let index = IndexStore::new(config, tokenizer).context("Invalid index configuration")?;
        Ok(Self {
            state: Mutex::new(SessionState {
                index,
                cache: BTreeMap::new(),
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("document session lock poisoned"))
    }

    /// Cache `text` under `document_id` and index it.
    ///
    /// Loading the same text again is a no-op reported as
    /// [`LoadOutcome::Unchanged`]; different text replaces the old chunks.
    pub fn load_text(&self, document_id: &str, text: &str) -> Result<LoadOutcome> {
        let hash = content_hash(text);
        let mut state = self.lock()?;

        if state
            .cache
            .get(document_id)
            .is_some_and(|cached| cached.hash == hash)
        {
            debug!(document_id, "text unchanged, skipping re-index");
            return Ok(LoadOutcome::Unchanged);
        }

        let chunks = state.index.ingest(document_id, text);
        state.cache.insert(
            document_id.to_string(),
            CachedDocument {
                text: text.to_string(),
                hash,
            },
        );
        Ok(LoadOutcome::Indexed {
            chars: text.chars().count(),
            chunks,
        })
    }

    /// Extract `path` and load it, keyed by the path as given.
    pub fn load_path(&self, extractor: &dyn TextExtractor, path: &Path) -> Result<LoadOutcome> {
        let text = extractor.extract(path)?;
        self.load_text(&path.display().to_string(), &text)
    }

    /// Load every path, logging and collecting failures instead of aborting.
    pub fn load_sources(&self, extractor: &dyn TextExtractor, paths: &[PathBuf]) -> LoadReport {
        let mut report = LoadReport::default();
        for path in paths {
            let id = path.display().to_string();
            info!(path = %id, "reading document");
            match self.load_path(extractor, path) {
                Ok(outcome) => {
                    match outcome {
                        LoadOutcome::Indexed { chars, chunks } => {
                            info!(path = %id, chars, chunks, "indexed document");
                        }
                        LoadOutcome::Unchanged => info!(path = %id, "document unchanged"),
                    }
                    report.loaded.push((id, outcome));
                }
                Err(e) => {
                    warn!(path = %id, error = %e, "failed to load document");
                    report.failed.push((id, e.to_string()));
                }
            }
        }
        report
    }

    /// Drop a document from the cache and the index. Returns whether it was loaded.
    pub fn forget(&self, document_id: &str) -> Result<bool> {
        let mut state = self.lock()?;
        state.index.remove(document_id);
        Ok(state.cache.remove(document_id).is_some())
    }

    pub fn document_count(&self) -> Result<usize> {
        Ok(self.lock()?.cache.len())
    }

    pub fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        max_total_chars: usize,
        explain: bool,
    ) -> Result<Vec<RetrievedChunk>> {
        let state = self.lock()?;
        let req = RetrievalRequest::new(query, top_k, max_total_chars).with_explain(explain);
        Ok(janet_core::retrieve(&state.index, &req))
    }

    pub fn retrieve_default(&self, query: &str) -> Result<Vec<RetrievedChunk>> {
        Ok(self.lock()?.index.retrieve_default(query))
    }

    /// Build the labeled context for `question`, falling back to raw text
    /// when retrieval comes back empty. Errors if nothing is loaded.
    pub fn build_context(&self, question: &str) -> Result<ContextBlock> {
        let state = self.lock()?;
        if state.cache.is_empty() {
            bail!("No documents loaded yet");
        }

        let sources = state.index.retrieve_default(question);
        if sources.is_empty() {
            info!("no relevant chunks found; using all cached text");
            let max_chars = state.index.config().max_total_chars;
            let joined = state
                .cache
                .values()
                .map(|d| d.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(ContextBlock {
                strategy: ContextStrategy::FullText,
                sources,
                text: joined.chars().take(max_chars).collect(),
            });
        }

        let text = sources
            .iter()
            .map(|s| format!("[Source: {}]\n{}", source_label(&s.document_id), s.text))
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(ContextBlock {
            strategy: ContextStrategy::Retrieved,
            sources,
            text,
        })
    }

    pub fn stats(&self, top_terms: usize) -> Result<IndexStats> {
        let state = self.lock()?;
        Ok(IndexStats {
            documents: state.cache.len(),
            indexed_documents: state.index.document_count(),
            chunks: state.index.chunk_count(),
            terms: state.index.term_count(),
            cached_chars: state.cache.values().map(|d| d.text.chars().count()).sum(),
            top_terms: state
                .index
                .top_terms(top_terms)
                .into_iter()
                .map(|(term, document_frequency)| TermStat {
                    term,
                    document_frequency,
                })
                .collect(),
        })
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new(IndexConfig::default(), Tokenizer::english())
            .expect("default index configuration is valid")
    }
}

/// File name of a path-like document id, or the id itself.
pub fn source_label(document_id: &str) -> String {
    Path::new(document_id)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| document_id.to_string())
}

fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractError;

    struct MapExtractor(BTreeMap<PathBuf, &'static str>);

    impl TextExtractor for MapExtractor {
        fn extract(&self, path: &Path) -> Result<String, ExtractError> {
            self.0
                .get(path)
                .map(|t| t.to_string())
                .ok_or_else(|| ExtractError::NotUtf8 {
                    path: path.display().to_string(),
                })
        }
    }

    fn small_session() -> DocumentSession {
        let config = IndexConfig::new(40, 5).unwrap().with_retrieval(2, 500).unwrap();
        DocumentSession::new(config, Tokenizer::english()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_index_config() {
        let config = IndexConfig {
            chunk_size: 10,
            chunk_overlap: 10,
            ..IndexConfig::default()
        };
        let err = DocumentSession::new(config, Tokenizer::english())
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("chunk_overlap"));
    }

    #[test]
    fn test_load_then_reload_unchanged() {
        let session = small_session();
        let first = session.load_text("a.pdf", "The lazy dog sleeps.").unwrap();
        assert!(matches!(first, LoadOutcome::Indexed { chunks: 1, chars: 20 }));
        let second = session.load_text("a.pdf", "The lazy dog sleeps.").unwrap();
        assert_eq!(second, LoadOutcome::Unchanged);
        let third = session.load_text("a.pdf", "The busy cat hunts.").unwrap();
        assert!(matches!(third, LoadOutcome::Indexed { .. }));

        let stats = session.stats(10).unwrap();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.chunks, 1);
        assert!(stats.top_terms.iter().all(|t| t.term != "dog"));
    }

    #[test]
    fn test_build_context_labels_sources() {
        let session = small_session();
        session
            .load_text(
                "/papers/doc1.pdf",
                "The quick brown fox jumps over the lazy dog. The dog barks.",
            )
            .unwrap();
        session
            .load_text("/papers/doc2.pdf", "Cats chase mice in the garden every evening.")
            .unwrap();

        let block = session.build_context("dog").unwrap();
        assert_eq!(block.strategy, ContextStrategy::Retrieved);
        assert!(block.text.starts_with("[Source: doc1.pdf]\n"));
        assert!(!block.text.contains("doc2.pdf"));
        assert!(block.sources.iter().all(|s| s.document_id == "/papers/doc1.pdf"));
    }

    #[test]
    fn test_build_context_falls_back_to_full_text() {
        let config = IndexConfig::default().with_retrieval(4, 10).unwrap();
        let session = DocumentSession::new(config, Tokenizer::english()).unwrap();
        session.load_text("a.txt", "alpha beta gamma").unwrap();
        session.load_text("b.txt", "delta").unwrap();

        let block = session.build_context("unrelated question").unwrap();
        assert_eq!(block.strategy, ContextStrategy::FullText);
        assert!(block.sources.is_empty());
        assert_eq!(block.text, "alpha beta");
    }

    #[test]
    fn test_build_context_without_documents_errors() {
        let session = DocumentSession::default();
        assert!(session.build_context("anything").is_err());
    }

    #[test]
    fn test_forget_removes_from_index_and_cache() {
        let session = DocumentSession::default();
        session.load_text("A", "xylophone music").unwrap();
        assert!(session.forget("A").unwrap());
        assert!(!session.forget("A").unwrap());
        assert!(session.retrieve("xylophone", 4, 1000, false).unwrap().is_empty());
        assert_eq!(session.document_count().unwrap(), 0);
    }

    #[test]
    fn test_load_sources_collects_failures() {
        let mut texts = BTreeMap::new();
        texts.insert(PathBuf::from("good.txt"), "Quarterly budget report");
        let extractor = MapExtractor(texts);
        let session = DocumentSession::default();

        let report = session.load_sources(
            &extractor,
            &[PathBuf::from("good.txt"), PathBuf::from("missing.txt")],
        );
        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "missing.txt");

        let hits = session.retrieve_default("budget").unwrap();
        assert_eq!(hits[0].document_id, "good.txt");
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = DocumentSession::default();
        let b = DocumentSession::default();
        a.load_text("doc", "independent sessions").unwrap();
        assert!(b.retrieve_default("independent").unwrap().is_empty());
        assert_eq!(a.retrieve_default("independent").unwrap().len(), 1);
    }

    #[test]
    fn test_source_label() {
        assert_eq!(source_label("/tmp/papers/report.pdf"), "report.pdf");
        assert_eq!(source_label("report.pdf"), "report.pdf");
        assert_eq!(source_label(""), "");
    }
}
