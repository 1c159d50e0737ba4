//! # Janet Core
//!
//! In-memory document retrieval index for Janet: tokenizer, sliding-window
//! chunker, chunk store with document-frequency bookkeeping, and a TF-IDF
//! retriever with a character budget.
//!
//! This crate performs no I/O. Callers hand it `(document_id, text)` pairs
//! and get back `(document_id, text)` fragments; extracting text from source
//! files and generating answers happen elsewhere.
//!
//! # Example
//!
//! ```rust
//! use janet_core::{IndexConfig, IndexStore, Tokenizer};
//!
//! let config = IndexConfig::new(40, 5).unwrap();
//! let mut index = IndexStore::new(config, Tokenizer::english()).unwrap();
//! index.ingest("doc1", "The quick brown fox jumps over the lazy dog. The dog barks.");
//! index.ingest("doc2", "Cats chase mice in the garden every evening.");
//!
//! let hits = index.retrieve("dog", 2, 500);
//! assert!(!hits.is_empty());
//! assert!(hits.iter().all(|h| h.document_id == "doc1"));
//! ```

pub mod chunk;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod search;
pub mod tokenize;

pub use config::IndexConfig;
pub use error::{IndexError, Result};
pub use index::IndexStore;
pub use models::{Chunk, RetrievedChunk, ScoreExplanation};
pub use search::{retrieve, RetrievalRequest};
pub use tokenize::Tokenizer;
