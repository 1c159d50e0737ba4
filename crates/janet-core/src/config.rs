//! Construction-time settings for an [`IndexStore`](crate::IndexStore).

use crate::error::{IndexError, Result};

/// Characters per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1200;
/// Characters shared between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Chunks returned by a query when the caller does not say otherwise.
pub const DEFAULT_TOP_K: usize = 4;
/// Character budget for one query's results.
pub const DEFAULT_MAX_TOTAL_CHARS: usize = 12_000;

/// Chunking geometry and retrieval defaults.
///
/// Build through [`IndexConfig::new`]. A config assembled by hand is
/// checked again by `IndexStore::new`, so a store never holds an invalid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub max_total_chars: usize,
}

impl IndexConfig {
    /// Build a config with the given chunk geometry and default retrieval settings.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let config = Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the retrieval defaults used by `retrieve_default`.
    pub fn with_retrieval(mut self, top_k: usize, max_total_chars: usize) -> Result<Self> {
        self.top_k = top_k;
        self.max_total_chars = max_total_chars;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(IndexError::InvalidConfiguration(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(IndexError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be < chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(IndexError::InvalidConfiguration(
                "top_k must be >= 1".to_string(),
            ));
        }
        if self.max_total_chars == 0 {
            return Err(IndexError::InvalidConfiguration(
                "max_total_chars must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            max_total_chars: DEFAULT_MAX_TOTAL_CHARS,
        }
    }
}
