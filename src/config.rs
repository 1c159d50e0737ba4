//! TOML configuration for the `janet` CLI.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults below. See `config/janet.example.toml`.

use anyhow::{bail, Context, Result};
use janet_core::config::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_TOTAL_CHARS, DEFAULT_TOP_K,
};
use janet_core::tokenize::ENGLISH_STOPWORDS;
use janet_core::{IndexConfig, Tokenizer};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_total_chars")]
    pub max_total_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_total_chars: default_max_total_chars(),
        }
    }
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_max_total_chars() -> usize {
    DEFAULT_MAX_TOTAL_CHARS
}

/// Stopword overrides. `stopwords` replaces the built-in English list;
/// `extra_stopwords` is appended to whichever list is in effect.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub stopwords: Option<Vec<String>>,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec![
        "**/*.pdf".to_string(),
        "**/*.txt".to_string(),
        "**/*.md".to_string(),
    ]
}
fn default_max_file_bytes() -> u64 {
    50 * 1024 * 1024
}

impl Config {
    /// Chunk geometry and retrieval defaults for the index. Range checks
    /// live in [`IndexConfig::validate`].
    pub fn index_config(&self) -> Result<IndexConfig> {
        let config = IndexConfig::new(self.chunking.chunk_size, self.chunking.chunk_overlap)
            .and_then(|c| c.with_retrieval(self.retrieval.top_k, self.retrieval.max_total_chars))
            .context("Invalid [chunking] or [retrieval] settings")?;
        Ok(config)
    }

    pub fn tokenizer(&self) -> Tokenizer {
        let base: Vec<String> = match &self.tokenizer.stopwords {
            Some(list) => list.clone(),
            None => ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        };
        Tokenizer::with_stopwords(base.into_iter().chain(self.tokenizer.extra_stopwords.clone()))
    }

    pub fn validate(&self) -> Result<()> {
        self.index_config()?;
        if self.sources.include_globs.is_empty() {
            bail!("sources.include_globs must not be empty");
        }
        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Load `path` if given (it must exist), else `default_path` if it exists,
/// else built-in defaults.
pub fn resolve_config(path: Option<&Path>, default_path: &Path) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None if default_path.exists() => load_config(default_path),
        None => Ok(Config::default()),
    }
}
