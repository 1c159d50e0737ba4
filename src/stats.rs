//! Index statistics.
//!
//! Loads the given paths and prints what the index holds: document and
//! chunk counts, vocabulary size, and the most widespread terms. Useful for
//! tuning chunk size and stopwords before asking questions.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::ingest::open_session;

pub fn run_stats(config: &Config, paths: &[PathBuf], top_terms: usize, json: bool) -> Result<()> {
    let (session, report) = open_session(config, paths)?;
    let stats = session.stats(top_terms)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Janet — Index Stats");
    println!("===================");
    println!();
    println!("  Chunk size:    {}", config.chunking.chunk_size);
    println!("  Overlap:       {}", config.chunking.chunk_overlap);
    println!();
    println!("  Documents:     {}", stats.documents);
    println!("  Indexed:       {}", stats.indexed_documents);
    println!("  Failed:        {}", report.failed.len());
    println!("  Chunks:        {}", stats.chunks);
    println!("  Terms:         {}", stats.terms);
    println!("  Characters:    {}", stats.cached_chars);

    if !stats.top_terms.is_empty() {
        println!();
        println!("  Top terms (by chunk frequency):");
        for t in &stats.top_terms {
            println!("    {:<24} {}", t.term, t.document_frequency);
        }
    }

    Ok(())
}
