//! `janet query` and `janet context`.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;
use crate::ingest::open_session;
use crate::session::{source_label, ContextStrategy};

/// Options for `janet query`, overriding config defaults where set.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub top_k: Option<usize>,
    pub max_chars: Option<usize>,
    pub explain: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    documents: usize,
    results: &'a [janet_core::RetrievedChunk],
}

pub fn run_query(
    config: &Config,
    question: &str,
    paths: &[PathBuf],
    opts: &QueryOptions,
) -> Result<()> {
    let (session, report) = open_session(config, paths)?;
    let top_k = opts.top_k.unwrap_or(config.retrieval.top_k);
    let max_chars = opts.max_chars.unwrap_or(config.retrieval.max_total_chars);

    let results = session.retrieve(question, top_k, max_chars, opts.explain)?;

    if opts.json {
        let output = QueryOutput {
            query: question,
            documents: report.loaded.len(),
            results: &results,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in results.iter().enumerate() {
        println!(
            "{}. [{:.3}] {} (chunk {})",
            i + 1,
            hit.score,
            source_label(&hit.document_id),
            hit.chunk_id
        );
        println!("    path: {}", hit.document_id);
        println!("    chars: {}", hit.text.chars().count());
        if let Some(ref explain) = hit.explain {
            println!(
                "    explain: dot={:.3} query_norm={:.3} chunk_norm={:.3} avg_idf={:.3} terms=[{}]",
                explain.dot,
                explain.query_norm,
                explain.chunk_norm,
                explain.average_idf,
                explain.matched_terms.join(", ")
            );
        }
        println!("    excerpt: \"{}\"", excerpt(&hit.text, 240));
        println!();
    }

    Ok(())
}

pub fn run_context(config: &Config, question: &str, paths: &[PathBuf], json: bool) -> Result<()> {
    let (session, _report) = open_session(config, paths)?;
    let block = session.build_context(question)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&block)?);
        return Ok(());
    }

    if block.strategy == ContextStrategy::FullText {
        eprintln!("No relevant chunks found; falling back to all loaded text.");
    }
    println!("{}", block.text);
    Ok(())
}

/// First `max` characters of `text` on one line.
fn excerpt(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{}…", cut)
    }
}
