//! # Janet CLI (`janet`)
//!
//! Loads documents into an in-memory index and retrieves the passages most
//! relevant to a question. The index lives only for one invocation.
//!
//! ## Usage
//!
//! ```bash
//! janet [--config ./config/janet.toml] [-v] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `janet query "<question>" <paths>...` | Rank chunks for a question |
//! | `janet context "<question>" <paths>...` | Print the labeled context block |
//! | `janet stats <paths>...` | Show index statistics |

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use janet::config::resolve_config;
use janet::query::{run_context, run_query, QueryOptions};
use janet::stats::run_stats;

const DEFAULT_CONFIG_PATH: &str = "./config/janet.toml";

/// Janet — answer questions over your documents with a local TF-IDF index.
#[derive(Parser)]
#[command(
    name = "janet",
    about = "Janet — answer questions over your documents with a local TF-IDF index",
    version,
    long_about = "Janet extracts text from PDFs and text files, splits it into overlapping \
    chunks, and retrieves the chunks most relevant to a question within a character budget."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/janet.toml` when that file exists; otherwise
    /// built-in defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank document chunks for a question.
    ///
    /// Loads every path (files, or directories filtered by `[sources]`
    /// globs), then prints the top chunks that fit the character budget.
    Query {
        /// The question or search terms.
        question: String,

        /// Files or directories to load.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Maximum number of chunks to return.
        #[arg(long)]
        top_k: Option<usize>,

        /// Maximum total characters across returned chunks.
        #[arg(long)]
        max_chars: Option<usize>,

        /// Show the scoring breakdown for each chunk.
        #[arg(long)]
        explain: bool,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the context block an answer generator would receive.
    ///
    /// Chunks are labeled with their source file name. When nothing
    /// matches, all loaded text is used instead, cut to the budget.
    Context {
        /// The question.
        question: String,

        /// Files or directories to load.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the block as JSON, including the chunks it was built from.
        #[arg(long)]
        json: bool,
    },

    /// Show index statistics for a set of documents.
    Stats {
        /// Files or directories to load.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Number of most frequent terms to list.
        #[arg(long, default_value_t = 10)]
        terms: usize,

        /// Print statistics as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "janet=warn,janet_core=warn",
        1 => "janet=info,janet_core=info",
        _ => "janet=debug,janet_core=debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))?;

    match cli.command {
        Commands::Query {
            question,
            paths,
            top_k,
            max_chars,
            explain,
            json,
        } => {
            let opts = QueryOptions {
                top_k,
                max_chars,
                explain,
                json,
            };
            run_query(&config, &question, &paths, &opts)?;
        }
        Commands::Context {
            question,
            paths,
            json,
        } => {
            run_context(&config, &question, &paths, json)?;
        }
        Commands::Stats { paths, terms, json } => {
            run_stats(&config, &paths, terms, json)?;
        }
    }

    Ok(())
}
