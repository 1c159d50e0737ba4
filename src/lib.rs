//! # Janet
//!
//! A personal-assistant CLI that answers questions over documents you hand
//! it. Janet extracts text from local files (PDF, plain text, Markdown),
//! indexes it in memory with [`janet_core`], and retrieves the chunks most
//! relevant to a question within a character budget. The retrieved context
//! is what an answer generator receives.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌──────────────────────┐
//! │  Sources  │──▶│  Extract  │──▶│   DocumentSession    │
//! │ walk+glob │   │ PDF / txt │   │ text cache + index   │
//! └───────────┘   └───────────┘   └──────────┬───────────┘
//!                                            │
//!                               ┌────────────┼────────────┐
//!                               ▼            ▼            ▼
//!                          janet query  janet context  janet stats
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! janet query "what does the dog do?" ./papers
//! janet context "summarize the budget" report.pdf notes.md
//! janet stats ./papers --terms 20
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`sources`] | Path arguments → file list |
//! | [`extract`] | PDF and plain-text extraction |
//! | [`session`] | Text cache, index, context building |
//! | [`ingest`] | Session construction from paths |
//! | [`query`] | `query` and `context` commands |
//! | [`stats`] | `stats` command |

pub mod config;
pub mod extract;
pub mod ingest;
pub mod query;
pub mod session;
pub mod sources;
pub mod stats;
