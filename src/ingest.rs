//! Build a document session from CLI path arguments.
//!
//! Resolves paths into files, extracts each one, and loads it into a fresh
//! [`DocumentSession`]. Individual failures are logged and skipped; only a
//! bad config or a missing path aborts.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::extract::FileExtractor;
use crate::session::{DocumentSession, LoadReport};
use crate::sources::resolve_sources;

pub fn open_session(config: &Config, paths: &[PathBuf]) -> Result<(DocumentSession, LoadReport)> {
    let session = DocumentSession::new(config.index_config()?, config.tokenizer())?;
    let files = resolve_sources(paths, &config.sources)?;
    let report = session.load_sources(&FileExtractor, &files);
    Ok((session, report))
}
