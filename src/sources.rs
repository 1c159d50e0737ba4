//! Resolve CLI path arguments into the list of files to load.
//!
//! Files named directly are taken as-is. Directories are walked and
//! filtered by the `[sources]` include/exclude globs, matched against the
//! path relative to that directory. The result is de-duplicated and keeps
//! argument order; files found inside one directory are sorted.

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::SourcesConfig;

pub fn resolve_sources(paths: &[PathBuf], config: &SourcesConfig) -> Result<Vec<PathBuf>> {
    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if within_size_limit(path, config.max_file_bytes) && seen.insert(path.clone()) {
                files.push(path.clone());
            }
            continue;
        }
        if !path.is_dir() {
            bail!("Source path does not exist: {}", path.display());
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(path).follow_links(config.follow_symlinks);
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file = entry.path();
            let relative = file.strip_prefix(path).unwrap_or(file);
            let rel_str = relative.to_string_lossy().to_string();

            if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
                continue;
            }
            if !within_size_limit(file, config.max_file_bytes) {
                continue;
            }
            found.push(file.to_path_buf());
        }

        // Sort for deterministic ordering
        found.sort();
        for file in found {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    Ok(files)
}

fn within_size_limit(path: &Path, max_bytes: u64) -> bool {
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if size > max_bytes {
        warn!(
            path = %path.display(),
            size,
            max_bytes,
            "skipping file larger than sources.max_file_bytes"
        );
        return false;
    }
    true
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
