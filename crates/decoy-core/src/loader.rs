//! Preloading of rule definitions from a directory.
//!
//! The loader is the store's external collaborator: it scans a directory for
//! `.json` rule files, parses them in lexicographic filename order, and adds
//! every rule to the store before resolving. A file holds either a single
//! rule object or a top-level array of rules (added in array order).
//!
//! Any unreadable or malformed file aborts the whole preload with an error;
//! nothing after the failing file is added, so the store's insertion order
//! can never be silently corrupted by a partial load.

use crate::rule::Rule;
use crate::store::RuleStore;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by [`preload`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read rule directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read rule file {file}: {source}")]
    ReadFile {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse rule file {file}: {source}")]
    Parse {
        file: PathBuf,
        source: serde_json::Error,
    },
}

/// Scan `dir` for `.json` rule files and add their rules to `store` in
/// filename-sorted order. Returns the number of rules added.
pub async fn preload(store: &RuleStore, dir: impl AsRef<Path>) -> Result<usize, LoadError> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|source| {
        LoadError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        }
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|source| {
        LoadError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        }
    })? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    // Lexicographic filename order keeps preload deterministic.
    files.sort();

    let mut loaded = 0;
    for file in &files {
        let count = load_file(store, file).await?;
        debug!(file = %file.display(), rules = count, "loaded rule file");
        loaded += count;
    }

    info!(dir = %dir.display(), files = files.len(), rules = loaded, "preload complete");
    Ok(loaded)
}

async fn load_file(store: &RuleStore, file: &Path) -> Result<usize, LoadError> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| LoadError::ReadFile {
            file: file.to_path_buf(),
            source,
        })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            file: file.to_path_buf(),
            source,
        })?;

    let rules: Vec<Rule> = match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(|source| LoadError::Parse {
                file: file.to_path_buf(),
                source,
            })?
        }
        other => vec![serde_json::from_value(other).map_err(|source| LoadError::Parse {
            file: file.to_path_buf(),
            source,
        })?],
    };

    let count = rules.len();
    for rule in rules {
        store.add(rule);
    }
    Ok(count)
}
