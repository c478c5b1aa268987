//! Loading and committing stores to their backing files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ConfigStore, StoreError, codec};

/// Returns the path unless it is absent or empty.
fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Loads a store from `path`.
///
/// `None` or an empty path yields an empty store (in-memory mode).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: Option<&Path>) -> Result<ConfigStore, StoreError> {
    let Some(path) = non_empty(path) else {
        return Ok(ConfigStore::new());
    };

    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let store = codec::parse(&content, path)?;
    tracing::debug!(path = %path.display(), entries = store.len(), "Loaded config file");
    Ok(store)
}

/// Loads a store from `path`, treating a missing file as empty.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_optional(path: Option<&Path>) -> Result<ConfigStore, StoreError> {
    match load(path) {
        Err(StoreError::Read { path, source }) if source.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Config file not found, skipping");
            Ok(ConfigStore::new())
        }
        other => other,
    }
}

/// Writes the full content of `store` to `path`.
///
/// `None` or an empty path is a successful no-op.
///
/// # Atomic Writes
///
/// Uses the write-to-temp-then-rename pattern:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// Readers observe either the previous or the new content.
///
/// # Errors
///
/// Returns an error if the store cannot be rendered or written.
pub fn commit(store: &ConfigStore, path: Option<&Path>) -> Result<(), StoreError> {
    let Some(path) = non_empty(path) else {
        return Ok(());
    };

    let content = codec::render(store)?;
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    // config.toml -> config.toml.tmp
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

    std::fs::write(&temp_path, content).map_err(write_err)?;
    std::fs::rename(&temp_path, path).map_err(write_err)?;

    tracing::debug!(path = %path.display(), entries = store.len(), "Committed config file");
    Ok(())
}
