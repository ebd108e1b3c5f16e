use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::io::paths::DataPaths;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::store::Store;

/// Error type for store persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize store: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Load the store. A missing file is an empty store; an unreadable or
/// corrupt one is an error, so history is never silently replaced.
pub fn load_store(paths: &DataPaths) -> Result<Store, StoreError> {
    let path = paths.store_file();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no store yet, starting empty");
        return Ok(Store::new());
    }

    let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let store: Store =
        serde_json::from_str(&content).map_err(|e| StoreError::ParseError { path, source: e })?;
    tracing::debug!(records = store.len(), "loaded store");
    Ok(store)
}

/// Serialize the store the way it is written to disk (indented, trailing
/// newline).
pub fn serialize_store(store: &Store) -> Result<String, StoreError> {
    let mut content = serde_json::to_string_pretty(store)?;
    content.push('\n');
    Ok(content)
}

/// Persist the full store, backing up the previous file first.
///
/// On failure the old file is untouched and the content that could not be
/// written goes to the recovery log.
pub fn save_store(paths: &DataPaths, store: &Store) -> Result<(), StoreError> {
    let path = paths.store_file();
    let content = serialize_store(store)?;

    let result = fs::create_dir_all(&paths.data_dir)
        .and_then(|_| recovery::replace_with_backup(&path, &paths.backup_file(), content.as_bytes()));

    if let Err(e) = result {
        recovery::log_recovery(
            &paths.recovery_log(),
            RecoveryEntry {
                timestamp: Utc::now(),
                category: RecoveryCategory::Write,
                description: "store write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), path.display().to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(StoreError::WriteError { path, source: e });
    }

    tracing::info!(records = store.len(), path = %path.display(), "saved store");
    Ok(())
}
