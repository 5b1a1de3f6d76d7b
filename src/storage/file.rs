//! Key-value store backed by a directory of JSON files
//!
//! Each key is one file, `<dir>/<key>.json`. Every write goes to its own
//! uniquely named temporary file in the same directory, which is then renamed
//! into place. Readers never see a half-written value, and concurrent writes
//! to one key never share a temporary file; the last rename wins.

use crate::config::ListingConfig;
use crate::core::error::{ConfigError, PreferenceError};
use crate::core::service::KeyValueStore;
use anyhow::Result;
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Use `dir` for storage; it is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the configured `preferences_dir`
    pub fn from_config(config: &ListingConfig) -> Result<Self> {
        match config.preferences_dir.as_deref() {
            Some(dir) if !dir.is_empty() => Ok(Self::new(dir)),
            _ => Err(ConfigError::InvalidValue {
                field: "preferences_dir".to_string(),
                value: String::new(),
                message: "required for the file preference store".to_string(),
            }
            .into()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`
    ///
    /// Characters outside `[A-Za-z0-9_-]` are hex-escaped so a key can never
    /// name a path outside the store directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' => name.push(byte as char),
                _ => name.push_str(&format!("%{:02X}", byte)),
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

fn storage_error(key: &str, err: impl std::fmt::Display) -> PreferenceError {
    PreferenceError::Storage {
        key: key.to_string(),
        message: err.to_string(),
    }
}

/// Write `value` to a fresh temporary file in `dir`, then rename it to `path`
fn write_atomic(dir: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".write-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(key, e).into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(key, e))?;

        let path = self.path_for(key);
        let (dir, target, value) = (self.dir.clone(), path.clone(), value.to_string());
        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &value))
            .await
            .map_err(|e| storage_error(key, e))?
            .map_err(|e| storage_error(key, e))?;

        tracing::debug!(key, path = %path.display(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(key, e).into()),
        }
    }
}
