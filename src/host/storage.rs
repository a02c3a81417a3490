//! Persistent settings record.
//!
//! Writes merge per key: a patch carrying only `bestQuality` leaves a stored
//! `selectedQuality` untouched. A patch carrying every key replaces the file
//! without reading it, so a damaged file can always be overwritten.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::StoredSettings;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn get(&self) -> Result<StoredSettings, StorageError>;

    async fn set(&self, patch: StoredSettings) -> Result<(), StorageError>;
}

/// Settings kept as a small JSON document on disk.
pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read(&self) -> Result<StoredSettings, StorageError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredSettings::default()),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&data).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

#[async_trait]
impl SettingsStorage for JsonFileStorage {
    async fn get(&self) -> Result<StoredSettings, StorageError> {
        self.read().await
    }

    async fn set(&self, patch: StoredSettings) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let current = if patch.is_complete() {
            patch
        } else {
            let mut current = match self.read().await {
                Ok(current) => current,
                Err(e @ StorageError::Corrupt { .. }) => {
                    tracing::warn!(error = %e, "discarding unreadable settings file");
                    StoredSettings::default()
                }
                Err(e) => return Err(e),
            };
            current.merge(patch);
            current
        };

        let json = serde_json::to_vec_pretty(&current).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        // Replace in one rename so readers never see a half-written file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;

    /// In-memory storage recording every write.
    #[derive(Default)]
    pub struct MemoryStorage {
        record: Mutex<StoredSettings>,
        writes: Mutex<Vec<StoredSettings>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl MemoryStorage {
        pub fn with(record: StoredSettings) -> Self {
            Self {
                record: Mutex::new(record),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Default::default()
            }
        }

        pub fn unreadable() -> Self {
            Self {
                fail_reads: true,
                ..Default::default()
            }
        }

        pub async fn snapshot(&self) -> StoredSettings {
            self.record.lock().await.clone()
        }

        pub async fn writes(&self) -> Vec<StoredSettings> {
            self.writes.lock().await.clone()
        }
    }

    #[async_trait]
    impl SettingsStorage for MemoryStorage {
        async fn get(&self) -> Result<StoredSettings, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Corrupt {
                    path: PathBuf::from("memory"),
                    source: serde_json::from_str::<StoredSettings>("{truncated").unwrap_err(),
                });
            }
            Ok(self.record.lock().await.clone())
        }

        async fn set(&self, patch: StoredSettings) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Io {
                    path: PathBuf::from("memory"),
                    source: std::io::Error::new(ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.writes.lock().await.push(patch.clone());
            self.record.lock().await.merge(patch);
            Ok(())
        }
    }
}
