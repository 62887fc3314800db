// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Disk store — keyed temporary files for interpreter input and output.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use archivwerk_core::error::Result;
use archivwerk_core::types::DiskStoreKey;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Keyed temporary files rooted in a single directory.
///
/// Shared between concurrent conversions; every key is unique, so files never
/// collide.
#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
    /// Owns the root when the store created it; removed on drop.
    _temp_dir: Option<TempDir>,
    files: Mutex<HashMap<DiskStoreKey, PathBuf>>,
}

impl DiskStore {
    /// Store rooted at `dir`, which is created if missing. The root is
    /// canonicalised so that every file path handed out is absolute.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        let root = std::fs::canonicalize(dir.as_ref())?;
        Ok(Self {
            root,
            _temp_dir: None,
            files: Mutex::new(HashMap::new()),
        })
    }

    /// Store rooted at a fresh directory under the system temp dir.
    pub fn in_temp_dir() -> Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("archivwerk-").tempdir()?;
        Ok(Self {
            root: temp_dir.path().to_path_buf(),
            _temp_dir: Some(temp_dir),
            files: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn generate_unique_key(&self) -> DiskStoreKey {
        DiskStoreKey::new()
    }

    /// Register `key` and return the absolute path its file lives at.
    /// The file itself is not created.
    pub fn add_file(&self, key: DiskStoreKey) -> PathBuf {
        let path = self.root.join(key.to_string());
        self.files().insert(key, path.clone());
        path
    }

    /// Path for `key`, only if the key is registered and the file exists.
    pub fn get_file(&self, key: DiskStoreKey) -> Option<PathBuf> {
        self.files()
            .get(&key)
            .filter(|path| path.is_file())
            .cloned()
    }

    /// Delete the file for `key` and forget the key. A missing file is fine.
    pub fn remove_file(&self, key: DiskStoreKey) {
        let Some(path) = self.files().remove(&key) else {
            return;
        };

        match std::fs::remove_file(&path) {
            Ok(()) => debug!(%key, "temporary file removed"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(%key, path = %path.display(), error = %err, "failed to remove temporary file"),
        }
    }

    /// Register `key` and return a guard that removes its file on drop.
    pub fn guard(&self, key: DiskStoreKey) -> TempFileGuard<'_> {
        let path = self.add_file(key);
        TempFileGuard {
            store: self,
            key,
            path,
        }
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn files(&self) -> MutexGuard<'_, HashMap<DiskStoreKey, PathBuf>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes one disk store file when dropped, on every exit path.
#[derive(Debug)]
pub struct TempFileGuard<'a> {
    store: &'a DiskStore,
    key: DiskStoreKey,
    path: PathBuf,
}

impl TempFileGuard<'_> {
    pub fn key(&self) -> DiskStoreKey {
        self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFileGuard<'_> {
    fn drop(&mut self) {
        self.store.remove_file(self.key);
    }
}
