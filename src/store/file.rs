// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed key-value store.
//!
//! All entries live in one JSON object file. Every write rewrites the file
//! through a temporary sibling and a rename, so readers never observe a
//! half-written file. An unreadable or corrupt file at open time degrades
//! to an empty store rather than failing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;

use crate::store::KeyValueStore;

/// Persistent key-value store backed by a single JSON file.
pub struct FileStore {
    path: PathBuf,
    // Guards the read-modify-write cycle within this process. Two processes
    // sharing one path still race (last write wins).
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading any existing entries.
    ///
    /// A missing file starts empty; a corrupt file is logged and treated as
    /// empty, matching how the rest of the crate handles storage corruption.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Store file is corrupt, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).context(format!("failed reading store file {}", path.display()));
            }
        };

        tracing::debug!(path = %path.display(), count = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Write the full entry map out through a temp file and rename.
    fn persist(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let serialized =
            serde_json::to_string_pretty(entries).context("failed serializing store entries")?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serialized)
            .with_context(|| format!("failed writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed replacing {}", self.path.display()))?;

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned lock only means another thread panicked mid-write; the
        // map itself is still usable.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
