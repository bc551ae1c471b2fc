// ABOUTME: Durable key-value medium behind the local emulated store
// ABOUTME: One serialized-text value per fixed key; file-backed or in-memory
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The serialized-text medium the local store persists through.
//!
//! The medium stores opaque UTF-8 text under fixed keys; the local store
//! layers JSON table collections and the identity slot on top. [`FileKv`]
//! is the durable per-installation implementation (one file per key under a
//! data directory); [`MemoryKv`] is ephemeral and exists for tests and
//! scratch use.
//!
//! Writes replace the whole value for a key. Two processes sharing one data
//! directory are uncoordinated writers: a read-modify-write pair in each can
//! silently drop one side's write. That lost-update race is an accepted
//! limitation of local-development storage, not a contract violation.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A durable (or test-scoped) string-to-string medium.
pub trait KeyValueMedium: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written durably.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`; removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be modified.
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed medium: one UTF-8 text file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Open (creating if needed) a medium rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
        Ok(Self {
            root: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed, crate-chosen names; sanitize anyway so a stray
        // separator cannot escape the data directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl KeyValueMedium for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("reading stored value {}", path.display()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("writing stored value {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("removing stored value {}", path.display()))
            }
        }
    }
}

/// Ephemeral in-memory medium for tests and scratch use.
#[derive(Debug, Default)]
pub struct MemoryKv {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    /// Create an empty medium.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueMedium for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory medium poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory medium poisoned"))?;
        map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory medium poisoned"))?;
        map.remove(key);
        Ok(())
    }
}
