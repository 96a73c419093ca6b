// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Filesystem-backed document storage.
//!
//! Each namespace is a single JSON document under the data directory. Writes
//! go to a temp file first and are renamed into place, so a failed write
//! never corrupts the previously persisted document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store over a local data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    paths: StoragePaths,
}

impl LocalStore {
    /// Open a store rooted at the given paths, creating the data directory
    /// if needed. Safe to call multiple times (idempotent).
    pub fn open(paths: StoragePaths) -> StoreResult<Self> {
        fs::create_dir_all(paths.root())?;
        Ok(Self { paths })
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Check if a document exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        File::open(path.as_ref()).is_ok()
    }

    /// Read a JSON document and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StoreResult<T> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON document (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StoreResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}
