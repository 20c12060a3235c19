// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document store over plain filesystem I/O.
//!
//! Each record is one JSON file under a per-entity directory. Writes go to a
//! temp file and are renamed into place, so a crashed write never leaves a
//! half-serialized record behind. Sensitive attributes are ciphertext by the
//! time they reach this layer; see [`crate::storage::crypto`].

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found; the payload is the entity label used in responses
    #[error("{0} non trouvé")]
    NotFound(String),
    /// Uniqueness violated; the payload is the client-facing message
    #[error("{0}")]
    AlreadyExists(String),
    /// Storage not initialized
    #[error("storage not initialized")]
    NotInitialized,
    /// Decryption of a persisted field failed (wrong key or corrupted record)
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// File-backed JSON document store.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    paths: StoragePaths,
    initialized: bool,
}

impl DocumentStore {
    /// Create a new DocumentStore.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Initialize the directory structure.
    ///
    /// Creates the per-entity directories. Safe to call multiple times.
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [
            self.paths.visiteurs_dir(),
            self.paths.praticiens_dir(),
            self.paths.visites_dir(),
            self.paths.motifs_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

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

    /// Check if a record file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a record file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List record ids in a directory (file stems of `.json` entries).
    pub fn list_ids(&self, dir: impl AsRef<Path>) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                    ids.push(id.to_string());
                }
            }
        }
        Ok(ids)
    }
}
