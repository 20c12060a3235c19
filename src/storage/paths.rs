// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the document store layout.

use std::path::{Path, PathBuf};

/// Default base directory for all persistent documents.
pub const DATA_ROOT: &str = "/data";

/// Whether an id is safe to use as a file stem.
///
/// Server-generated ids are UUIDs, but ids also arrive from route segments,
/// which axum does not percent-decode before matching. Anything with path
/// syntax (`/`, `\`, `..`) must never reach a filesystem path, or a request
/// against one entity could address another entity's records.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Storage path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Visiteur Paths ==========

    /// Directory containing all visiteur records.
    pub fn visiteurs_dir(&self) -> PathBuf {
        self.root.join("visiteurs")
    }

    /// Path to a specific visiteur record.
    pub fn visiteur(&self, visiteur_id: &str) -> PathBuf {
        self.visiteurs_dir().join(format!("{visiteur_id}.json"))
    }

    // ========== Praticien Paths ==========

    /// Directory containing all praticien records.
    pub fn praticiens_dir(&self) -> PathBuf {
        self.root.join("praticiens")
    }

    /// Path to a specific praticien record.
    pub fn praticien(&self, praticien_id: &str) -> PathBuf {
        self.praticiens_dir().join(format!("{praticien_id}.json"))
    }

    // ========== Visite Paths ==========

    /// Directory containing all visite records.
    pub fn visites_dir(&self) -> PathBuf {
        self.root.join("visites")
    }

    /// Path to a specific visite record.
    pub fn visite(&self, visite_id: &str) -> PathBuf {
        self.visites_dir().join(format!("{visite_id}.json"))
    }

    // ========== Motif Paths ==========

    /// Directory containing all motif records.
    pub fn motifs_dir(&self) -> PathBuf {
        self.root.join("motifs")
    }

    /// Path to a specific motif record.
    pub fn motif(&self, motif_id: &str) -> PathBuf {
        self.motifs_dir().join(format!("{motif_id}.json"))
    }
}
