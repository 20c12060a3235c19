// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Motif repository. Motifs are plain labels with no relations.

use crate::models::Motif;
use crate::storage::paths::is_valid_id;
use crate::storage::{DocumentStore, StorageError, StorageResult};

/// Repository for motif records.
pub struct MotifRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> MotifRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a motif exists.
    pub fn exists(&self, motif_id: &str) -> bool {
        is_valid_id(motif_id) && self.store.exists(self.store.paths().motif(motif_id))
    }

    /// Get a motif by id.
    pub fn get(&self, motif_id: &str) -> StorageResult<Motif> {
        if !is_valid_id(motif_id) {
            return Err(StorageError::NotFound("Motif".to_string()));
        }
        let path = self.store.paths().motif(motif_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound("Motif".to_string()));
        }
        self.store.read_json(path)
    }

    /// Persist a new motif. Returns its generated id.
    pub fn create(&self, libelle: &str) -> StorageResult<String> {
        let motif = Motif {
            id: uuid::Uuid::new_v4().to_string(),
            libelle: libelle.to_string(),
        };
        self.store
            .write_json(self.store.paths().motif(&motif.id), &motif)?;
        Ok(motif.id)
    }

    /// Replace a motif's label.
    pub fn update(&self, motif_id: &str, libelle: &str) -> StorageResult<Motif> {
        let mut motif = self.get(motif_id)?;
        motif.libelle = libelle.to_string();
        self.store
            .write_json(self.store.paths().motif(motif_id), &motif)?;
        Ok(motif)
    }

    /// Delete a motif.
    pub fn delete(&self, motif_id: &str) -> StorageResult<()> {
        if !self.exists(motif_id) {
            return Err(StorageError::NotFound("Motif".to_string()));
        }
        self.store.delete(self.store.paths().motif(motif_id))
    }

    /// List all motifs.
    pub fn list(&self) -> StorageResult<Vec<Motif>> {
        let ids = self.store.list_ids(self.store.paths().motifs_dir())?;

        let mut motifs = Vec::with_capacity(ids.len());
        for id in ids {
            motifs.push(self.get(&id)?);
        }
        Ok(motifs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use std::env;
    use std::fs;

    fn test_store() -> DocumentStore {
        let test_dir = env::temp_dir().join(format!("test-motif-repo-{}", uuid::Uuid::new_v4()));
        let paths = StoragePaths::new(&test_dir);
        let mut store = DocumentStore::new(paths);
        store.initialize().expect("Failed to initialize");
        store
    }

    fn cleanup(store: &DocumentStore) {
        let _ = fs::remove_dir_all(store.paths().root());
    }

    #[test]
    fn create_get_update_delete() {
        let store = test_store();
        let repo = MotifRepository::new(&store);

        let id = repo.create("Lancement produit").unwrap();
        assert_eq!(repo.get(&id).unwrap().libelle, "Lancement produit");

        let updated = repo.update(&id, "Suivi trimestriel").unwrap();
        assert_eq!(updated.libelle, "Suivi trimestriel");

        repo.delete(&id).unwrap();
        assert!(matches!(repo.get(&id), Err(StorageError::NotFound(_))));

        cleanup(&store);
    }

    #[test]
    fn list_returns_all_motifs() {
        let store = test_store();
        let repo = MotifRepository::new(&store);

        repo.create("Motif A").unwrap();
        repo.create("Motif B").unwrap();

        let motifs = repo.list().unwrap();
        assert_eq!(motifs.len(), 2);

        cleanup(&store);
    }
}
