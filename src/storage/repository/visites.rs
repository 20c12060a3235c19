// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Visite repository.
//!
//! Visites carry no identifying attributes, so records are stored as-is with
//! no field encryption. References to visiteur/praticien/motif are ids only.

use crate::models::{UpdateVisiteRequest, Visite};
use crate::storage::paths::is_valid_id;
use crate::storage::{DocumentStore, StorageError, StorageResult};

/// Repository for visite records.
pub struct VisiteRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> VisiteRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a visite exists.
    pub fn exists(&self, visite_id: &str) -> bool {
        is_valid_id(visite_id) && self.store.exists(self.store.paths().visite(visite_id))
    }

    /// Get a visite by id.
    pub fn get(&self, visite_id: &str) -> StorageResult<Visite> {
        if !is_valid_id(visite_id) {
            return Err(StorageError::NotFound("Visite".to_string()));
        }
        let path = self.store.paths().visite(visite_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound("Visite".to_string()));
        }
        self.store.read_json(path)
    }

    /// Persist a new visite. Returns its generated id.
    pub fn create(&self, visite: Visite) -> StorageResult<String> {
        let id = visite.id.clone();
        self.store
            .write_json(self.store.paths().visite(&id), &visite)?;
        Ok(id)
    }

    /// Apply a whitelisted update. Absent fields keep their stored value.
    pub fn update(&self, visite_id: &str, changes: &UpdateVisiteRequest) -> StorageResult<Visite> {
        let mut visite = self.get(visite_id)?;

        if let Some(date_visite) = changes.date_visite {
            visite.date_visite = date_visite;
        }
        if let Some(commentaire) = &changes.commentaire {
            visite.commentaire = Some(commentaire.clone());
        }
        if let Some(visiteur) = &changes.visiteur {
            visite.visiteur = visiteur.clone();
        }
        if let Some(praticien) = &changes.praticien {
            visite.praticien = praticien.clone();
        }
        if let Some(motif) = &changes.motif {
            visite.motif = motif.clone();
        }

        self.store
            .write_json(self.store.paths().visite(visite_id), &visite)?;
        Ok(visite)
    }

    /// Delete a visite.
    pub fn delete(&self, visite_id: &str) -> StorageResult<()> {
        if !self.exists(visite_id) {
            return Err(StorageError::NotFound("Visite".to_string()));
        }
        self.store.delete(self.store.paths().visite(visite_id))
    }

    /// List all visites.
    pub fn list(&self) -> StorageResult<Vec<Visite>> {
        let ids = self.store.list_ids(self.store.paths().visites_dir())?;

        let mut visites = Vec::with_capacity(ids.len());
        for id in ids {
            visites.push(self.get(&id)?);
        }
        Ok(visites)
    }
}
