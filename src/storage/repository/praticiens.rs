// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Praticien repository.
//!
//! Same sealing discipline as the visiteur repository: nom, prenom, tel, rue,
//! ville and code_postal are ciphertext on disk; email and specialite stay
//! plaintext. Email uniqueness is store-enforced.

use serde::{Deserialize, Serialize};

use crate::models::{Praticien, UpdatePraticienRequest};
use crate::storage::crypto::FieldCipher;
use crate::storage::paths::is_valid_id;
use crate::storage::{DocumentStore, StorageError, StorageResult};

/// On-disk praticien record. Fields marked ciphertext hold
/// base64(nonce || AES-GCM ciphertext).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPraticien {
    pub id: String,
    /// Ciphertext.
    pub nom: String,
    /// Ciphertext.
    pub prenom: String,
    /// Ciphertext.
    pub tel: String,
    pub specialite: Option<String>,
    pub email: String,
    /// Ciphertext.
    pub rue: String,
    /// Ciphertext.
    pub ville: String,
    /// Ciphertext.
    pub code_postal: String,
    pub visites: Vec<String>,
}

/// Input for creating a praticien.
#[derive(Debug, Clone)]
pub struct NewPraticien {
    pub nom: String,
    pub prenom: String,
    pub tel: String,
    pub specialite: Option<String>,
    pub email: String,
    pub rue: String,
    pub ville: String,
    pub code_postal: String,
    pub visites: Vec<String>,
}

/// Repository for praticien records.
pub struct PraticienRepository<'a> {
    store: &'a DocumentStore,
    cipher: &'a FieldCipher,
}

impl<'a> PraticienRepository<'a> {
    pub fn new(store: &'a DocumentStore, cipher: &'a FieldCipher) -> Self {
        Self { store, cipher }
    }

    /// Check if a praticien exists.
    pub fn exists(&self, praticien_id: &str) -> bool {
        is_valid_id(praticien_id)
            && self
                .store
                .exists(self.store.paths().praticien(praticien_id))
    }

    /// Get a praticien by id, decrypted.
    pub fn get(&self, praticien_id: &str) -> StorageResult<Praticien> {
        let stored = self.get_stored(praticien_id)?;
        self.unseal(&stored)
    }

    /// Whether any praticien already uses this email.
    pub fn email_taken(&self, email: &str) -> StorageResult<bool> {
        let ids = self.store.list_ids(self.store.paths().praticiens_dir())?;
        for id in ids {
            let stored = self.get_stored(&id)?;
            if stored.email == email {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Create a new praticien, enforcing email uniqueness.
    ///
    /// Returns the generated id. The caller must hold the storage write lock
    /// so the check-then-insert cannot race another create.
    pub fn create(&self, new: NewPraticien) -> StorageResult<String> {
        if self.email_taken(&new.email)? {
            return Err(StorageError::AlreadyExists(
                "Un praticien avec cet email existe déjà".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let stored = StoredPraticien {
            id: id.clone(),
            nom: self.seal(&new.nom)?,
            prenom: self.seal(&new.prenom)?,
            tel: self.seal(&new.tel)?,
            specialite: new.specialite,
            email: new.email,
            rue: self.seal(&new.rue)?,
            ville: self.seal(&new.ville)?,
            code_postal: self.seal(&new.code_postal)?,
            visites: new.visites,
        };

        self.store
            .write_json(self.store.paths().praticien(&id), &stored)?;
        Ok(id)
    }

    /// Apply a whitelisted update.
    pub fn update(
        &self,
        praticien_id: &str,
        changes: &UpdatePraticienRequest,
    ) -> StorageResult<Praticien> {
        let mut stored = self.get_stored(praticien_id)?;

        if let Some(email) = &changes.email {
            if email != &stored.email && self.email_taken(email)? {
                return Err(StorageError::AlreadyExists(
                    "Un praticien avec cet email existe déjà".to_string(),
                ));
            }
            stored.email = email.clone();
        }
        if let Some(nom) = &changes.nom {
            stored.nom = self.seal(nom)?;
        }
        if let Some(prenom) = &changes.prenom {
            stored.prenom = self.seal(prenom)?;
        }
        if let Some(tel) = &changes.tel {
            stored.tel = self.seal(tel)?;
        }
        if let Some(specialite) = &changes.specialite {
            stored.specialite = Some(specialite.clone());
        }
        if let Some(rue) = &changes.rue {
            stored.rue = self.seal(rue)?;
        }
        if let Some(ville) = &changes.ville {
            stored.ville = self.seal(ville)?;
        }
        if let Some(code_postal) = &changes.code_postal {
            stored.code_postal = self.seal(code_postal)?;
        }
        if let Some(visites) = &changes.visites {
            stored.visites = visites.clone();
        }

        self.store
            .write_json(self.store.paths().praticien(praticien_id), &stored)?;
        self.unseal(&stored)
    }

    /// Delete a praticien. Portfolio references pointing at it are left as-is.
    pub fn delete(&self, praticien_id: &str) -> StorageResult<()> {
        if !self.exists(praticien_id) {
            return Err(StorageError::NotFound("Praticien".to_string()));
        }
        self.store
            .delete(self.store.paths().praticien(praticien_id))
    }

    /// List all praticiens, decrypted.
    pub fn list(&self) -> StorageResult<Vec<Praticien>> {
        let ids = self.store.list_ids(self.store.paths().praticiens_dir())?;

        let mut praticiens = Vec::with_capacity(ids.len());
        for id in ids {
            let stored = self.get_stored(&id)?;
            praticiens.push(self.unseal(&stored)?);
        }
        Ok(praticiens)
    }

    fn get_stored(&self, praticien_id: &str) -> StorageResult<StoredPraticien> {
        if !is_valid_id(praticien_id) {
            return Err(StorageError::NotFound("Praticien".to_string()));
        }
        let path = self.store.paths().praticien(praticien_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound("Praticien".to_string()));
        }
        self.store.read_json(path)
    }

    fn seal(&self, plaintext: &str) -> StorageResult<String> {
        self.cipher
            .encrypt_field(plaintext)
            .map_err(|e| StorageError::DataIntegrity(e.to_string()))
    }

    fn open(&self, ciphertext: &str) -> StorageResult<String> {
        self.cipher
            .decrypt_field(ciphertext)
            .map_err(|e| StorageError::DataIntegrity(e.to_string()))
    }

    fn unseal(&self, stored: &StoredPraticien) -> StorageResult<Praticien> {
        Ok(Praticien {
            id: stored.id.clone(),
            nom: self.open(&stored.nom)?,
            prenom: self.open(&stored.prenom)?,
            tel: self.open(&stored.tel)?,
            specialite: stored.specialite.clone(),
            email: stored.email.clone(),
            rue: self.open(&stored.rue)?,
            ville: self.open(&stored.ville)?,
            code_postal: self.open(&stored.code_postal)?,
            visites: stored.visites.clone(),
        })
    }
}
