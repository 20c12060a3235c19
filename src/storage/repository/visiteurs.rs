// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Visiteur repository.
//!
//! Each visiteur is one JSON file under `visiteurs/`. Identifying attributes
//! (nom, prenom, tel, date_embauche) are sealed through [`FieldCipher`] before
//! hitting disk and unsealed on every read; email and the password hash stay
//! plaintext (email for uniqueness scans, the hash because bcrypt output is
//! already non-reversible).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{UpdateVisiteurRequest, Visiteur};
use crate::storage::crypto::FieldCipher;
use crate::storage::paths::is_valid_id;
use crate::storage::{DocumentStore, StorageError, StorageResult};

/// On-disk visiteur record. String fields marked ciphertext hold
/// base64(nonce || AES-GCM ciphertext), never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVisiteur {
    pub id: String,
    /// Ciphertext.
    pub nom: String,
    /// Ciphertext.
    pub prenom: String,
    pub email: String,
    pub password_hash: String,
    /// Ciphertext.
    pub tel: Option<String>,
    /// Ciphertext of an ISO 8601 date.
    pub date_embauche: Option<String>,
    pub visites: Vec<String>,
    pub portefeuille_praticiens: Vec<String>,
}

/// Input for creating a visiteur. The password arrives pre-hashed; this layer
/// never sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewVisiteur {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password_hash: String,
    pub tel: Option<String>,
    pub date_embauche: Option<NaiveDate>,
}

/// Login credentials resolved from an email.
#[derive(Debug, Clone)]
pub struct VisiteurCredentials {
    pub visiteur_id: String,
    pub password_hash: String,
}

/// Repository for visiteur records.
pub struct VisiteurRepository<'a> {
    store: &'a DocumentStore,
    cipher: &'a FieldCipher,
}

impl<'a> VisiteurRepository<'a> {
    pub fn new(store: &'a DocumentStore, cipher: &'a FieldCipher) -> Self {
        Self { store, cipher }
    }

    /// Check if a visiteur exists.
    pub fn exists(&self, visiteur_id: &str) -> bool {
        is_valid_id(visiteur_id) && self.store.exists(self.store.paths().visiteur(visiteur_id))
    }

    /// Get a visiteur by id, decrypted.
    pub fn get(&self, visiteur_id: &str) -> StorageResult<Visiteur> {
        let stored = self.get_stored(visiteur_id)?;
        self.unseal(&stored)
    }

    /// Whether any visiteur already uses this email.
    pub fn email_taken(&self, email: &str) -> StorageResult<bool> {
        Ok(self.find_stored_by_email(email)?.is_some())
    }

    /// Resolve the credentials for an email, if the account exists.
    pub fn credentials_by_email(&self, email: &str) -> StorageResult<Option<VisiteurCredentials>> {
        Ok(self.find_stored_by_email(email)?.map(|stored| {
            VisiteurCredentials {
                visiteur_id: stored.id,
                password_hash: stored.password_hash,
            }
        }))
    }

    /// Create a new visiteur, enforcing email uniqueness.
    ///
    /// Returns the generated id. The caller must hold the storage write lock
    /// so the check-then-insert cannot race another signup.
    pub fn create(&self, new: NewVisiteur) -> StorageResult<String> {
        if self.email_taken(&new.email)? {
            return Err(StorageError::AlreadyExists(
                "Cet email est déjà utilisé".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let stored = StoredVisiteur {
            id: id.clone(),
            nom: self.seal(&new.nom)?,
            prenom: self.seal(&new.prenom)?,
            email: new.email,
            password_hash: new.password_hash,
            tel: new.tel.as_deref().map(|v| self.seal(v)).transpose()?,
            date_embauche: new
                .date_embauche
                .map(|d| self.seal(&d.to_string()))
                .transpose()?,
            visites: Vec::new(),
            portefeuille_praticiens: Vec::new(),
        };

        self.store
            .write_json(self.store.paths().visiteur(&id), &stored)?;
        Ok(id)
    }

    /// Apply a whitelisted update. `password_hash` replaces the stored hash
    /// when the caller re-hashed a new password.
    pub fn update(
        &self,
        visiteur_id: &str,
        changes: &UpdateVisiteurRequest,
        password_hash: Option<String>,
    ) -> StorageResult<Visiteur> {
        let mut stored = self.get_stored(visiteur_id)?;

        if let Some(email) = &changes.email {
            if email != &stored.email && self.email_taken(email)? {
                return Err(StorageError::AlreadyExists(
                    "Cet email est déjà utilisé".to_string(),
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
            stored.tel = Some(self.seal(tel)?);
        }
        if let Some(date) = &changes.date_embauche {
            stored.date_embauche = Some(self.seal(&date.to_string())?);
        }
        if let Some(visites) = &changes.visites {
            stored.visites = visites.clone();
        }
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }

        self.store
            .write_json(self.store.paths().visiteur(visiteur_id), &stored)?;
        self.unseal(&stored)
    }

    /// Delete a visiteur.
    pub fn delete(&self, visiteur_id: &str) -> StorageResult<()> {
        if !self.exists(visiteur_id) {
            return Err(StorageError::NotFound("Visiteur".to_string()));
        }
        self.store.delete(self.store.paths().visiteur(visiteur_id))
    }

    /// List all visiteurs, decrypted.
    pub fn list(&self) -> StorageResult<Vec<Visiteur>> {
        let ids = self.store.list_ids(self.store.paths().visiteurs_dir())?;

        let mut visiteurs = Vec::with_capacity(ids.len());
        for id in ids {
            let stored = self.get_stored(&id)?;
            visiteurs.push(self.unseal(&stored)?);
        }
        Ok(visiteurs)
    }

    /// Add a praticien to the visiteur's portfolio.
    ///
    /// Membership is tested by id equality. The praticien id itself is not
    /// validated; dangling references are tolerated.
    pub fn add_praticien(&self, visiteur_id: &str, praticien_id: &str) -> StorageResult<()> {
        let mut stored = self.get_stored(visiteur_id)?;

        if stored
            .portefeuille_praticiens
            .iter()
            .any(|id| id == praticien_id)
        {
            return Err(StorageError::AlreadyExists(
                "Praticien déjà ajouté".to_string(),
            ));
        }

        stored.portefeuille_praticiens.push(praticien_id.to_string());
        self.store
            .write_json(self.store.paths().visiteur(visiteur_id), &stored)
    }

    fn get_stored(&self, visiteur_id: &str) -> StorageResult<StoredVisiteur> {
        if !is_valid_id(visiteur_id) {
            return Err(StorageError::NotFound("Visiteur".to_string()));
        }
        let path = self.store.paths().visiteur(visiteur_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound("Visiteur".to_string()));
        }
        self.store.read_json(path)
    }

    fn find_stored_by_email(&self, email: &str) -> StorageResult<Option<StoredVisiteur>> {
        let ids = self.store.list_ids(self.store.paths().visiteurs_dir())?;
        for id in ids {
            let stored = self.get_stored(&id)?;
            if stored.email == email {
                return Ok(Some(stored));
            }
        }
        Ok(None)
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

    fn unseal(&self, stored: &StoredVisiteur) -> StorageResult<Visiteur> {
        let date_embauche = stored
            .date_embauche
            .as_deref()
            .map(|c| {
                self.open(c)?.parse::<NaiveDate>().map_err(|_| {
                    StorageError::DataIntegrity("stored hire date is not a date".to_string())
                })
            })
            .transpose()?;

        Ok(Visiteur {
            id: stored.id.clone(),
            nom: self.open(&stored.nom)?,
            prenom: self.open(&stored.prenom)?,
            email: stored.email.clone(),
            tel: stored.tel.as_deref().map(|c| self.open(c)).transpose()?,
            date_embauche,
            visites: stored.visites.clone(),
            portefeuille_praticiens: stored.portefeuille_praticiens.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use std::env;
    use std::fs;

    fn test_store() -> (DocumentStore, FieldCipher) {
        let test_dir = env::temp_dir().join(format!("test-visiteur-repo-{}", uuid::Uuid::new_v4()));
        let paths = StoragePaths::new(&test_dir);
        let mut store = DocumentStore::new(paths);
        store.initialize().expect("Failed to initialize");
        (store, FieldCipher::from_secret("test-encryption-key"))
    }

    fn cleanup(store: &DocumentStore) {
        let _ = fs::remove_dir_all(store.paths().root());
    }

    fn new_visiteur(email: &str) -> NewVisiteur {
        NewVisiteur {
            nom: "Dupont".to_string(),
            prenom: "Claire".to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$fakehash".to_string(),
            tel: Some("0612345678".to_string()),
            date_embauche: Some(NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()),
        }
    }

    #[test]
    fn create_and_get_roundtrips_plaintext() {
        let (store, cipher) = test_store();
        let repo = VisiteurRepository::new(&store, &cipher);

        let id = repo.create(new_visiteur("claire@exemple.fr")).unwrap();
        let loaded = repo.get(&id).unwrap();

        assert_eq!(loaded.nom, "Dupont");
        assert_eq!(loaded.prenom, "Claire");
        assert_eq!(loaded.email, "claire@exemple.fr");
        assert_eq!(loaded.tel.as_deref(), Some("0612345678"));
        assert_eq!(
            loaded.date_embauche,
            Some(NaiveDate::from_ymd_opt(2021, 3, 15).unwrap())
        );

        cleanup(&store);
    }

    #[test]
    fn persisted_record_does_not_contain_plaintext() {
        let (store, cipher) = test_store();
        let repo = VisiteurRepository::new(&store, &cipher);

        let id = repo.create(new_visiteur("claire@exemple.fr")).unwrap();

        let raw = fs::read_to_string(store.paths().visiteur(&id)).unwrap();
        assert!(!raw.contains("Dupont"));
        assert!(!raw.contains("Claire"));
        assert!(!raw.contains("0612345678"));
        assert!(!raw.contains("2021-03-15"));
        // Email stays plaintext for uniqueness lookups
        assert!(raw.contains("claire@exemple.fr"));

        cleanup(&store);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (store, cipher) = test_store();
        let repo = VisiteurRepository::new(&store, &cipher);

        repo.create(new_visiteur("dup@exemple.fr")).unwrap();
        let result = repo.create(new_visiteur("dup@exemple.fr"));

        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        cleanup(&store);
    }

    #[test]
    fn credentials_by_email_returns_hash() {
        let (store, cipher) = test_store();
        let repo = VisiteurRepository::new(&store, &cipher);

        let id = repo.create(new_visiteur("login@exemple.fr")).unwrap();

        let creds = repo
            .credentials_by_email("login@exemple.fr")
            .unwrap()
            .expect("credentials found");
        assert_eq!(creds.visiteur_id, id);
        assert_eq!(creds.password_hash, "$2b$10$fakehash");

        assert!(repo.credentials_by_email("nobody@exemple.fr").unwrap().is_none());

        cleanup(&store);
    }

    #[test]
    fn update_applies_whitelisted_changes() {
        let (store, cipher) = test_store();
        let repo = VisiteurRepository::new(&store, &cipher);

        let id = repo.create(new_visiteur("upd@exemple.fr")).unwrap();
        let changes = UpdateVisiteurRequest {
            nom: Some("Martin".to_string()),
            tel: Some("0700000000".to_string()),
            ..Default::default()
        };

        let updated = repo.update(&id, &changes, None).unwrap();
        assert_eq!(updated.nom, "Martin");
        assert_eq!(updated.prenom, "Claire");
        assert_eq!(updated.tel.as_deref(), Some("0700000000"));

        cleanup(&store);
    }

    #[test]
    fn add_praticien_then_duplicate_conflicts() {
        let (store, cipher) = test_store();
        let repo = VisiteurRepository::new(&store, &cipher);

        let id = repo.create(new_visiteur("pf@exemple.fr")).unwrap();

        repo.add_praticien(&id, "prat-1").unwrap();
        let result = repo.add_praticien(&id, "prat-1");
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        let loaded = repo.get(&id).unwrap();
        assert_eq!(loaded.portefeuille_praticiens, vec!["prat-1".to_string()]);

        cleanup(&store);
    }

    #[test]
    fn add_praticien_missing_visiteur_is_not_found() {
        let (store, cipher) = test_store();
        let repo = VisiteurRepository::new(&store, &cipher);

        let result = repo.add_praticien("missing", "prat-1");
        assert!(matches!(result, Err(StorageError::NotFound(_))));

        cleanup(&store);
    }

    #[test]
    fn path_shaped_ids_cannot_reach_other_entities() {
        let (store, cipher) = test_store();

        // A praticien record that a traversal id could address relatively.
        let praticien_repo =
            crate::storage::repository::PraticienRepository::new(&store, &cipher);
        let praticien_id = praticien_repo
            .create(crate::storage::repository::NewPraticien {
                nom: "Moreau".to_string(),
                prenom: "Luc".to_string(),
                tel: "0477001122".to_string(),
                specialite: None,
                email: "moreau@exemple.fr".to_string(),
                rue: "12 rue des Lilas".to_string(),
                ville: "Lyon".to_string(),
                code_postal: "69000".to_string(),
                visites: Vec::new(),
            })
            .unwrap();

        let repo = VisiteurRepository::new(&store, &cipher);
        let traversal = format!("../praticiens/{praticien_id}");

        assert!(matches!(
            repo.delete(&traversal),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(repo.get(&traversal), Err(StorageError::NotFound(_))));
        assert!(!repo.exists(&traversal));

        // The praticien record is untouched.
        assert!(praticien_repo.get(&praticien_id).is_ok());

        cleanup(&store);
    }

    #[test]
    fn wrong_cipher_key_surfaces_data_integrity() {
        let (store, cipher) = test_store();
        let id = VisiteurRepository::new(&store, &cipher)
            .create(new_visiteur("key@exemple.fr"))
            .unwrap();

        let wrong = FieldCipher::from_secret("another-key");
        let repo = VisiteurRepository::new(&store, &wrong);
        let result = repo.get(&id);

        assert!(matches!(result, Err(StorageError::DataIntegrity(_))));

        cleanup(&store);
    }
}
