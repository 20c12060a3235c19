// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed repositories over the document store.
//!
//! Each repository owns the on-disk shape of one entity and the translation
//! between ciphertext records and plaintext API views. Handlers never touch
//! stored records directly.

pub mod motifs;
pub mod praticiens;
pub mod visites;
pub mod visiteurs;

pub use motifs::MotifRepository;
pub use praticiens::{NewPraticien, PraticienRepository, StoredPraticien};
pub use visites::VisiteRepository;
pub use visiteurs::{NewVisiteur, StoredVisiteur, VisiteurCredentials, VisiteurRepository};
