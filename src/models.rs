// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Entity views carry plaintext values; encryption happens below the
//! repositories. The visiteur view never carries the password hash.
//!
//! Update requests are explicit whitelists with `deny_unknown_fields`:
//! a payload naming an attribute outside the whitelist is rejected instead
//! of being silently merged into the record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Visiteur Models
// =============================================================================

/// A field representative, also the API's authenticated user type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Visiteur {
    /// Unique identifier (server-generated UUID).
    pub id: String,
    /// Family name (encrypted at rest).
    pub nom: String,
    /// Given name (encrypted at rest).
    pub prenom: String,
    /// Login email. Unique, never encrypted.
    pub email: String,
    /// Phone number (encrypted at rest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    /// Hire date (encrypted at rest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_embauche: Option<NaiveDate>,
    /// Ids of visits made by this visiteur.
    pub visites: Vec<String>,
    /// Ids of praticiens in this visiteur's portfolio.
    pub portefeuille_praticiens: Vec<String>,
}

/// Single-visiteur view with visit and portfolio references populated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisiteurDetail {
    pub id: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_embauche: Option<NaiveDate>,
    /// Embedded visit records. Dangling references are skipped.
    pub visites: Vec<Visite>,
    /// Embedded praticien records. Dangling references are skipped.
    pub portefeuille_praticiens: Vec<Praticien>,
}

/// Self-service account creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Credentials for login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    /// Bearer token, valid for 24 hours.
    pub token: String,
}

/// Request to create a visiteur with a full profile (admin-style create).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateVisiteurRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub date_embauche: Option<NaiveDate>,
}

/// Whitelisted visiteur update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateVisiteurRequest {
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// New password; re-hashed before persistence.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub date_embauche: Option<NaiveDate>,
    #[serde(default)]
    pub visites: Option<Vec<String>>,
}

/// Create/signup success envelope for visiteurs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisiteurCreatedResponse {
    pub message: String,
    pub visiteur_id: String,
}

// =============================================================================
// Praticien Models
// =============================================================================

/// A medical practitioner visited by representatives.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Praticien {
    /// Unique identifier (server-generated UUID).
    pub id: String,
    /// Family name (encrypted at rest).
    pub nom: String,
    /// Given name (encrypted at rest).
    pub prenom: String,
    /// Phone number (encrypted at rest).
    pub tel: String,
    /// Medical specialty. Plaintext.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialite: Option<String>,
    /// Contact email. Unique, never encrypted.
    pub email: String,
    /// Street (encrypted at rest).
    pub rue: String,
    /// City (encrypted at rest).
    pub ville: String,
    /// Postal code (encrypted at rest).
    pub code_postal: String,
    /// Ids of visits received by this praticien.
    pub visites: Vec<String>,
}

/// Request to create a praticien.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePraticienRequest {
    pub nom: String,
    pub prenom: String,
    pub tel: String,
    #[serde(default)]
    pub specialite: Option<String>,
    pub email: String,
    pub rue: String,
    pub ville: String,
    pub code_postal: String,
    #[serde(default)]
    pub visites: Option<Vec<String>>,
}

/// Whitelisted praticien update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePraticienRequest {
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub specialite: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rue: Option<String>,
    #[serde(default)]
    pub ville: Option<String>,
    #[serde(default)]
    pub code_postal: Option<String>,
    #[serde(default)]
    pub visites: Option<Vec<String>>,
}

/// Create success envelope for praticiens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PraticienCreatedResponse {
    pub message: String,
    pub praticien_id: String,
}

// =============================================================================
// Visite Models
// =============================================================================

/// A dated visit of one visiteur to one praticien for one motif.
///
/// References are ids only; lifecycle is independent of the referenced
/// entities (no cascade on delete).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Visite {
    /// Unique identifier (server-generated UUID).
    pub id: String,
    /// When the visit took place.
    pub date_visite: DateTime<Utc>,
    /// Free-text commentary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
    /// Id of the visiting visiteur.
    pub visiteur: String,
    /// Id of the visited praticien.
    pub praticien: String,
    /// Id of the visit reason.
    pub motif: String,
}

/// Request to record a visite.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateVisiteRequest {
    pub date_visite: DateTime<Utc>,
    #[serde(default)]
    pub commentaire: Option<String>,
    pub visiteur: String,
    pub praticien: String,
    pub motif: String,
}

/// Whitelisted visite update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateVisiteRequest {
    #[serde(default)]
    pub date_visite: Option<DateTime<Utc>>,
    #[serde(default)]
    pub commentaire: Option<String>,
    #[serde(default)]
    pub visiteur: Option<String>,
    #[serde(default)]
    pub praticien: Option<String>,
    #[serde(default)]
    pub motif: Option<String>,
}

/// Create/update success envelope for visites.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisiteSavedResponse {
    pub message: String,
    pub visite_id: String,
}

// =============================================================================
// Motif Models
// =============================================================================

/// A label categorizing a visit's purpose.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Motif {
    /// Unique identifier (server-generated UUID).
    pub id: String,
    /// Display label.
    pub libelle: String,
}

/// Request to create or replace a motif label.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MotifRequest {
    pub libelle: String,
}

/// Create/update success envelope for motifs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MotifSavedResponse {
    pub message: String,
    pub motif_id: String,
}

// =============================================================================
// Shared Envelopes
// =============================================================================

/// Plain success/failure message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
