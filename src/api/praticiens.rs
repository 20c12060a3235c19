// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Praticien endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{
        CreatePraticienRequest, MessageResponse, Praticien, PraticienCreatedResponse,
        UpdatePraticienRequest,
    },
    state::AppState,
    storage::repository::{NewPraticien, PraticienRepository},
};

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation(vec!["Email invalide".to_string()]));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/praticien",
    tag = "Praticiens",
    responses((status = 200, body = [Praticien]))
)]
pub async fn list_praticiens(
    State(state): State<AppState>,
) -> Result<Json<Vec<Praticien>>, ApiError> {
    let store = state.storage.read().await;
    let repo = PraticienRepository::new(&store, &state.cipher);
    Ok(Json(repo.list()?))
}

#[utoipa::path(
    post,
    path = "/api/praticien",
    request_body = CreatePraticienRequest,
    tag = "Praticiens",
    responses(
        (status = 201, body = PraticienCreatedResponse),
        (status = 400, description = "Invalid email"),
        (status = 409, description = "Email already in use by another praticien")
    )
)]
pub async fn create_praticien(
    State(state): State<AppState>,
    Json(request): Json<CreatePraticienRequest>,
) -> Result<(StatusCode, Json<PraticienCreatedResponse>), ApiError> {
    validate_email(&request.email)?;

    let store = state.storage.write().await;
    let repo = PraticienRepository::new(&store, &state.cipher);

    let praticien_id = repo.create(NewPraticien {
        nom: request.nom,
        prenom: request.prenom,
        tel: request.tel,
        specialite: request.specialite,
        email: request.email,
        rue: request.rue,
        ville: request.ville,
        code_postal: request.code_postal,
        visites: request.visites.unwrap_or_default(),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(PraticienCreatedResponse {
            message: "Praticien enregistré avec succès !".to_string(),
            praticien_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/praticien/{id}",
    params(("id" = String, Path, description = "Praticien id")),
    tag = "Praticiens",
    responses(
        (status = 200, body = Praticien),
        (status = 404, description = "Praticien not found")
    )
)]
pub async fn get_praticien(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Praticien>, ApiError> {
    let store = state.storage.read().await;
    let repo = PraticienRepository::new(&store, &state.cipher);
    Ok(Json(repo.get(&id)?))
}

#[utoipa::path(
    put,
    path = "/api/praticien/{id}",
    params(("id" = String, Path, description = "Praticien id")),
    request_body = UpdatePraticienRequest,
    tag = "Praticiens",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "Praticien not found"),
        (status = 409, description = "Email already in use by another praticien")
    )
)]
pub async fn update_praticien(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePraticienRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // A changed email goes through the same format check as create.
    if let Some(email) = &request.email {
        validate_email(email)?;
    }

    let store = state.storage.write().await;
    let repo = PraticienRepository::new(&store, &state.cipher);
    repo.update(&id, &request)?;

    Ok(Json(MessageResponse {
        message: "Praticien mis à jour avec succès !".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/praticien/{id}",
    params(("id" = String, Path, description = "Praticien id")),
    tag = "Praticiens",
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Praticien not found")
    )
)]
pub async fn delete_praticien(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = PraticienRepository::new(&store, &state.cipher);
    repo.delete(&id)?;

    Ok(Json(MessageResponse {
        message: "Praticien supprimé avec succès !".to_string(),
    }))
}
