// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Motif endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{MessageResponse, Motif, MotifRequest, MotifSavedResponse},
    state::AppState,
    storage::repository::MotifRepository,
};

#[utoipa::path(
    get,
    path = "/api/motif",
    tag = "Motifs",
    responses((status = 200, body = [Motif]))
)]
pub async fn list_motifs(State(state): State<AppState>) -> Result<Json<Vec<Motif>>, ApiError> {
    let store = state.storage.read().await;
    let repo = MotifRepository::new(&store);
    Ok(Json(repo.list()?))
}

#[utoipa::path(
    post,
    path = "/api/motif",
    request_body = MotifRequest,
    tag = "Motifs",
    responses((status = 201, body = MotifSavedResponse))
)]
pub async fn create_motif(
    State(state): State<AppState>,
    Json(request): Json<MotifRequest>,
) -> Result<(StatusCode, Json<MotifSavedResponse>), ApiError> {
    let store = state.storage.write().await;
    let repo = MotifRepository::new(&store);
    let motif_id = repo.create(&request.libelle)?;

    Ok((
        StatusCode::CREATED,
        Json(MotifSavedResponse {
            message: "Motif saved successfully!".to_string(),
            motif_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/motif/{id}",
    params(("id" = String, Path, description = "Motif id")),
    tag = "Motifs",
    responses(
        (status = 200, body = Motif),
        (status = 404, description = "Motif not found")
    )
)]
pub async fn get_motif(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Motif>, ApiError> {
    let store = state.storage.read().await;
    let repo = MotifRepository::new(&store);
    Ok(Json(repo.get(&id)?))
}

#[utoipa::path(
    put,
    path = "/api/motif/{id}",
    params(("id" = String, Path, description = "Motif id")),
    request_body = MotifRequest,
    tag = "Motifs",
    responses(
        (status = 200, body = MotifSavedResponse),
        (status = 404, description = "Motif not found")
    )
)]
pub async fn update_motif(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<MotifRequest>,
) -> Result<Json<MotifSavedResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = MotifRepository::new(&store);
    let motif = repo.update(&id, &request.libelle)?;

    Ok(Json(MotifSavedResponse {
        message: "Motif updated successfully!".to_string(),
        motif_id: motif.id,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/motif/{id}",
    params(("id" = String, Path, description = "Motif id")),
    tag = "Motifs",
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Motif not found")
    )
)]
pub async fn delete_motif(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = MotifRepository::new(&store);
    repo.delete(&id)?;

    Ok(Json(MessageResponse {
        message: "Deleted!".to_string(),
    }))
}
