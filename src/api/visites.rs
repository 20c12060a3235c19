// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Visite endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{CreateVisiteRequest, MessageResponse, UpdateVisiteRequest, Visite, VisiteSavedResponse},
    state::AppState,
    storage::repository::VisiteRepository,
};

#[utoipa::path(
    get,
    path = "/api/visite",
    tag = "Visites",
    responses((status = 200, body = [Visite]))
)]
pub async fn list_visites(State(state): State<AppState>) -> Result<Json<Vec<Visite>>, ApiError> {
    let store = state.storage.read().await;
    let repo = VisiteRepository::new(&store);
    Ok(Json(repo.list()?))
}

#[utoipa::path(
    post,
    path = "/api/visite",
    request_body = CreateVisiteRequest,
    tag = "Visites",
    responses((status = 201, body = VisiteSavedResponse))
)]
pub async fn create_visite(
    State(state): State<AppState>,
    Json(request): Json<CreateVisiteRequest>,
) -> Result<(StatusCode, Json<VisiteSavedResponse>), ApiError> {
    let visite = Visite {
        id: uuid::Uuid::new_v4().to_string(),
        date_visite: request.date_visite,
        commentaire: request.commentaire,
        visiteur: request.visiteur,
        praticien: request.praticien,
        motif: request.motif,
    };

    let store = state.storage.write().await;
    let repo = VisiteRepository::new(&store);
    let visite_id = repo.create(visite)?;

    Ok((
        StatusCode::CREATED,
        Json(VisiteSavedResponse {
            message: "Visite saved successfully!".to_string(),
            visite_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/visite/{id}",
    params(("id" = String, Path, description = "Visite id")),
    tag = "Visites",
    responses(
        (status = 200, body = Visite),
        (status = 404, description = "Visite not found")
    )
)]
pub async fn get_visite(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Visite>, ApiError> {
    let store = state.storage.read().await;
    let repo = VisiteRepository::new(&store);
    Ok(Json(repo.get(&id)?))
}

#[utoipa::path(
    put,
    path = "/api/visite/{id}",
    params(("id" = String, Path, description = "Visite id")),
    request_body = UpdateVisiteRequest,
    tag = "Visites",
    responses(
        (status = 200, body = VisiteSavedResponse),
        (status = 404, description = "Visite not found")
    )
)]
pub async fn update_visite(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateVisiteRequest>,
) -> Result<Json<VisiteSavedResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = VisiteRepository::new(&store);
    let visite = repo.update(&id, &request)?;

    Ok(Json(VisiteSavedResponse {
        message: "Visite updated successfully!".to_string(),
        visite_id: visite.id,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/visite/{id}",
    params(("id" = String, Path, description = "Visite id")),
    tag = "Visites",
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Visite not found")
    )
)]
pub async fn delete_visite(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = VisiteRepository::new(&store);
    repo.delete(&id)?;

    Ok(Json(MessageResponse {
        message: "Visite deleted successfully".to_string(),
    }))
}
