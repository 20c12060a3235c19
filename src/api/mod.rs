// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface: the `/api` router, auth layering and OpenAPI docs.
//!
//! Signup and login are the only routes reachable without a bearer token;
//! everything else sits behind [`require_auth`].

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{
        CreatePraticienRequest, CreateVisiteRequest, CreateVisiteurRequest, LoginRequest,
        LoginResponse, MessageResponse, Motif, MotifRequest, MotifSavedResponse, Praticien,
        PraticienCreatedResponse, SignupRequest, UpdatePraticienRequest, UpdateVisiteRequest,
        UpdateVisiteurRequest, Visite, VisiteSavedResponse, Visiteur, VisiteurCreatedResponse,
        VisiteurDetail,
    },
    state::AppState,
};

pub mod motifs;
pub mod praticiens;
pub mod visites;
pub mod visiteurs;

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/visiteur/signup", post(visiteurs::signup))
        .route("/visiteur/login", post(visiteurs::login));

    let protected = Router::new()
        .route(
            "/visiteur",
            get(visiteurs::list_visiteurs).post(visiteurs::create_visiteur),
        )
        .route(
            "/visiteur/{id}",
            get(visiteurs::get_visiteur)
                .put(visiteurs::update_visiteur)
                .delete(visiteurs::delete_visiteur),
        )
        .route(
            "/visiteur/{visiteur_id}/praticien/{praticien_id}",
            post(visiteurs::add_praticien),
        )
        .route(
            "/praticien",
            get(praticiens::list_praticiens).post(praticiens::create_praticien),
        )
        .route(
            "/praticien/{id}",
            get(praticiens::get_praticien)
                .put(praticiens::update_praticien)
                .delete(praticiens::delete_praticien),
        )
        .route(
            "/visite",
            get(visites::list_visites).post(visites::create_visite),
        )
        .route(
            "/visite/{id}",
            get(visites::get_visite)
                .put(visites::update_visite)
                .delete(visites::delete_visite),
        )
        .route(
            "/motif",
            get(motifs::list_motifs).post(motifs::create_motif),
        )
        .route(
            "/motif/{id}",
            get(motifs::get_motif)
                .put(motifs::update_motif)
                .delete(motifs::delete_motif),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api", public.merge(protected))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        visiteurs::signup,
        visiteurs::login,
        visiteurs::list_visiteurs,
        visiteurs::create_visiteur,
        visiteurs::get_visiteur,
        visiteurs::update_visiteur,
        visiteurs::delete_visiteur,
        visiteurs::add_praticien,
        praticiens::list_praticiens,
        praticiens::create_praticien,
        praticiens::get_praticien,
        praticiens::update_praticien,
        praticiens::delete_praticien,
        visites::list_visites,
        visites::create_visite,
        visites::get_visite,
        visites::update_visite,
        visites::delete_visite,
        motifs::list_motifs,
        motifs::create_motif,
        motifs::get_motif,
        motifs::update_motif,
        motifs::delete_motif
    ),
    components(
        schemas(
            Visiteur,
            VisiteurDetail,
            SignupRequest,
            LoginRequest,
            LoginResponse,
            CreateVisiteurRequest,
            UpdateVisiteurRequest,
            VisiteurCreatedResponse,
            Praticien,
            CreatePraticienRequest,
            UpdatePraticienRequest,
            PraticienCreatedResponse,
            Visite,
            CreateVisiteRequest,
            UpdateVisiteRequest,
            VisiteSavedResponse,
            Motif,
            MotifRequest,
            MotifSavedResponse,
            MessageResponse
        )
    ),
    tags(
        (name = "Visiteurs", description = "Visiteur accounts, auth and portfolio"),
        (name = "Praticiens", description = "Praticien records"),
        (name = "Visites", description = "Visit records"),
        (name = "Motifs", description = "Visit reasons")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::storage::{DocumentStore, FieldCipher, StoragePaths};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::env;
    use std::fs;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let test_dir = env::temp_dir().join(format!("test-api-router-{}", uuid::Uuid::new_v4()));
        let paths = StoragePaths::new(&test_dir);
        let mut store = DocumentStore::new(paths);
        store.initialize().expect("Failed to initialize");
        AppState::new(
            store,
            FieldCipher::from_secret("test-encryption-key"),
            TokenService::new("test-secret"),
        )
    }

    async fn cleanup(state: &AppState) {
        let root = state.storage.read().await.paths().root().to_path_buf();
        let _ = fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let state = test_state();
        let app = router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/motif")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        cleanup(&state).await;
    }

    #[tokio::test]
    async fn protected_route_with_token_succeeds() {
        let state = test_state();
        let token = state.tokens.issue("visiteur-1").unwrap();
        let app = router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/motif")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        cleanup(&state).await;
    }

    #[tokio::test]
    async fn signup_is_reachable_without_token() {
        let state = test_state();
        let app = router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/visiteur/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"claire@exemple.fr","password":"motdepasse"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        cleanup(&state).await;
    }
}
