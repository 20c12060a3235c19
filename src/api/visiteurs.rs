// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Visiteur endpoints: signup, login, CRUD and portfolio management.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::password,
    error::ApiError,
    models::{
        CreateVisiteurRequest, LoginRequest, LoginResponse, MessageResponse, SignupRequest,
        UpdateVisiteurRequest, Visiteur, VisiteurCreatedResponse, VisiteurDetail,
    },
    state::AppState,
    storage::repository::{NewVisiteur, PraticienRepository, VisiteRepository, VisiteurRepository},
    storage::StorageError,
};

const LOGIN_FAILED: &str = "Identifiants incorrects";
const RATE_LIMITED: &str =
    "Trop de tentatives de connexion à partir de cette adresse IP, veuillez réessayer après 5 minutes !";
const INTERNAL: &str = "Erreur interne du serveur";

/// The part of an email after the `@`, for log fields. Full addresses are
/// identifying and stay out of the logs.
fn email_domain(email: &str) -> &str {
    email.rsplit('@').next().unwrap_or("")
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if email.is_empty() || !email.contains('@') {
        errors.push("Email invalide".to_string());
    }
    if password.chars().count() < 6 {
        errors.push("Le mot de passe doit contenir au moins 6 caractères".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}

/// Run bcrypt off the async runtime.
async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|_| ApiError::internal(INTERNAL))?
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::internal(INTERNAL)
        })
}

#[utoipa::path(
    post,
    path = "/api/visiteur/signup",
    request_body = SignupRequest,
    tag = "Visiteurs",
    responses(
        (status = 201, body = VisiteurCreatedResponse),
        (status = 400, description = "Invalid email or password too short"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<VisiteurCreatedResponse>), ApiError> {
    validate_credentials(&request.email, &request.password)?;

    let password_hash = hash_password(request.password).await?;

    let visiteur_id = {
        let store = state.storage.write().await;
        let repo = VisiteurRepository::new(&store, &state.cipher);
        repo.create(NewVisiteur {
            nom: String::new(),
            prenom: String::new(),
            email: request.email.clone(),
            password_hash,
            tel: None,
            date_embauche: None,
        })?
    };

    tracing::info!(email_domain = email_domain(&request.email), "visiteur signup");
    Ok((
        StatusCode::CREATED,
        Json(VisiteurCreatedResponse {
            message: "Visiteur enregistré avec succès !".to_string(),
            visiteur_id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/visiteur/login",
    request_body = LoginRequest,
    tag = "Visiteurs",
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 429, description = "Too many attempts from this address")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if !state.rate_limiter.check(addr.ip(), Instant::now()) {
        tracing::warn!(ip = %addr.ip(), "login rate limit hit");
        return Err(ApiError::too_many_requests(RATE_LIMITED));
    }

    let credentials = {
        let store = state.storage.read().await;
        let repo = VisiteurRepository::new(&store, &state.cipher);
        repo.credentials_by_email(&request.email)?
    };

    // Unknown email and wrong password get the same answer so the endpoint
    // does not leak which accounts exist.
    let Some(credentials) = credentials else {
        tracing::info!(email_domain = email_domain(&request.email), "login failed");
        return Err(ApiError::unauthorized(LOGIN_FAILED));
    };

    let password = request.password;
    let hash = credentials.password_hash;
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|_| ApiError::internal(INTERNAL))?
        .map_err(|e| {
            tracing::error!(error = %e, "password verification failed");
            ApiError::internal(INTERNAL)
        })?;

    if !valid {
        tracing::info!(email_domain = email_domain(&request.email), "login failed");
        return Err(ApiError::unauthorized(LOGIN_FAILED));
    }

    let token = state.tokens.issue(&credentials.visiteur_id).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        ApiError::internal(INTERNAL)
    })?;

    tracing::info!(email_domain = email_domain(&request.email), "login succeeded");
    Ok(Json(LoginResponse {
        message: "Connexion réussie".to_string(),
        token,
    }))
}

#[utoipa::path(
    get,
    path = "/api/visiteur",
    tag = "Visiteurs",
    responses((status = 200, body = [Visiteur]))
)]
pub async fn list_visiteurs(State(state): State<AppState>) -> Result<Json<Vec<Visiteur>>, ApiError> {
    let store = state.storage.read().await;
    let repo = VisiteurRepository::new(&store, &state.cipher);
    Ok(Json(repo.list()?))
}

#[utoipa::path(
    post,
    path = "/api/visiteur",
    request_body = CreateVisiteurRequest,
    tag = "Visiteurs",
    responses(
        (status = 201, body = VisiteurCreatedResponse),
        (status = 400, description = "Invalid email or password too short"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_visiteur(
    State(state): State<AppState>,
    Json(request): Json<CreateVisiteurRequest>,
) -> Result<(StatusCode, Json<VisiteurCreatedResponse>), ApiError> {
    validate_credentials(&request.email, &request.password)?;

    let password_hash = hash_password(request.password).await?;

    let visiteur_id = {
        let store = state.storage.write().await;
        let repo = VisiteurRepository::new(&store, &state.cipher);
        repo.create(NewVisiteur {
            nom: request.nom,
            prenom: request.prenom,
            email: request.email,
            password_hash,
            tel: request.tel,
            date_embauche: request.date_embauche,
        })?
    };

    Ok((
        StatusCode::CREATED,
        Json(VisiteurCreatedResponse {
            message: "Visiteur enregistré avec succès !".to_string(),
            visiteur_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/visiteur/{id}",
    params(("id" = String, Path, description = "Visiteur id")),
    tag = "Visiteurs",
    responses(
        (status = 200, body = VisiteurDetail),
        (status = 404, description = "Visiteur not found")
    )
)]
pub async fn get_visiteur(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<VisiteurDetail>, ApiError> {
    let store = state.storage.read().await;
    let repo = VisiteurRepository::new(&store, &state.cipher);
    let visiteur = repo.get(&id)?;

    // Populate references; records deleted since the reference was recorded
    // are skipped rather than failing the whole view.
    let visite_repo = VisiteRepository::new(&store);
    let mut visites = Vec::with_capacity(visiteur.visites.len());
    for visite_id in &visiteur.visites {
        match visite_repo.get(visite_id) {
            Ok(visite) => visites.push(visite),
            Err(StorageError::NotFound(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let praticien_repo = PraticienRepository::new(&store, &state.cipher);
    let mut portefeuille = Vec::with_capacity(visiteur.portefeuille_praticiens.len());
    for praticien_id in &visiteur.portefeuille_praticiens {
        match praticien_repo.get(praticien_id) {
            Ok(praticien) => portefeuille.push(praticien),
            Err(StorageError::NotFound(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(VisiteurDetail {
        id: visiteur.id,
        nom: visiteur.nom,
        prenom: visiteur.prenom,
        email: visiteur.email,
        tel: visiteur.tel,
        date_embauche: visiteur.date_embauche,
        visites,
        portefeuille_praticiens: portefeuille,
    }))
}

#[utoipa::path(
    put,
    path = "/api/visiteur/{id}",
    params(("id" = String, Path, description = "Visiteur id")),
    request_body = UpdateVisiteurRequest,
    tag = "Visiteurs",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid email or password too short"),
        (status = 404, description = "Visiteur not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_visiteur(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateVisiteurRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // A changed email goes through the same format check as signup.
    if let Some(email) = &request.email {
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::validation(vec!["Email invalide".to_string()]));
        }
    }

    let password_hash = match &request.password {
        Some(password) => {
            if password.chars().count() < 6 {
                return Err(ApiError::validation(vec![
                    "Le mot de passe doit contenir au moins 6 caractères".to_string(),
                ]));
            }
            Some(hash_password(password.clone()).await?)
        }
        None => None,
    };

    let store = state.storage.write().await;
    let repo = VisiteurRepository::new(&store, &state.cipher);
    repo.update(&id, &request, password_hash)?;

    Ok(Json(MessageResponse {
        message: "Visiteur mis à jour avec succès !".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/visiteur/{id}",
    params(("id" = String, Path, description = "Visiteur id")),
    tag = "Visiteurs",
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Visiteur not found")
    )
)]
pub async fn delete_visiteur(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = state.storage.write().await;
    let repo = VisiteurRepository::new(&store, &state.cipher);
    repo.delete(&id)?;

    Ok(Json(MessageResponse {
        message: "Visiteur supprimé avec succès !".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/visiteur/{visiteur_id}/praticien/{praticien_id}",
    params(
        ("visiteur_id" = String, Path, description = "Visiteur id"),
        ("praticien_id" = String, Path, description = "Praticien id to add")
    ),
    tag = "Visiteurs",
    responses(
        (status = 201, body = MessageResponse),
        (status = 404, description = "Visiteur not found"),
        (status = 409, description = "Praticien already in the portfolio")
    )
)]
pub async fn add_praticien(
    Path((visiteur_id, praticien_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let store = state.storage.write().await;
    let repo = VisiteurRepository::new(&store, &state.cipher);
    repo.add_praticien(&visiteur_id, &praticien_id)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Praticien ajouté avec succès !".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::storage::{DocumentStore, FieldCipher, StoragePaths};
    use std::env;
    use std::fs;

    fn test_state() -> AppState {
        let test_dir = env::temp_dir().join(format!("test-visiteur-api-{}", uuid::Uuid::new_v4()));
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

    fn local_addr() -> ConnectInfo<SocketAddr> {
        ConnectInfo("127.0.0.1:4000".parse().unwrap())
    }

    async fn signup_ok(state: &AppState, email: &str, password: &str) -> String {
        let (status, Json(body)) = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await
        .expect("signup succeeds");
        assert_eq!(status, StatusCode::CREATED);
        body.visiteur_id
    }

    #[tokio::test]
    async fn signup_then_duplicate_conflicts() {
        let state = test_state();

        signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        let err = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: "claire@exemple.fr".to_string(),
                password: "motdepasse".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "Cet email est déjà utilisé");

        cleanup(&state).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn simultaneous_signups_create_exactly_one_account() {
        let state = test_state();

        let request = || {
            Json(SignupRequest {
                email: "course@exemple.fr".to_string(),
                password: "motdepasse".to_string(),
            })
        };

        let first = tokio::spawn(signup(State(state.clone()), request()));
        let second = tokio::spawn(signup(State(state.clone()), request()));
        let results = [first.await.unwrap(), second.await.unwrap()];

        // The storage write lock serializes check-then-insert: whatever the
        // interleaving, one attempt wins and the other conflicts.
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let conflict = results
            .into_iter()
            .find_map(|r| r.err())
            .expect("one attempt conflicts");
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        {
            let store = state.storage.read().await;
            let repo = VisiteurRepository::new(&store, &state.cipher);
            assert_eq!(repo.list().unwrap().len(), 1);
        }

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn signup_rejects_short_password_and_bad_email() {
        let state = test_state();

        let err = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: "pas-un-email".to_string(),
                password: "abc".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let errors = err.errors.expect("validation errors");
        assert_eq!(errors.len(), 2);

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn login_returns_verifiable_token() {
        let state = test_state();
        let id = signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        let Json(body) = login(
            State(state.clone()),
            local_addr(),
            Json(LoginRequest {
                email: "claire@exemple.fr".to_string(),
                password: "motdepasse".to_string(),
            }),
        )
        .await
        .expect("login succeeds");

        assert_eq!(body.message, "Connexion réussie");
        let claims = state.tokens.verify(&body.token).unwrap();
        assert_eq!(claims.sub, id);

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let state = test_state();
        signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        let wrong_password = login(
            State(state.clone()),
            local_addr(),
            Json(LoginRequest {
                email: "claire@exemple.fr".to_string(),
                password: "mauvais-mdp".to_string(),
            }),
        )
        .await
        .unwrap_err();

        let unknown_email = login(
            State(state.clone()),
            local_addr(),
            Json(LoginRequest {
                email: "inconnu@exemple.fr".to_string(),
                password: "motdepasse".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.message, unknown_email.message);

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn fourth_login_attempt_is_rate_limited() {
        let state = test_state();
        signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        let request = || {
            Json(LoginRequest {
                email: "claire@exemple.fr".to_string(),
                password: "mauvais-mdp".to_string(),
            })
        };

        for _ in 0..3 {
            let err = login(State(state.clone()), local_addr(), request())
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        }

        let err = login(State(state.clone()), local_addr(), request())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn get_visiteur_populates_and_skips_dangling_references() {
        let state = test_state();
        let id = signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        // One live and one dangling portfolio reference.
        let praticien_id = {
            let store = state.storage.write().await;
            let repo = PraticienRepository::new(&store, &state.cipher);
            let praticien_id = repo
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

            let vr = VisiteurRepository::new(&store, &state.cipher);
            vr.add_praticien(&id, &praticien_id).unwrap();
            vr.add_praticien(&id, "deleted-praticien").unwrap();
            praticien_id
        };

        let Json(detail) = get_visiteur(Path(id.clone()), State(state.clone()))
            .await
            .expect("get succeeds");

        assert_eq!(detail.id, id);
        assert_eq!(detail.portefeuille_praticiens.len(), 1);
        assert_eq!(detail.portefeuille_praticiens[0].id, praticien_id);

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn update_rehashes_password() {
        let state = test_state();
        let id = signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        update_visiteur(
            Path(id.clone()),
            State(state.clone()),
            Json(UpdateVisiteurRequest {
                password: Some("nouveau-mdp".to_string()),
                ..Default::default()
            }),
        )
        .await
        .expect("update succeeds");

        // Old password no longer logs in, the new one does.
        let old = login(
            State(state.clone()),
            ConnectInfo("10.0.0.9:4000".parse().unwrap()),
            Json(LoginRequest {
                email: "claire@exemple.fr".to_string(),
                password: "motdepasse".to_string(),
            }),
        )
        .await;
        assert!(old.is_err());

        let new = login(
            State(state.clone()),
            ConnectInfo("10.0.0.9:4000".parse().unwrap()),
            Json(LoginRequest {
                email: "claire@exemple.fr".to_string(),
                password: "nouveau-mdp".to_string(),
            }),
        )
        .await;
        assert!(new.is_ok());

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn update_rejects_malformed_email() {
        let state = test_state();
        let id = signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        let err = update_visiteur(
            Path(id.clone()),
            State(state.clone()),
            Json(UpdateVisiteurRequest {
                email: Some("pas-un-email".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.errors, Some(vec!["Email invalide".to_string()]));

        // The stored email is unchanged.
        let Json(detail) = get_visiteur(Path(id), State(state.clone()))
            .await
            .expect("get succeeds");
        assert_eq!(detail.email, "claire@exemple.fr");

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn add_praticien_then_duplicate_conflicts() {
        let state = test_state();
        let id = signup_ok(&state, "claire@exemple.fr", "motdepasse").await;

        let (status, Json(body)) = add_praticien(
            Path((id.clone(), "prat-1".to_string())),
            State(state.clone()),
        )
        .await
        .expect("first add succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "Praticien ajouté avec succès !");

        let err = add_praticien(Path((id, "prat-1".to_string())), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "Praticien déjà ajouté");

        cleanup(&state).await;
    }

    #[tokio::test]
    async fn delete_missing_visiteur_is_not_found() {
        let state = test_state();

        let err = delete_visiteur(Path("missing".to_string()), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Visiteur non trouvé");

        cleanup(&state).await;
    }
}
