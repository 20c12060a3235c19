// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// API-boundary error: a status code plus the JSON body the client sees.
///
/// Failure envelope is `{"message": ...}`, or `{"errors": [...]}` when the
/// request failed input validation.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<String>>,
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct ValidationBody {
    errors: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 400 with an `errors` list, for field-level validation failures.
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Requête invalide".to_string(),
            errors: Some(errors),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            // Visite and motif messages are English, the rest French; the
            // historical API clients match on these strings.
            StorageError::NotFound(entity) => match entity.as_str() {
                "Visite" | "Motif" => Self::not_found(format!("{entity} not found")),
                _ => Self::not_found(format!("{entity} non trouvé")),
            },
            StorageError::AlreadyExists(msg) => Self::conflict(msg),
            StorageError::DataIntegrity(msg) => {
                tracing::error!(error = %msg, "field decryption failed");
                Self::internal("Erreur interne du serveur")
            }
            other => {
                tracing::error!(error = %other, "storage operation failed");
                Self::internal("Erreur interne du serveur")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.errors {
            Some(errors) => (self.status, Json(ValidationBody { errors })).into_response(),
            None => {
                let body = Json(MessageBody {
                    message: self.message,
                });
                (self.status, body).into_response()
            }
        }
    }
}
