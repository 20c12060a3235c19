// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Every variant maps to 401; the distinction only drives the message.
/// Signing failures are folded into [`AuthError::InternalError`] so token
/// issuance and verification share one error type.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    InvalidAuthHeader,
    /// Token is malformed or its signature does not verify
    InvalidToken,
    /// Token has expired
    TokenExpired,
    /// Token could not be signed
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Accès refusé, token manquant"),
            AuthError::InvalidAuthHeader => {
                write!(f, "En-tête Authorization invalide (attendu 'Bearer <token>')")
            }
            AuthError::InvalidToken => write!(f, "Token invalide"),
            AuthError::TokenExpired => write!(f, "Token expiré"),
            AuthError::InternalError(msg) => write!(f, "Erreur d'authentification interne: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AuthError::InternalError(msg) = &self {
            tracing::error!(error = %msg, "token signing failed");
        }
        let body = Json(AuthErrorBody {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
