// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token authentication middleware.
//!
//! Applied as a `route_layer` on every route except signup and login. On
//! success the verified visiteur id is inserted into request extensions as
//! [`AuthVisiteur`] for handlers that need the caller's identity.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

use super::AuthError;

/// The authenticated caller, available as a request extension behind the
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthVisiteur {
    pub visiteur_id: String,
}

/// Middleware rejecting requests without a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    match state.tokens.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthVisiteur {
                visiteur_id: claims.sub,
            });
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;

    let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingAuthHeader)
        ));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[test]
    fn empty_token_is_rejected() {
        let headers = headers_with("Bearer ");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidAuthHeader)
        ));
    }
}
