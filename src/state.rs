// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared application state.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{LoginRateLimiter, TokenService};
use crate::storage::{DocumentStore, FieldCipher};

/// State shared across all request handlers.
///
/// The store sits behind an async `RwLock`: reads run concurrently, while
/// writes hold the lock across check-then-insert sequences (email
/// uniqueness, portfolio membership) so they cannot race.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<RwLock<DocumentStore>>,
    pub cipher: Arc<FieldCipher>,
    pub tokens: TokenService,
    pub rate_limiter: Arc<LoginRateLimiter>,
}

impl AppState {
    pub fn new(store: DocumentStore, cipher: FieldCipher, tokens: TokenService) -> Self {
        Self {
            storage: Arc::new(RwLock::new(store)),
            cipher: Arc::new(cipher),
            tokens,
            rate_limiter: Arc::new(LoginRateLimiter::default()),
        }
    }
}
