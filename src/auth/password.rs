// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing.
//!
//! Thin wrappers over bcrypt at the default cost. Hashing is CPU-bound
//! (~100ms at cost 12), so handlers call these through
//! `tokio::task::spawn_blocking`.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a plaintext password against a stored hash.
///
/// A hash that bcrypt cannot parse is an error, not a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, BcryptError> {
    verify(password, password_hash)
}
