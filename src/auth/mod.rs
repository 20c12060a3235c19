// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token-based authentication for the visit API.
//!
//! ## Auth Flow
//!
//! 1. A visiteur signs up (`POST /api/visiteur/signup`) with email and
//!    password; the password is bcrypt-hashed before storage.
//! 2. Login (`POST /api/visiteur/login`) verifies the hash and returns an
//!    HS256 JWT valid for 24 hours, signed with `JWT_SECRET`.
//! 3. Every other endpoint requires `Authorization: Bearer <token>`;
//!    [`middleware::require_auth`] verifies signature and expiry.
//!
//! ## Security
//!
//! - Login is rate limited per client IP (3 attempts per minute)
//! - Login failures are normalized to one message so an attacker cannot
//!   tell a wrong password from an unknown email
//! - Tokens are stateless; there is no revocation list

pub mod error;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod tokens;

pub use error::AuthError;
pub use middleware::{require_auth, AuthVisiteur};
pub use rate_limit::LoginRateLimiter;
pub use tokens::{Claims, TokenService};
