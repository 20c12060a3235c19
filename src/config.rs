// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the document store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `JWT_SECRET` | HS256 token-signing secret | Required |
//! | `ENCRYPTION_KEY` | Secret the field-encryption key is derived from | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable name for the document store root directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token-signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the field-encryption secret.
pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Resolved process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub encryption_key: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails fast when a required secret is missing so the server never
    /// starts with unsigned tokens or unencrypted storage.
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var(JWT_SECRET_ENV)
            .map_err(|_| format!("{JWT_SECRET_ENV} must be set"))?;
        let encryption_key = env::var(ENCRYPTION_KEY_ENV)
            .map_err(|_| format!("{ENCRYPTION_KEY_ENV} must be set"))?;

        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        Ok(Self {
            data_dir,
            host,
            port,
            jwt_secret,
            encryption_key,
        })
    }
}
