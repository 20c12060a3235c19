// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field-level encryption for identifying attributes.
//!
//! Repositories run a fixed per-entity set of attributes through
//! [`FieldCipher`] on the way to and from disk. Each value is encrypted with
//! AES-256-GCM under a fresh random nonce and stored as
//! `base64(nonce || ciphertext)`. The rest of the application only ever sees
//! plaintext; email in particular is never encrypted so uniqueness lookups
//! keep working.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// AES-GCM nonce size in bytes.
const NONCE_LEN: usize = 12;

/// Errors from field encryption/decryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("field encryption failed")]
    Encryption,

    #[error("field decryption failed: {0}")]
    Decryption(String),
}

/// Symmetric cipher for sensitive record fields.
///
/// The 256-bit key is derived from the configured secret, so the same
/// `ENCRYPTION_KEY` always opens the same store.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// Derive the field key from the configured secret (SHA-256) and build
    /// the cipher.
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt one field value. Output is base64(nonce || ciphertext).
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encryption)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(payload))
    }

    /// Decrypt one field value produced by [`encrypt_field`](Self::encrypt_field).
    ///
    /// Fails on wrong key, truncated payload, or tampered ciphertext; the
    /// caller must surface this as a data-integrity fault, never return the
    /// ciphertext as if it were the value.
    pub fn decrypt_field(&self, encoded: &str) -> Result<String, CryptoError> {
        let payload = BASE64
            .decode(encoded)
            .map_err(|_| CryptoError::Decryption("invalid base64 payload".to_string()))?;

        if payload.len() < NONCE_LEN {
            return Err(CryptoError::Decryption("payload too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::Decryption("authentication tag mismatch".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}

impl std::fmt::Debug for FieldCipher {
    // Never expose key material through Debug
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = FieldCipher::from_secret("test-secret");

        let encrypted = cipher.encrypt_field("Dupont").unwrap();
        let decrypted = cipher.decrypt_field(&encrypted).unwrap();

        assert_eq!(decrypted, "Dupont");
    }

    #[test]
    fn ciphertext_does_not_contain_plaintext() {
        let cipher = FieldCipher::from_secret("test-secret");

        let encrypted = cipher.encrypt_field("0612345678").unwrap();
        assert!(!encrypted.contains("0612345678"));
    }

    #[test]
    fn same_value_encrypts_differently() {
        let cipher = FieldCipher::from_secret("test-secret");

        let first = cipher.encrypt_field("Martin").unwrap();
        let second = cipher.encrypt_field("Martin").unwrap();

        // Fresh nonce per value
        assert_ne!(first, second);
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let cipher = FieldCipher::from_secret("right-key");
        let other = FieldCipher::from_secret("wrong-key");

        let encrypted = cipher.encrypt_field("Durand").unwrap();
        let result = other.decrypt_field(&encrypted);

        assert!(matches!(result, Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn corrupted_payload_fails_decryption() {
        let cipher = FieldCipher::from_secret("test-secret");

        assert!(cipher.decrypt_field("not base64 at all!").is_err());
        assert!(cipher.decrypt_field("AAAA").is_err());

        let mut encrypted = cipher.encrypt_field("Lefèvre").unwrap();
        encrypted.truncate(encrypted.len() - 4);
        assert!(cipher.decrypt_field(&encrypted).is_err());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let cipher = FieldCipher::from_secret("super-secret");
        let output = format!("{cipher:?}");
        assert!(!output.contains("super-secret"));
    }
}
