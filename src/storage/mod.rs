// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Layer
//!
//! File-backed persistence with field-level encryption.
//!
//! The [`DocumentStore`] keeps one JSON document per record under a directory
//! per entity. Records holding identifying data are sealed through the
//! [`crypto::FieldCipher`] by the repositories in [`repository`]; the store
//! itself only moves bytes.

pub mod crypto;
pub mod document_store;
pub mod paths;
pub mod repository;

pub use crypto::FieldCipher;
pub use document_store::{DocumentStore, StorageError, StorageResult};
pub use paths::StoragePaths;
