// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # GSB Visit Server
//!
//! REST backend for medical-visit records: visiteurs (field representatives),
//! praticiens (practitioners), visites and motifs. Visiteurs authenticate with
//! email/password and receive a 24-hour JWT; identifying fields are encrypted
//! at rest with AES-256-GCM.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
