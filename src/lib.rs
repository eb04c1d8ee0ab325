// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee API - Drink Menu Service
//!
//! This crate provides the drink menu service for the coffee shop: a public
//! short-form menu plus permission-gated management endpoints, authorized by
//! Auth0-issued JWTs verified against the tenant's published signing keys.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token verification and permission checks (Auth0 JWT)
//! - `store` - In-memory drink storage

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
