// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Bearer-token authorization against an Auth0-style token issuer.
//!
//! ## Request Flow
//!
//! 1. Client sends `Authorization: Bearer <JWT>`
//! 2. [`extractor::bearer_token`] validates the header shape
//! 3. [`verify::TokenVerifier`] checks signature, expiry, audience and
//!    issuer against the issuer's published signing keys
//!    ([`jwks::JwksCache`], fetched from
//!    `https://{domain}/.well-known/jwks.json` and cached with a TTL)
//! 4. [`claims::Claims::require_permission`] matches the endpoint's
//!    permission against the token's `permissions` claim
//!
//! Handlers opt in by taking [`Auth`] (authentication only) or
//! [`extractor::Require`] (authentication plus one permission).
//!
//! ## Security
//!
//! - Every check fails closed; there is no bypass path in any build
//! - Signature algorithms are allow-listed; `"none"` and HMAC are rejected
//!   before any key material is consulted
//! - Expiry is strict: a token whose `exp` equals the current second is
//!   already expired, with no clock-skew leeway
//! - Response bodies never reveal which individual check rejected a token;
//!   the precise reason goes to the logs only

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod permissions;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::Claims;
pub use error::AuthError;
pub use extractor::{Auth, Require};
pub use jwks::JwksCache;
pub use permissions::{DeleteDrinks, GetDrinksDetail, PatchDrinks, Permission, PostDrinks};
pub use verify::TokenVerifier;
