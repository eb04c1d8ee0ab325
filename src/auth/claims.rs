// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified access-token claims and the permission check.

use serde::Deserialize;

use super::error::AuthError;

/// Audience claim. Token issuers emit either a single string or an array,
/// so both shapes deserialize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// True if the claim names `expected`, directly or as an array member.
    pub fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::Single(audience) => audience == expected,
            Audience::Multiple(audiences) => audiences.iter().any(|a| a == expected),
        }
    }
}

/// Claims decoded from a verified access token.
///
/// Standard OIDC claims plus the `permissions` array Auth0 adds when RBAC
/// is enabled for the API. Unknown claims are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// Issuer URL (`https://{domain}/`)
    #[serde(default)]
    pub iss: Option<String>,

    /// Subject, the canonical principal identifier
    pub sub: String,

    /// Audience(s) the token was minted for
    #[serde(default)]
    pub aud: Option<Audience>,

    /// Issued-at timestamp (seconds since epoch)
    #[serde(default)]
    pub iat: Option<i64>,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Authorized party (client id)
    #[serde(default)]
    pub azp: Option<String>,

    /// OAuth scopes, space-separated
    #[serde(default)]
    pub scope: Option<String>,

    /// Fine-grained permissions. Absent when the issuer has RBAC disabled
    /// for the API, which is distinct from an empty grant.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Require `permission` to be granted by this claim set.
    ///
    /// A claim set without any permissions array reports
    /// [`AuthError::PermissionsClaimMissing`] (issuer misconfiguration,
    /// not an under-privileged caller); an array lacking the entry,
    /// including an empty array, reports [`AuthError::PermissionDenied`].
    /// Matching is exact and case-sensitive, no wildcard semantics.
    pub fn require_permission(&self, permission: &str) -> Result<(), AuthError> {
        match &self.permissions {
            None => Err(AuthError::PermissionsClaimMissing),
            Some(granted) if granted.iter().any(|p| p == permission) => Ok(()),
            Some(_) => Err(AuthError::PermissionDenied),
        }
    }
}
