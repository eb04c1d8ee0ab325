// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! ## Flow
//!
//! 1. Peek the token header (no signature check yet) for `kid` and `alg`
//! 2. Gate the declared algorithm against the configured allow-list;
//!    `"none"`, HMAC names and unknown names are rejected outright
//! 3. Look up the key id in the signing key set
//! 4. Verify the signature with the gated algorithm only
//! 5. Check expiry, audience and issuer, in that order, against an
//!    explicit clock with no leeway — `exp == now` is already expired
//!
//! [`TokenVerifier::verify`] drives the flow against the cached key set and
//! retries exactly once after a forced refresh when the key id is unknown,
//! so freshly rotated keys are picked up without ever looping.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, Algorithm, Validation};
use serde::Deserialize;

use super::claims::Claims;
use super::error::AuthError;
use super::jwks::{decoding_key_for, JwksCache};

/// Parse a JOSE algorithm name, admitting only the asymmetric algorithms a
/// public key set can express. `"none"`, HMAC names and anything unknown
/// come back as `None`.
pub(crate) fn algorithm_from_name(name: &str) -> Option<Algorithm> {
    match name {
        "RS256" => Some(Algorithm::RS256),
        "RS384" => Some(Algorithm::RS384),
        "RS512" => Some(Algorithm::RS512),
        "ES256" => Some(Algorithm::ES256),
        "ES384" => Some(Algorithm::ES384),
        _ => None,
    }
}

/// Unverified view of the token header, decoded before any signature check.
#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: String,
    #[serde(default)]
    kid: Option<String>,
}

/// Split the compact form and decode the header segment.
fn peek_header(token: &str) -> Result<RawHeader, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedToken);
    }

    let header =
        Base64UrlUnpadded::decode_vec(segments[0]).map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice(&header).map_err(|_| AuthError::MalformedToken)
}

/// Verifies bearer tokens against the authority's signing keys.
///
/// Holds no per-request state; the one shared resource is the key cache.
pub struct TokenVerifier {
    /// Signing key set source
    keys: JwksCache,
    /// Expected `iss` claim, `https://{domain}/`
    issuer: String,
    /// Expected `aud` claim
    audience: String,
    /// Algorithm allow-list
    algorithms: Vec<Algorithm>,
}

impl TokenVerifier {
    /// Create a verifier for the given key source and expected claims.
    pub fn new(
        keys: JwksCache,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            algorithms,
        }
    }

    /// The signing key cache backing this verifier.
    pub fn keys(&self) -> &JwksCache {
        &self.keys
    }

    /// Verify `token` against the current key set.
    ///
    /// When the token names a key id missing from the cached set, the set
    /// is refreshed once and verification retried; a second miss surfaces
    /// [`AuthError::UnknownSigningKey`].
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self.keys.current().await?;
        match self.verify_at(token, &keys, Utc::now()) {
            Err(AuthError::UnknownSigningKey) => {
                tracing::debug!("token key id not in cached set, refreshing keys");
                let keys = self.keys.refresh().await?;
                self.verify_at(token, &keys, Utc::now())
            }
            result => result,
        }
    }

    /// Verify `token` against an explicit key set at an explicit instant.
    ///
    /// Pure function of its arguments and the configured expectations;
    /// never touches the network or the clock.
    pub fn verify_at(
        &self,
        token: &str,
        keys: &JwkSet,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let header = peek_header(token)?;
        let kid = header.kid.ok_or(AuthError::MalformedToken)?;

        // Algorithm gate. Fails closed before any key material is touched,
        // no matter what the header or signature bytes claim.
        let algorithm = algorithm_from_name(&header.alg)
            .filter(|alg| self.algorithms.contains(alg))
            .ok_or(AuthError::InvalidSignature)?;

        let jwk = keys
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid.as_str()))
            .ok_or(AuthError::UnknownSigningKey)?;
        let decoding_key = decoding_key_for(jwk)?;

        // Expiry and audience are checked manually below: the crate's own
        // exp check applies leeway, and the contract here is strict.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;

        let decoded =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::TokenUnparseable,
            })?;
        let claims = decoded.claims;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        if !claims.aud.as_ref().is_some_and(|aud| aud.contains(&self.audience)) {
            return Err(AuthError::InvalidAudience);
        }
        if claims.iss.as_deref() != Some(self.issuer.as_str()) {
            return Err(AuthError::InvalidIssuer);
        }

        Ok(claims)
    }
}
