// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization failure taxonomy.
//!
//! Every stage of request authorization (header extraction, signature
//! verification, claim validation, permission check) reports its failure as
//! a distinct [`AuthError`] variant. The variant determines the HTTP status,
//! while the response body is collapsed to a category-level message so that
//! callers cannot probe which individual check rejected a token. The precise
//! variant is recorded in the logs at the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authorization error type.
///
/// The `#[error]` messages are the internal descriptions used for logging
/// and `Display`; responses use [`AuthError::public_message`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present (or an empty one)
    #[error("authorization header is expected")]
    MissingHeader,

    /// Authorization scheme is not `Bearer`
    #[error("authorization header must use the Bearer scheme")]
    MalformedScheme,

    /// Scheme word present but no token follows it
    #[error("bearer token not found in authorization header")]
    MissingToken,

    /// Header does not split into exactly scheme and token
    #[error("authorization header must be a single bearer token")]
    MalformedHeader,

    /// Token is not three segments, or its header lacks a key id
    #[error("token is not a well-formed JWT carrying a key id")]
    MalformedToken,

    /// Signature verification failed, or the declared algorithm is not
    /// on the configured allow-list
    #[error("token signature verification failed")]
    InvalidSignature,

    /// Token expiry is at or before the verification instant
    #[error("token has expired")]
    TokenExpired,

    /// Token audience does not include the expected audience
    #[error("token audience does not match")]
    InvalidAudience,

    /// Token issuer does not equal the expected issuer
    #[error("token issuer does not match")]
    InvalidIssuer,

    /// Claims segment could not be decoded into the expected shape
    #[error("token claims could not be decoded")]
    TokenUnparseable,

    /// Token references a key id absent from the signing key set
    #[error("no signing key matches the token key id")]
    UnknownSigningKey,

    /// Verified claims carry no permissions array at all
    #[error("permissions claim not included in token")]
    PermissionsClaimMissing,

    /// Permissions array present but the required entry is not
    #[error("required permission not granted")]
    PermissionDenied,

    /// Signing key authority unreachable or answered non-2xx
    #[error("failed to fetch signing keys: {0}")]
    KeySourceUnavailable(String),

    /// Signing key authority answered with unusable key material
    #[error("signing key data malformed: {0}")]
    KeySourceMalformed(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Internal error code, one per variant. Logged, never sent.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_auth_header",
            AuthError::MalformedScheme => "malformed_scheme",
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedHeader => "malformed_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::TokenUnparseable => "token_unparseable",
            AuthError::UnknownSigningKey => "unknown_signing_key",
            AuthError::PermissionsClaimMissing => "permissions_claim_missing",
            AuthError::PermissionDenied => "permission_denied",
            AuthError::KeySourceUnavailable(_) => "key_source_unavailable",
            AuthError::KeySourceMalformed(_) => "key_source_malformed",
        }
    }

    /// HTTP status for this error.
    ///
    /// Header-shape and token-validity failures are 401; tokens (or claim
    /// sets) the service cannot make sense of are 400; a verified token
    /// lacking the required permission is 403; signing-key infrastructure
    /// failures are 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedScheme
            | AuthError::MissingToken
            | AuthError::MalformedHeader
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidAudience
            | AuthError::InvalidIssuer => StatusCode::UNAUTHORIZED,
            AuthError::MalformedToken
            | AuthError::TokenUnparseable
            | AuthError::UnknownSigningKey
            | AuthError::PermissionsClaimMissing => StatusCode::BAD_REQUEST,
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::KeySourceUnavailable(_) | AuthError::KeySourceMalformed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error code exposed in the response body.
    ///
    /// Token-validity and key-source variants collapse to one code per
    /// category so the body never reveals which check rejected the token.
    pub fn public_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_auth_header",
            AuthError::MalformedScheme | AuthError::MissingToken | AuthError::MalformedHeader => {
                "invalid_auth_header"
            }
            AuthError::MalformedToken
            | AuthError::TokenUnparseable
            | AuthError::UnknownSigningKey
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidAudience
            | AuthError::InvalidIssuer => "invalid_token",
            AuthError::PermissionsClaimMissing => "invalid_claims",
            AuthError::PermissionDenied => "forbidden",
            AuthError::KeySourceUnavailable(_) | AuthError::KeySourceMalformed(_) => {
                "key_source_error"
            }
        }
    }

    /// Message exposed in the response body.
    ///
    /// Header-shape failures may describe the expected shape; everything
    /// about the token itself stays category-generic.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "Authorization header is expected.",
            AuthError::MalformedScheme => "Authorization header must start with \"Bearer\".",
            AuthError::MissingToken => "Token not found.",
            AuthError::MalformedHeader => "Authorization header must be bearer token.",
            AuthError::MalformedToken
            | AuthError::TokenUnparseable
            | AuthError::UnknownSigningKey => "Unable to parse authentication token.",
            AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidAudience
            | AuthError::InvalidIssuer => "Token verification failed.",
            AuthError::PermissionsClaimMissing => "Permissions not included in token.",
            AuthError::PermissionDenied => "Permission not found.",
            AuthError::KeySourceUnavailable(_) | AuthError::KeySourceMalformed(_) => {
                "Unable to verify credentials at this time."
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(
                status = %status,
                error_code = self.error_code(),
                detail = %self,
                "authorization infrastructure failure"
            );
        } else {
            tracing::debug!(
                status = %status,
                error_code = self.error_code(),
                detail = %self,
                "request not authorized"
            );
        }
        let body = Json(AuthErrorBody {
            error: self.public_message().to_string(),
            error_code: self.public_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AuthError) -> serde_json::Value {
        let response = error.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn status_map_is_complete() {
        use AuthError::*;
        let cases = [
            (MissingHeader, StatusCode::UNAUTHORIZED),
            (MalformedScheme, StatusCode::UNAUTHORIZED),
            (MissingToken, StatusCode::UNAUTHORIZED),
            (MalformedHeader, StatusCode::UNAUTHORIZED),
            (MalformedToken, StatusCode::BAD_REQUEST),
            (TokenUnparseable, StatusCode::BAD_REQUEST),
            (UnknownSigningKey, StatusCode::BAD_REQUEST),
            (InvalidSignature, StatusCode::UNAUTHORIZED),
            (TokenExpired, StatusCode::UNAUTHORIZED),
            (InvalidAudience, StatusCode::UNAUTHORIZED),
            (InvalidIssuer, StatusCode::UNAUTHORIZED),
            (PermissionsClaimMissing, StatusCode::BAD_REQUEST),
            (PermissionDenied, StatusCode::FORBIDDEN),
            (KeySourceUnavailable("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (KeySourceMalformed("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{}", error.error_code());
        }
    }

    #[tokio::test]
    async fn missing_header_returns_401_with_specific_message() {
        let response = AuthError::MissingHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(AuthError::MissingHeader).await;
        assert_eq!(body["error_code"], "missing_auth_header");
        assert_eq!(body["error"], "Authorization header is expected.");
    }

    #[tokio::test]
    async fn token_validity_failures_share_one_body() {
        let expired = body_json(AuthError::TokenExpired).await;
        let audience = body_json(AuthError::InvalidAudience).await;
        let signature = body_json(AuthError::InvalidSignature).await;
        assert_eq!(expired, audience);
        assert_eq!(expired, signature);
        assert_eq!(expired["error_code"], "invalid_token");
    }

    #[tokio::test]
    async fn permission_denied_returns_403() {
        let response = AuthError::PermissionDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(AuthError::PermissionDenied).await;
        assert_eq!(body["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn key_source_failure_does_not_leak_detail() {
        let error = AuthError::KeySourceUnavailable("http://10.0.0.7 refused".into());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(error).await;
        assert_eq!(body["error"], "Unable to verify credentials at this time.");
        assert!(!body.to_string().contains("10.0.0.7"));
    }
}
