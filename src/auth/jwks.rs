// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key set (JWKS) retrieval and caching.
//!
//! ## Behavior
//!
//! - Keys come from the authority's `/.well-known/jwks.json` document
//! - Fetches run with a bounded timeout and are cached with a TTL
//! - `refresh` forces a fetch (used once when a token names an unknown kid)
//! - On refresh failure a last-known-good set is served while it is younger
//!   than [`STALE_SERVE_LIMIT`]; beyond that the failure surfaces
//! - A preloaded cache holds a pinned key set and never touches the network
//!
//! Initialized from `AUTH0_DOMAIN` in main.rs and handed to the
//! [`TokenVerifier`](super::verify::TokenVerifier) inside `AppState`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::error::AuthError;

/// Default signing-key cache TTL (5 minutes).
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Longest a stale key set may keep being served after refresh failures.
const STALE_SERVE_LIMIT: Duration = Duration::from_secs(3600);

/// Network timeout for key set fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Cached key set with its fetch instant.
struct CacheEntry {
    keys: JwkSet,
    fetched_at: Instant,
}

/// TTL-cached view of the signing authority's key set.
#[derive(Clone)]
pub struct JwksCache {
    /// Key set URL; `None` for a preloaded, never-refreshed set
    url: Option<String>,
    /// Cache TTL
    cache_ttl: Duration,
    /// Cached key set
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksCache {
    /// Create a cache backed by a remote key set endpoint.
    ///
    /// # Arguments
    /// - `url`: the key set URL (e.g. `https://{domain}/.well-known/jwks.json`)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create a cache over a pinned key set. Never fetches; `refresh`
    /// hands back the pinned set unchanged.
    pub fn preloaded(keys: JwkSet) -> Self {
        Self {
            url: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(Some(CacheEntry {
                keys,
                fetched_at: Instant::now(),
            }))),
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Current key set: the cached one while fresh, otherwise a fetch.
    pub async fn current(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if self.url.is_none() || entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.keys.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Force a fetch, bypassing the TTL.
    ///
    /// On fetch failure the last-known-good set is served while it is
    /// younger than [`STALE_SERVE_LIMIT`]; otherwise the failure surfaces.
    pub async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let Some(url) = self.url.as_deref() else {
            // Pinned set, nothing upstream to consult.
            let cache = self.cache.read().await;
            return cache.as_ref().map(|entry| entry.keys.clone()).ok_or_else(|| {
                AuthError::KeySourceUnavailable("no signing key source configured".to_string())
            });
        };

        match self.fetch(url).await {
            Ok(keys) => {
                let mut cache = self.cache.write().await;
                *cache = Some(CacheEntry {
                    keys: keys.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(keys)
            }
            Err(err) => {
                let cache = self.cache.read().await;
                if let Some(entry) = &*cache {
                    if entry.fetched_at.elapsed() < STALE_SERVE_LIMIT {
                        tracing::warn!(
                            error = %err,
                            "signing key refresh failed, serving last known good set"
                        );
                        return Ok(entry.keys.clone());
                    }
                }
                Err(err)
            }
        }
    }

    /// Fetch the key set from the endpoint.
    async fn fetch(&self, url: &str) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::KeySourceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySourceUnavailable(format!(
                "HTTP {} from key set endpoint",
                response.status()
            )));
        }

        response.json::<JwkSet>().await.map_err(|e| {
            if e.is_decode() {
                AuthError::KeySourceMalformed(e.to_string())
            } else {
                AuthError::KeySourceUnavailable(e.to_string())
            }
        })
    }

    /// Check whether a usable key set is currently cached.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        match &*cache {
            Some(entry) => self.url.is_none() || entry.fetched_at.elapsed() < self.cache_ttl,
            None => false,
        }
    }
}

/// Convert a JWK's public material into a verification key.
pub(crate) fn decoding_key_for(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthError::KeySourceMalformed(format!("unusable RSA key: {e}"))),
        AlgorithmParameters::EllipticCurve(ec) => DecodingKey::from_ec_components(&ec.x, &ec.y)
            .map_err(|e| AuthError::KeySourceMalformed(format!("unusable EC key: {e}"))),
        _ => Err(AuthError::KeySourceMalformed(
            "unsupported key type in key set".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{self, TEST_KID};

    #[tokio::test]
    async fn second_read_within_ttl_hits_cache() {
        let server = test_support::serve_keys(vec![(200, test_support::jwk_set_body(&[TEST_KID]))])
            .await;
        let cache = JwksCache::new(&server.url);

        let first = cache.current().await.unwrap();
        let second = cache.current().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(server.hit_count(), 1);
        assert!(cache.is_cached().await);
    }

    #[tokio::test]
    async fn refresh_bypasses_ttl() {
        let server = test_support::serve_keys(vec![(200, test_support::jwk_set_body(&[TEST_KID]))])
            .await;
        let cache = JwksCache::new(&server.url);

        cache.current().await.unwrap();
        cache.refresh().await.unwrap();

        assert_eq!(server.hit_count(), 2);
    }

    #[tokio::test]
    async fn expired_ttl_refetches() {
        let server = test_support::serve_keys(vec![(200, test_support::jwk_set_body(&[TEST_KID]))])
            .await;
        let cache = JwksCache::new(&server.url).with_cache_ttl(Duration::ZERO);

        cache.current().await.unwrap();
        cache.current().await.unwrap();

        assert_eq!(server.hit_count(), 2);
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        // Bind an ephemeral port, then free it so the connection is refused.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let cache = JwksCache::new(format!("http://{addr}/.well-known/jwks.json"));
        let err = cache.current().await.unwrap_err();
        assert!(matches!(err, AuthError::KeySourceUnavailable(_)), "{err}");
    }

    #[tokio::test]
    async fn http_error_is_unavailable() {
        let server = test_support::serve_keys(vec![(404, "not here".to_string())]).await;
        let cache = JwksCache::new(&server.url);

        let err = cache.current().await.unwrap_err();
        assert!(matches!(err, AuthError::KeySourceUnavailable(_)), "{err}");
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let server = test_support::serve_keys(vec![(200, "<html>oops</html>".to_string())]).await;
        let cache = JwksCache::new(&server.url);

        let err = cache.current().await.unwrap_err();
        assert!(matches!(err, AuthError::KeySourceMalformed(_)), "{err}");
    }

    #[tokio::test]
    async fn refresh_failure_serves_last_known_good() {
        let server = test_support::serve_keys(vec![
            (200, test_support::jwk_set_body(&[TEST_KID])),
            (500, "upstream down".to_string()),
        ])
        .await;
        let cache = JwksCache::new(&server.url).with_cache_ttl(Duration::ZERO);

        cache.current().await.unwrap();
        let fallback = cache.current().await.unwrap();

        assert_eq!(server.hit_count(), 2);
        assert!(fallback
            .keys
            .iter()
            .any(|k| k.common.key_id.as_deref() == Some(TEST_KID)));
    }

    #[tokio::test]
    async fn preloaded_set_never_fetches() {
        let cache = JwksCache::preloaded(test_support::jwk_set(&[TEST_KID]));

        assert!(cache.is_cached().await);
        let current = cache.current().await.unwrap();
        let refreshed = cache.refresh().await.unwrap();
        assert_eq!(current, refreshed);
    }

    #[test]
    fn rsa_jwk_converts_to_decoding_key() {
        let keys = test_support::jwk_set(&[TEST_KID]);
        assert!(decoding_key_for(&keys.keys[0]).is_ok());
    }

    #[test]
    fn symmetric_key_material_is_rejected() {
        let keys: JwkSet = serde_json::from_value(serde_json::json!({
            "keys": [{ "kty": "oct", "kid": "sym-1", "k": "c2VjcmV0" }]
        }))
        .unwrap();

        let err = decoding_key_for(&keys.keys[0]).unwrap_err();
        assert!(matches!(err, AuthError::KeySourceMalformed(_)), "{err}");
    }
}
