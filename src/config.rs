// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. The issuer
//! and key set URLs are derived from the tenant domain rather than configured
//! separately, so they cannot drift apart.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (e.g. `dev-coffee.us.auth0.com`) | Required |
//! | `AUTH0_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH0_ALGORITHMS` | Comma-separated signing algorithm allow-list | `RS256` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use jsonwebtoken::Algorithm;
use url::Url;

use crate::auth::verify::algorithm_from_name;

/// Environment variable name for the Auth0 tenant domain.
pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";

/// Environment variable name for the expected JWT audience.
pub const AUTH0_AUDIENCE_ENV: &str = "AUTH0_AUDIENCE";

/// Environment variable name for the signing algorithm allow-list.
pub const AUTH0_ALGORITHMS_ENV: &str = "AUTH0_ALGORITHMS";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default `RUST_LOG` filter when the variable is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON Web Key Set endpoint, derived from the tenant domain.
    pub jwks_url: String,
    /// Expected `iss` claim, derived from the tenant domain.
    pub issuer: String,
    /// Expected `aud` claim.
    pub audience: String,
    /// Accepted token signing algorithms.
    pub algorithms: Vec<Algorithm>,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {var} is invalid: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let domain = lookup(AUTH0_DOMAIN_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingVar(AUTH0_DOMAIN_ENV))?;
        let issuer = tenant_issuer(&domain)?;
        let jwks_url = format!("{issuer}.well-known/jwks.json");

        let audience = lookup(AUTH0_AUDIENCE_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingVar(AUTH0_AUDIENCE_ENV))?;

        let algorithms = parse_algorithms(
            &lookup(AUTH0_ALGORITHMS_ENV).unwrap_or_else(|| "RS256".to_string()),
        )?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup(PORT_ENV) {
            None => 8080,
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: PORT_ENV,
                reason: format!("\"{raw}\" is not a valid port number"),
            })?,
        };

        Ok(Self {
            jwks_url,
            issuer,
            audience,
            algorithms,
            host,
            port,
        })
    }
}

/// Derive the issuer URL (`https://{domain}/`) from a bare tenant domain.
fn tenant_issuer(domain: &str) -> Result<String, ConfigError> {
    let issuer = format!("https://{domain}/");
    let parsed = Url::parse(&issuer).map_err(|e| ConfigError::InvalidVar {
        var: AUTH0_DOMAIN_ENV,
        reason: e.to_string(),
    })?;
    // A domain carrying a scheme, path, or query would silently shift the
    // key set URL, so only a bare host (with optional port) is accepted.
    if parsed.host_str().is_none() || parsed.path() != "/" || parsed.query().is_some() {
        return Err(ConfigError::InvalidVar {
            var: AUTH0_DOMAIN_ENV,
            reason: format!("\"{domain}\" must be a bare domain such as tenant.us.auth0.com"),
        });
    }
    Ok(issuer)
}

fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let algorithm = algorithm_from_name(name).ok_or_else(|| ConfigError::InvalidVar {
            var: AUTH0_ALGORITHMS_ENV,
            reason: format!("unsupported signing algorithm \"{name}\""),
        })?;
        if !algorithms.contains(&algorithm) {
            algorithms.push(algorithm);
        }
    }
    if algorithms.is_empty() {
        return Err(ConfigError::InvalidVar {
            var: AUTH0_ALGORITHMS_ENV,
            reason: "at least one signing algorithm is required".to_string(),
        });
    }
    Ok(algorithms)
}
