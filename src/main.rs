// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use coffee_api::api::router;
use coffee_api::auth::{JwksCache, TokenVerifier};
use coffee_api::config::{Config, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV};
use coffee_api::state::AppState;
use coffee_api::store::DrinkStore;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json");
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env().expect("Failed to load configuration");

    let keys = JwksCache::new(config.jwks_url.clone());
    let verifier = TokenVerifier::new(
        keys,
        config.issuer.clone(),
        config.audience.clone(),
        config.algorithms.clone(),
    );
    let state = AppState::new(DrinkStore::new(), verifier);
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!(
        issuer = %config.issuer,
        audience = %config.audience,
        "Coffee API listening on http://{addr} (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, finishing in-flight requests");
}
