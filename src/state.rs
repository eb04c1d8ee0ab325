// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenVerifier;
use crate::store::DrinkStore;

/// Shared application state handed to every handler and extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<DrinkStore>>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(store: DrinkStore, verifier: TokenVerifier) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            verifier: Arc::new(verifier),
        }
    }
}
