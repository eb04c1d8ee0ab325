// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drink store.
//!
//! Single-table storage behind the `RwLock` in [`crate::state::AppState`].
//! Identifiers are assigned sequentially starting at 1 and never reused;
//! listings come back in id order. Titles are unique across the menu, and
//! a duplicate maps to 422 like the unique-constraint violation it stands
//! in for.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{CreateDrinkRequest, Drink, UpdateDrinkRequest};

/// In-memory drink table.
pub struct DrinkStore {
    drinks: BTreeMap<i64, Drink>,
    next_id: i64,
}

impl Default for DrinkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DrinkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            drinks: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// All drinks, ordered by id.
    pub fn list(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    /// Add a drink to the menu.
    pub fn create(&mut self, request: CreateDrinkRequest) -> Result<Drink, ApiError> {
        validate_title(&request.title)?;
        if self.title_taken(&request.title, None) {
            return Err(ApiError::unprocessable(
                "A drink with this title already exists",
            ));
        }

        let drink = Drink {
            id: self.next_id,
            title: request.title,
            recipe: request.recipe,
        };
        self.next_id += 1;
        self.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    /// Modify an existing drink. Fields absent from the request keep
    /// their current value. An unknown id is 404 before the payload is
    /// looked at.
    pub fn update(&mut self, id: i64, request: UpdateDrinkRequest) -> Result<Drink, ApiError> {
        if !self.drinks.contains_key(&id) {
            return Err(ApiError::not_found("Drink not found"));
        }

        if let Some(title) = &request.title {
            validate_title(title)?;
            if self.title_taken(title, Some(id)) {
                return Err(ApiError::unprocessable(
                    "A drink with this title already exists",
                ));
            }
        }

        let Some(drink) = self.drinks.get_mut(&id) else {
            return Err(ApiError::not_found("Drink not found"));
        };

        if let Some(title) = request.title {
            drink.title = title;
        }
        if let Some(recipe) = request.recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    /// Remove a drink from the menu.
    pub fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        if self.drinks.remove(&id).is_none() {
            return Err(ApiError::not_found("Drink not found"));
        }
        Ok(())
    }

    fn title_taken(&self, title: &str, exclude_id: Option<i64>) -> bool {
        self.drinks
            .values()
            .any(|drink| drink.title == title && exclude_id != Some(drink.id))
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("Drink title must not be empty"));
    }
    Ok(())
}
