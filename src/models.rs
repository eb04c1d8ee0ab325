// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Drink Forms
//!
//! Drinks serialize in two forms: the **long form** ([`Drink`]) carrying
//! the complete recipe, and the **short form** ([`DrinkSummary`]) which
//! omits ingredient names — the public menu reveals proportions and colors
//! only, not what is in the cup.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Ingredient Types
// =============================================================================

/// One ingredient of a drink recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Ingredient {
    /// Ingredient name (e.g. "matcha").
    pub name: String,
    /// Display color for the menu graphic (CSS color string).
    pub color: String,
    /// Relative parts of this ingredient. Fractional parts are valid
    /// (e.g. 1.5).
    pub parts: f64,
}

/// Short-form ingredient: color and proportion without the name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct IngredientSummary {
    /// Display color for the menu graphic.
    pub color: String,
    /// Relative parts of this ingredient.
    pub parts: f64,
}

// =============================================================================
// Drink Models
// =============================================================================

/// A drink on the menu, long form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Drink {
    /// Store-assigned identifier.
    pub id: i64,
    /// Drink title, unique across the menu.
    pub title: String,
    /// Full recipe.
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    /// The short form of this drink, with ingredient names omitted.
    pub fn summary(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientSummary {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }
}

/// A drink on the menu, short form (public listing).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DrinkSummary {
    /// Store-assigned identifier.
    pub id: i64,
    /// Drink title.
    pub title: String,
    /// Recipe with ingredient names omitted.
    pub recipe: Vec<IngredientSummary>,
}

// =============================================================================
// Request Models
// =============================================================================

/// Request to add a drink to the menu.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    /// Drink title, unique across the menu.
    pub title: String,
    /// Full recipe.
    pub recipe: Vec<Ingredient>,
}

/// Request to modify a drink. Omitted fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    /// New title, if changing.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement recipe, if changing.
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}
