// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission identifiers for protected endpoints.
//!
//! Each protected operation is registered with exactly one permission
//! string, matched verbatim against the token's `permissions` claim. The
//! identifiers are marker types so the requirement is part of a handler's
//! signature (see [`super::extractor::Require`]) rather than a runtime
//! lookup table.

/// A permission string required by a protected operation.
pub trait Permission {
    /// The identifier as it appears in the token's `permissions` claim.
    const NAME: &'static str;
}

/// Read the full drink list including ingredient names.
pub struct GetDrinksDetail;

/// Create a new drink.
pub struct PostDrinks;

/// Modify an existing drink.
pub struct PatchDrinks;

/// Remove a drink.
pub struct DeleteDrinks;

impl Permission for GetDrinksDetail {
    const NAME: &'static str = "get:drinks-detail";
}

impl Permission for PostDrinks {
    const NAME: &'static str = "post:drinks";
}

impl Permission for PatchDrinks {
    const NAME: &'static str = "patch:drinks";
}

impl Permission for DeleteDrinks {
    const NAME: &'static str = "delete:drinks";
}
