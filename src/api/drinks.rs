// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink menu endpoints.
//!
//! The public menu (`GET /drinks`) is open to anyone and serves the short
//! drink form. Every other operation requires a bearer token carrying the
//! matching permission, enforced by the [`Require`] extractor before the
//! handler body runs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks, Require},
    error::ApiError,
    models::{CreateDrinkRequest, Drink, DrinkSummary, UpdateDrinkRequest},
    state::AppState,
};

/// Public menu: all drinks in short form.
#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses(
        (status = 200, description = "All drinks, ingredient names omitted", body = [DrinkSummary])
    )
)]
pub async fn list_drinks(State(state): State<AppState>) -> Json<Vec<DrinkSummary>> {
    let store = state.store.read().await;
    Json(store.list().iter().map(Drink::summary).collect())
}

/// Full menu with complete recipes.
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All drinks with full recipes", body = [Drink]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing get:drinks-detail permission")
    )
)]
pub async fn list_drinks_detail(
    _auth: Require<GetDrinksDetail>,
    State(state): State<AppState>,
) -> Json<Vec<Drink>> {
    let store = state.store.read().await;
    Json(store.list())
}

/// Add a drink to the menu.
#[utoipa::path(
    post,
    path = "/drinks",
    tag = "Drinks",
    security(("bearer_auth" = [])),
    request_body = CreateDrinkRequest,
    responses(
        (status = 201, description = "Drink created", body = Drink),
        (status = 400, description = "Blank title"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing post:drinks permission"),
        (status = 422, description = "Title already taken")
    )
)]
pub async fn create_drink(
    _auth: Require<PostDrinks>,
    State(state): State<AppState>,
    Json(request): Json<CreateDrinkRequest>,
) -> Result<(StatusCode, Json<Drink>), ApiError> {
    let mut store = state.store.write().await;
    let drink = store.create(request)?;
    Ok((StatusCode::CREATED, Json(drink)))
}

/// Modify an existing drink. Omitted fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/drinks/{drink_id}",
    tag = "Drinks",
    security(("bearer_auth" = [])),
    params(
        ("drink_id" = i64, Path, description = "Identifier of the drink to modify")
    ),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "Updated drink", body = Drink),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing patch:drinks permission"),
        (status = 404, description = "Drink not found"),
        (status = 422, description = "Title already taken")
    )
)]
pub async fn update_drink(
    _auth: Require<PatchDrinks>,
    Path(drink_id): Path<i64>,
    State(state): State<AppState>,
    Json(request): Json<UpdateDrinkRequest>,
) -> Result<Json<Drink>, ApiError> {
    let mut store = state.store.write().await;
    let drink = store.update(drink_id, request)?;
    Ok(Json(drink))
}

/// Remove a drink from the menu.
#[utoipa::path(
    delete,
    path = "/drinks/{drink_id}",
    tag = "Drinks",
    security(("bearer_auth" = [])),
    params(
        ("drink_id" = i64, Path, description = "Identifier of the drink to delete")
    ),
    responses(
        (status = 204, description = "Drink deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing delete:drinks permission"),
        (status = 404, description = "Drink not found")
    )
)]
pub async fn delete_drink(
    _auth: Require<DeleteDrinks>,
    Path(drink_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete(drink_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{state, verified_claims};
    use crate::models::Ingredient;
    use std::marker::PhantomData;

    fn granted<P>(permission: &str) -> Require<P> {
        Require(verified_claims(&[permission]), PhantomData)
    }

    fn matcha_request() -> CreateDrinkRequest {
        CreateDrinkRequest {
            title: "Matcha Latte".to_string(),
            recipe: vec![
                Ingredient {
                    name: "matcha".to_string(),
                    color: "#88b04b".to_string(),
                    parts: 1.0,
                },
                Ingredient {
                    name: "milk".to_string(),
                    color: "#fffdd0".to_string(),
                    parts: 3.0,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_drink_persists_and_returns_created() {
        let state = state();

        let (status, Json(drink)) = create_drink(
            granted("post:drinks"),
            State(state.clone()),
            Json(matcha_request()),
        )
        .await
        .expect("drink creation succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(drink.id, 1);
        assert_eq!(drink.title, "Matcha Latte");

        let stored = state.store.read().await.list();
        assert_eq!(stored, vec![drink]);
    }

    #[tokio::test]
    async fn public_listing_serves_short_form() {
        let state = state();
        state
            .store
            .write()
            .await
            .create(matcha_request())
            .expect("seed drink");

        let Json(menu) = list_drinks(State(state.clone())).await;

        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].recipe.len(), 2);
        assert_eq!(menu[0].recipe[0].color, "#88b04b");

        let Json(detail) =
            list_drinks_detail(granted("get:drinks-detail"), State(state.clone())).await;
        assert_eq!(detail[0].recipe[0].name, "matcha");
    }

    #[tokio::test]
    async fn update_drink_applies_partial_changes() {
        let state = state();
        let drink = state
            .store
            .write()
            .await
            .create(matcha_request())
            .expect("seed drink");

        let Json(updated) = update_drink(
            granted("patch:drinks"),
            Path(drink.id),
            State(state.clone()),
            Json(UpdateDrinkRequest {
                title: Some("Iced Matcha".to_string()),
                recipe: None,
            }),
        )
        .await
        .expect("drink update succeeds");

        assert_eq!(updated.title, "Iced Matcha");
        assert_eq!(updated.recipe, drink.recipe);
    }

    #[tokio::test]
    async fn missing_drink_is_not_found() {
        let state = state();

        let err = update_drink(
            granted("patch:drinks"),
            Path(7),
            State(state.clone()),
            Json(UpdateDrinkRequest {
                title: None,
                recipe: None,
            }),
        )
        .await
        .expect_err("no drink to update");
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = delete_drink(granted("delete:drinks"), Path(7), State(state))
            .await
            .expect_err("no drink to delete");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_drink_empties_the_menu() {
        let state = state();
        let drink = state
            .store
            .write()
            .await
            .create(matcha_request())
            .expect("seed drink");

        let status = delete_drink(granted("delete:drinks"), Path(drink.id), State(state.clone()))
            .await
            .expect("drink deletion succeeds");

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.store.read().await.list().is_empty());
    }

    #[tokio::test]
    async fn duplicate_title_is_unprocessable() {
        let state = state();

        create_drink(
            granted("post:drinks"),
            State(state.clone()),
            Json(matcha_request()),
        )
        .await
        .expect("first creation succeeds");

        let err = create_drink(granted("post:drinks"), State(state), Json(matcha_request()))
            .await
            .expect_err("duplicate title rejected");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
