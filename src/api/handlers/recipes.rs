use crate::{
    AppState,
    auth::AuthUser,
    types::{MessageResponse, NewRecipe, Recipe, RecipesResponse, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
};

/// Values of every `ingredients` key, in query order. Blank values are
/// ignored.
fn ingredient_filter(pairs: Vec<(String, String)>) -> Vec<String> {
    pairs
        .into_iter()
        .filter(|(key, value)| key == "ingredients" && !value.trim().is_empty())
        .map(|(_, value)| value)
        .collect()
}

/// List recipes, optionally restricted to those using any of the given ingredients
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(
        ("ingredients" = Option<Vec<String>>, Query, description = "Repeatable; a recipe matches when it uses at least one")
    ),
    responses(
        (status = 200, description = "Matching recipes", body = RecipesResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "recipes",
    security(("bearer_auth" = []))
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RecipesResponse>> {
    let names = ingredient_filter(pairs);
    let recipes = state.recipes.list_all_possible(&names).await?;

    Ok(Json(RecipesResponse {
        count: recipes.len(),
        recipes,
    }))
}

/// Create a recipe from existing ingredients (admin)
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = NewRecipe,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Validation failed or unknown ingredients"),
        (status = 401, description = "Missing, invalid or non-admin token"),
        (status = 409, description = "Name already taken")
    ),
    tag = "recipes",
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewRecipe>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let Json(candidate) = payload?;

    let resolved = state.recipes.validate(candidate).await?;
    let recipe = state.recipes.create(resolved).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Add the recipe to the caller's favorites, or remove it if already there
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/flag-unflag",
    params(
        ("id" = i64, Path, description = "Recipe id")
    ),
    responses(
        (status = 200, description = "New favorite state", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Recipe not found")
    ),
    tag = "recipes",
    security(("bearer_auth" = []))
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(recipe_id) = id?;

    let favorite = state.recipes.toggle_favorite(user.user_id, recipe_id).await?;

    Ok(Json(MessageResponse::new(favorite.message())))
}

/// The caller's favorite recipes
#[utoipa::path(
    get,
    path = "/api/v1/recipes/favorites",
    responses(
        (status = 200, description = "Favorite recipes", body = RecipesResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "recipes",
    security(("bearer_auth" = []))
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<RecipesResponse>> {
    let recipes = state.recipes.list_favorites(user.user_id).await?;

    Ok(Json(RecipesResponse {
        count: recipes.len(),
        recipes,
    }))
}
