use crate::{
    AppState,
    types::{AppError, Ingredient, IngredientsResponse, NewIngredient, Result},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

/// List every ingredient
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    responses(
        (status = 200, description = "All ingredients", body = IngredientsResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "ingredients",
    security(("bearer_auth" = []))
)]
pub async fn list_ingredients(State(state): State<AppState>) -> Result<Json<IngredientsResponse>> {
    let ingredients = state.ingredients.list_all().await?;

    Ok(Json(IngredientsResponse {
        count: ingredients.len(),
        ingredients,
    }))
}

/// Create an ingredient (admin)
#[utoipa::path(
    post,
    path = "/api/v1/ingredients",
    request_body = NewIngredient,
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing, invalid or non-admin token"),
        (status = 409, description = "Name already taken")
    ),
    tag = "ingredients",
    security(("bearer_auth" = []))
)]
pub async fn create_ingredient(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewIngredient>, JsonRejection>,
) -> Result<(StatusCode, Json<Ingredient>)> {
    let Json(candidate) = payload?;

    if let Some(error) = state.ingredients.validate(&candidate) {
        return Err(AppError::Validation(vec![error]));
    }

    let ingredient = state.ingredients.create(candidate).await?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}
