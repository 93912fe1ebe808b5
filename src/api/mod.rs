//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for the cookbook, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and role gates
//!
//! # API Endpoints
//!
//! All paths are under `/api/v1`.
//!
//! ## Open
//! - `GET /health` - Health check
//! - `POST /login` - Exchange credentials for a token (also set as a cookie)
//! - `GET /logout` - Expire the token cookie
//!
//! ## Any authenticated user
//! - `GET /ingredients` - List ingredients
//! - `GET /recipes?ingredients=a&ingredients=b` - List recipes using any of the ingredients
//! - `GET /recipes/favorites` - The caller's favorite recipes
//! - `POST /recipes/{id}/flag-unflag` - Toggle a favorite
//! - `GET /users/my-infos` - The caller's account
//! - `PATCH /users/password-change` - Change the caller's password
//!
//! ## Admin only
//! - `POST /ingredients` - Create an ingredient
//! - `POST /recipes` - Create a recipe from existing ingredients
//! - `POST /users` - Create an account
//!
//! # Authentication
//!
//! Protected endpoints read the token from the `Authorization` header,
//! then from the configured cookie:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{
    FieldError, Ingredient, IngredientRef, IngredientsResponse, LoginRequest, LoginResponse,
    MessageResponse, NewIngredient, NewRecipe, NewUser, PasswordChangeRequest, Recipe,
    RecipesResponse, User,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Cookbook API",
        description = "Ingredients, recipes, ingredient search and favorites behind role-gated JWT authentication."
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::ingredients::list_ingredients,
        handlers::ingredients::create_ingredient,
        handlers::recipes::list_recipes,
        handlers::recipes::create_recipe,
        handlers::recipes::toggle_favorite,
        handlers::recipes::list_favorites,
        handlers::users::create_user,
        handlers::users::my_infos,
        handlers::users::change_password,
    ),
    components(schemas(
        FieldError,
        Ingredient,
        IngredientRef,
        IngredientsResponse,
        LoginRequest,
        LoginResponse,
        MessageResponse,
        NewIngredient,
        NewRecipe,
        NewUser,
        PasswordChangeRequest,
        Recipe,
        RecipesResponse,
        User,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Login and logout"),
        (name = "ingredients", description = "Ingredient catalogue"),
        (name = "recipes", description = "Recipes and favorites"),
        (name = "users", description = "Account management")
    )
)]
pub struct ApiDoc;
