//! # Cookbook Server
//!
//! A recipe catalogue service: ingredients, recipes composed of existing
//! ingredients, search by ingredient, per-user favorites and role-gated JWT
//! authentication, backed by SQLite through libsql.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `cookbook-server` binary
//! 2. **As a library** - Embed the domain services in your own Rust project
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use cookbook::db::DatabaseProvider;
//! use cookbook::services::{IngredientManager, IngredientService};
//! use cookbook::types::NewIngredient;
//! use std::sync::Arc;
//!
//! let db = Arc::new(DatabaseProvider::Memory.create_client().await?);
//! let ingredients = IngredientManager::new(db);
//! let flour = ingredients.create(NewIngredient::new("flour")).await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-db` | Local SQLite database (default) |
//! | `turso` | Remote Turso database |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - JWT issuing, role gate and password hashing
//! - [`cli`] - Command-line interface
//! - [`db`] - Repository traits and the libsql adapter
//! - [`services`] - Ingredient, recipe and user domain services
//! - [`types`] - Domain types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// JWT authentication and middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Database access (SQLite/Turso via libsql).
pub mod db;
/// Domain services.
pub mod services;
/// Core types (domain, requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

pub use db::TursoClient;
pub use types::{AppError, Result};
pub use utils::config::CookbookConfig;

use crate::auth::{AuthService, CredentialVerifier};
use crate::services::{
    IngredientManager, IngredientService, RecipeManager, RecipeService, UserManager, UserService,
};
use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Request bodies larger than this are rejected before reaching a handler.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based infrastructure configuration
    pub config: Arc<CookbookConfig>,
    /// Token issuing and validation
    pub auth_service: Arc<AuthService>,
    /// Ingredient domain service
    pub ingredients: Arc<dyn IngredientService>,
    /// Recipe and favorite domain service
    pub recipes: Arc<dyn RecipeService>,
    /// Account domain service
    pub users: Arc<dyn UserService>,
}

impl AppState {
    /// Wire the domain services onto one store.
    pub fn new(
        config: CookbookConfig,
        db: Arc<TursoClient>,
        auth_service: Arc<AuthService>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let ingredients: Arc<dyn IngredientService> =
            Arc::new(IngredientManager::new(db.clone()));
        let recipes: Arc<dyn RecipeService> = Arc::new(RecipeManager::new(
            db.clone(),
            db.clone(),
            ingredients.clone(),
        ));
        let users: Arc<dyn UserService> =
            Arc::new(UserManager::new(db, verifier, auth_service.clone()));

        Self {
            config: Arc::new(config),
            auth_service,
            ingredients,
            recipes,
            users,
        }
    }
}

/// The complete HTTP application: `/api/v1` routes plus tracing, CORS and
/// body size limits.
pub fn build_app(state: AppState) -> Router {
    let api = api::routes::create_router(&state);

    let app = Router::new().nest("/api/v1", api);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    app.layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
