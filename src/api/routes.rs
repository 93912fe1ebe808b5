use crate::AppState;
use crate::api::handlers::{auth, health, ingredients, recipes, users};
use crate::auth::middleware::{AuthGate, auth_middleware};
use crate::types::Role;
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

/// Routes served under `/api/v1`, each group behind its role gate.
pub fn create_router(state: &AppState) -> Router<AppState> {
    let gate = |role: Role| {
        AuthGate::new(
            state.auth_service.clone(),
            role,
            &state.config.auth.cookie_name,
        )
    };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout));

    let user_routes = Router::new()
        .route("/ingredients", get(ingredients::list_ingredients))
        .route("/recipes", get(recipes::list_recipes))
        .route("/recipes/favorites", get(recipes::list_favorites))
        .route("/recipes/{id}/flag-unflag", post(recipes::toggle_favorite))
        .route("/users/my-infos", get(users::my_infos))
        .route("/users/password-change", patch(users::change_password))
        .route_layer(middleware::from_fn_with_state(
            gate(Role::User),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/ingredients", post(ingredients::create_ingredient))
        .route("/recipes", post(recipes::create_recipe))
        .route("/users", post(users::create_user))
        .route_layer(middleware::from_fn_with_state(
            gate(Role::Admin),
            auth_middleware,
        ));

    public_routes.merge(user_routes).merge(admin_routes)
}
