use crate::{
    AppState,
    auth::AuthUser,
    types::{AppError, MessageResponse, NewUser, PasswordChangeRequest, Result, User},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

/// Create a user account (admin)
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing, invalid or non-admin token"),
        (status = 409, description = "Username already taken")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let Json(candidate) = payload?;

    let errors = state.users.validate_creation(&candidate);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = state.users.create(candidate).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// The caller's own account
#[utoipa::path(
    get,
    path = "/api/v1/users/my-infos",
    responses(
        (status = 200, description = "Account details", body = User),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn my_infos(State(state): State<AppState>, user: AuthUser) -> Result<Json<User>> {
    let user = state.users.get_infos(user.user_id).await?;
    Ok(Json(user))
}

/// Change the caller's password
#[utoipa::path(
    patch,
    path = "/api/v1/users/password-change",
    request_body = PasswordChangeRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Password too short or unchanged"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<PasswordChangeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(request) = payload?;

    state
        .users
        .update_password(user.user_id, &request.password)
        .await?;

    Ok(Json(MessageResponse::new("password update successful")))
}
