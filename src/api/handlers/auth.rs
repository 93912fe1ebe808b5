use crate::{
    AppState,
    types::{LoginRequest, LoginResponse, MessageResponse, Result},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};

fn session_cookie(name: &str, value: &str, max_age: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name, value, max_age
    )
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; the token is also set as a cookie", body = LoginResponse),
        (status = 400, description = "Unreadable body"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(credentials) = payload?;
    let issued = state.users.login(&credentials).await?;

    let cookie = session_cookie(
        &state.config.auth.cookie_name,
        &issued.token,
        issued.expires_in,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "login successful".to_string(),
            access_token: issued.token,
            expires_in: issued.expires_in,
        }),
    ))
}

/// Expire the token cookie
#[utoipa::path(
    get,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = session_cookie(&state.config.auth.cookie_name, "", 0);

    (
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("logout successful")),
    )
}
