use crate::auth::jwt::AuthService;
use crate::types::{AppError, AuthError, Role};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Per-route-group gate configuration: which role is required and where to
/// look for the token.
#[derive(Clone)]
pub struct AuthGate {
    auth_service: Arc<AuthService>,
    required: Role,
    cookie_name: Arc<str>,
}

impl AuthGate {
    pub fn new(auth_service: Arc<AuthService>, required: Role, cookie_name: &str) -> Self {
        Self {
            auth_service,
            required,
            cookie_name: Arc::from(cookie_name),
        }
    }
}

/// Authenticated caller, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers(), &gate.cookie_name);

    let user_id = gate
        .auth_service
        .authorize(token.as_deref(), gate.required)?;

    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}

/// Token from `Authorization: Bearer ...`, falling back to the named cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::Unauthorized(AuthError::MissingToken))
    }
}
