use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= Domain Types =============

/// A named ingredient. Names are unique and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

/// A recipe with its resolved ingredient list attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub making: String,
    pub ingredients: Vec<Ingredient>,
}

/// A user account as seen outside the storage layer. The password hash
/// never leaves [`crate::db::UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[serde(skip)]
    pub id: i64,
    pub username: String,
    #[serde(rename = "admin")]
    pub is_admin: bool,
}

impl User {
    /// The role embedded in tokens issued for this account.
    pub fn role(&self) -> Role {
        if self.is_admin { Role::Admin } else { Role::User }
    }
}

/// Coarse permission level carried by an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Whether a holder of `self` passes a gate requiring `required`.
    pub fn satisfies(self, required: Role) -> bool {
        match required {
            Role::User => true,
            Role::Admin => self == Role::Admin,
        }
    }
}

/// Favorite membership of a (user, recipe) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    Absent,
    Present,
}

impl FavoriteState {
    /// Confirmation reported to the caller after a toggle landed in `self`.
    pub fn message(self) -> &'static str {
        match self {
            FavoriteState::Present => "recipe added to favorites",
            FavoriteState::Absent => "recipe removed from favorites",
        }
    }
}

// ============= Candidate (input) Types =============

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewIngredient {
    #[serde(default)]
    pub name: String,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ingredient reference inside a recipe submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub struct IngredientRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewRecipe {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub making: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientRef>,
}

impl NewRecipe {
    pub fn new<I, S>(name: impl Into<String>, making: impl Into<String>, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            making: making.into(),
            ingredients: ingredients
                .into_iter()
                .map(|name| IngredientRef { name: name.into() })
                .collect(),
        }
    }

    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients.iter().map(|i| i.name.clone()).collect()
    }
}

/// A recipe candidate whose ingredient references all resolved to stored
/// ingredients. Only produced by [`crate::services::RecipeService::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipe {
    pub name: String,
    pub making: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "admin")]
    pub is_admin: bool,
}

// ============= API Request/Response Types =============

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PasswordChangeRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngredientsResponse {
    pub count: usize,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipesResponse {
    pub count: usize,
    pub recipes: Vec<Recipe>,
}

/// JWT claims: subject user id, role and expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

// ============= Error Types =============

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.description)
    }
}

/// Reasons the authorization gate rejects a request. All of them surface as
/// the same unauthorized response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("insufficient role")]
    InsufficientRole,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("password is required and must be at least 4 characters long")]
    InvalidPassword,

    #[error("password isn't new")]
    PasswordUnchanged,

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, body) = match self {
            AppError::Validation(mut errors) => {
                let body = if errors.len() == 1 {
                    serde_json::json!({ "error": errors.remove(0) })
                } else {
                    serde_json::json!({ "errors": errors })
                };
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::DuplicateKey(msg) => {
                (StatusCode::CONFLICT, serde_json::json!({ "error": msg }))
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "invalid credentials" }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            err @ (AppError::InvalidPassword | AppError::PasswordUnchanged) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": err.to_string() }),
            ),
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            AppError::Unauthorized(reason) => {
                tracing::debug!(%reason, "request rejected by authorization gate");
                (
                    StatusCode::UNAUTHORIZED,
                    serde_json::json!({ "error": "invalid or expired token" }),
                )
            }
            err @ (AppError::Database(_) | AppError::Internal(_)) => {
                tracing::error!(error = %err, "unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "internal server error" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "unreadable request body");
        AppError::InvalidInput("Failed to read request body".to_string())
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_role_satisfies() {
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::User.satisfies(Role::User));
        assert!(!Role::User.satisfies(Role::Admin));
    }

    #[test]
    fn test_favorite_state_messages() {
        assert_eq!(FavoriteState::Present.message(), "recipe added to favorites");
        assert_eq!(FavoriteState::Absent.message(), "recipe removed from favorites");
    }

    #[test]
    fn test_user_role_follows_admin_flag() {
        let mut user = User {
            id: 1,
            username: "alice".to_string(),
            is_admin: false,
        };
        assert_eq!(user.role(), Role::User);
        user.is_admin = true;
        assert_eq!(user.role(), Role::Admin);
    }

    #[test]
    fn test_user_serialization_hides_id() {
        let user = User {
            id: 42,
            username: "bob".to_string(),
            is_admin: true,
        };
        let json = serde_json::to_value(&user).expect("should serialize");
        assert_eq!(json, serde_json::json!({ "username": "bob", "admin": true }));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::Validation(vec![FieldError::new("name", "x")]), StatusCode::BAD_REQUEST),
            (AppError::DuplicateKey("dup".into()), StatusCode::CONFLICT),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::NotFound("recipe not found".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidPassword, StatusCode::BAD_REQUEST),
            (AppError::PasswordUnchanged, StatusCode::BAD_REQUEST),
            (AppError::Unauthorized(AuthError::MissingToken), StatusCode::UNAUTHORIZED),
            (AppError::Unauthorized(AuthError::InsufficientRole), StatusCode::UNAUTHORIZED),
            (AppError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_validation_error_display_lists_every_field() {
        let err = AppError::Validation(vec![
            FieldError::new("name", "the name is required"),
            FieldError::new("making", "the making is required"),
        ]);
        let text = err.to_string();
        assert!(text.contains("name: the name is required"));
        assert!(text.contains("making: the making is required"));
    }
}
