use crate::types::{AppError, AuthError, Claims, Result, Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// A freshly signed access token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Issues and validates HS256 access tokens carrying a user id and a role.
///
/// Tokens are stateless: there is no revocation list, so the expiry window is
/// the only lifecycle control.
pub struct AuthService {
    jwt_secret: String,
    token_expiry: i64,
}

impl AuthService {
    /// Default token lifetime: 24 hours.
    pub const DEFAULT_EXPIRY_SECS: i64 = 24 * 60 * 60;

    /// Creates a new AuthService.
    ///
    /// # Arguments
    /// * `jwt_secret` - Process-wide signing secret
    /// * `token_expiry` - Access token validity in seconds
    pub fn new(jwt_secret: String, token_expiry: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry,
        }
    }

    /// Signs a token for `user`, embedding the role derived from its admin flag.
    pub fn issue_token(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.token_expiry)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Internal(format!("token expiry out of range: {}s", self.token_expiry))
            })?;
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_in: self.token_expiry,
        })
    }

    /// Verifies signature, structure and expiry. Expired and malformed tokens
    /// are indistinguishable to the caller.
    pub fn verify_token(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            AuthError::InvalidToken
        })
    }

    /// The authorization gate: validates `token` and enforces `required`,
    /// returning the subject user id on success.
    pub fn authorize(
        &self,
        token: Option<&str>,
        required: Role,
    ) -> std::result::Result<i64, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.verify_token(token)?;

        // Expiry against the wall clock, strictly.
        if (claims.exp as i64) <= Utc::now().timestamp() {
            return Err(AuthError::InvalidToken);
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken)?;

        if !claims.role.satisfies(required) {
            return Err(AuthError::InsufficientRole);
        }

        Ok(user_id)
    }
}
