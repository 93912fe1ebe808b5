//! Authentication and authorization
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing behind [`CredentialVerifier`]
//! - [`auth::jwt`](crate::auth::jwt) - access token issuing, validation and the role check
//! - [`auth::middleware`](crate::auth::middleware) - axum gate layer and the [`AuthUser`] extractor
//!
//! # Roles
//!
//! Tokens carry either `user` or `admin`. Listing ingredients and recipes,
//! toggling favorites and managing one's own account need at least `user`;
//! creating ingredients, recipes and users needs `admin`. Login, logout and
//! the health check are open.
//!
//! Every gate failure (missing token, bad signature, expired token, role too
//! low) produces the same 401 response.
//!
//! # Usage
//!
//! ```ignore
//! use cookbook::auth::middleware::{auth_middleware, AuthGate};
//!
//! let gate = AuthGate::new(auth_service.clone(), Role::Admin, "jwt");
//! let app = Router::new()
//!     .route("/ingredients", post(create_ingredient))
//!     .layer(middleware::from_fn_with_state(gate, auth_middleware));
//! ```
//!
//! # Configuration
//!
//! Configure via `cookbook.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"   # env var holding the signing secret
//! token_expiry_hours = 24         # Token validity duration
//! cookie_name = "jwt"
//! ```

/// Access token issuing and validation.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing.
pub mod password;

pub use jwt::{AuthService, IssuedToken};
pub use middleware::{AuthGate, AuthUser};
pub use password::{Argon2Verifier, CredentialVerifier};
