use crate::auth::{AuthService, CredentialVerifier, IssuedToken};
use crate::db::UserRepository;
use crate::types::{AppError, FieldError, LoginRequest, NewUser, Result, User};
use async_trait::async_trait;
use std::sync::Arc;

const MIN_USERNAME_CHARS: usize = 3;
/// Shortest password `authenticate` will accept.
pub const MIN_PASSWORD_CHARS: usize = 4;

#[async_trait]
pub trait UserService: Send + Sync {
    /// Every violation, in check order: username required, username length,
    /// password required, password length. Lengths count characters.
    fn validate_creation(&self, candidate: &NewUser) -> Vec<FieldError>;

    async fn create(&self, candidate: NewUser) -> Result<User>;

    /// Resolve credentials to an account. Unknown usernames and wrong
    /// passwords both yield `InvalidCredentials`.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User>;

    fn issue_token(&self, user: &User) -> Result<IssuedToken>;

    async fn login(&self, credentials: &LoginRequest) -> Result<IssuedToken>;

    async fn update_password(&self, user_id: i64, new_password: &str) -> Result<()>;

    async fn get_infos(&self, user_id: i64) -> Result<User>;

    /// Create the account unless one with `username` already exists.
    /// Returns whether an account was created.
    async fn ensure_seed_account(
        &self,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<bool>;
}

pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    verifier: Arc<dyn CredentialVerifier>,
    auth: Arc<AuthService>,
}

impl UserManager {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        verifier: Arc<dyn CredentialVerifier>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            repo,
            verifier,
            auth,
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[async_trait]
impl UserService for UserManager {
    fn validate_creation(&self, candidate: &NewUser) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if candidate.username.is_empty() {
            errors.push(FieldError::new("username", "username is required"));
        }
        if char_len(&candidate.username) < MIN_USERNAME_CHARS {
            errors.push(FieldError::new(
                "username",
                "username must be at least 3 characters long",
            ));
        }
        if candidate.password.is_empty() {
            errors.push(FieldError::new("password", "password is required"));
        }
        if char_len(&candidate.password) < MIN_PASSWORD_CHARS {
            errors.push(FieldError::new(
                "password",
                "password must be at least 4 characters long",
            ));
        }

        errors
    }

    async fn create(&self, candidate: NewUser) -> Result<User> {
        if self.repo.user_exists_by_username(&candidate.username).await? {
            return Err(AppError::DuplicateKey(format!(
                "username '{}' already exists.",
                candidate.username
            )));
        }

        let password_hash = self.verifier.hash(&candidate.password)?;
        let record = self
            .repo
            .create_user(&candidate.username, &password_hash, candidate.is_admin)
            .await?;
        tracing::info!(id = record.id, username = %record.username, admin = record.is_admin, "user created");

        Ok(record.into())
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        if username.is_empty()
            || password.is_empty()
            || char_len(username) < MIN_USERNAME_CHARS
            || char_len(password) < MIN_PASSWORD_CHARS
        {
            return Err(AppError::InvalidCredentials);
        }

        let Some(record) = self.repo.find_user_by_username(username).await? else {
            tracing::warn!(%username, "login rejected");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verifier.verify(&record.password_hash, password)? {
            tracing::warn!(%username, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        Ok(record.into())
    }

    fn issue_token(&self, user: &User) -> Result<IssuedToken> {
        self.auth.issue_token(user)
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<IssuedToken> {
        let user = self
            .authenticate(&credentials.username, &credentials.password)
            .await?;
        self.issue_token(&user)
    }

    async fn update_password(&self, user_id: i64, new_password: &str) -> Result<()> {
        if new_password.is_empty() || char_len(new_password) < MIN_PASSWORD_CHARS {
            return Err(AppError::InvalidPassword);
        }

        let record = self
            .repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        if self.verifier.verify(&record.password_hash, new_password)? {
            return Err(AppError::PasswordUnchanged);
        }

        let password_hash = self.verifier.hash(new_password)?;
        self.repo.update_password(user_id, &password_hash).await?;
        tracing::info!(user_id, "password updated");

        Ok(())
    }

    async fn get_infos(&self, user_id: i64) -> Result<User> {
        self.repo
            .find_user_by_id(user_id)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    async fn ensure_seed_account(
        &self,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<bool> {
        if self.repo.find_user_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = self.verifier.hash(password)?;
        match self.repo.create_user(username, &password_hash, is_admin).await {
            Ok(record) => {
                tracing::info!(id = record.id, %username, "seed account created");
                Ok(true)
            }
            // Another process seeded it between the lookup and the insert.
            Err(AppError::DuplicateKey(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
