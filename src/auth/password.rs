use crate::types::{AppError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hashes and checks passwords. The domain layer treats hashes as opaque
/// strings and only ever compares through [`CredentialVerifier::verify`].
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;

    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool>;
}

/// Argon2id with a random per-password salt, PHC-formatted output.
#[derive(Debug, Default, Clone)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
