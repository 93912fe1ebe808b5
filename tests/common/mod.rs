//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use cookbook::{
    AppState, CookbookConfig,
    auth::{AuthService, CredentialVerifier},
    db::TursoClient,
    types::Result,
};
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Reversible stand-in for argon2; keeps debug-build tests fast.
pub struct PlainVerifier;

impl CredentialVerifier for PlainVerifier {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(format!("plain${}", plaintext))
    }

    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool> {
        Ok(hash.strip_prefix("plain$") == Some(plaintext))
    }
}

pub async fn memory_db() -> Arc<TursoClient> {
    Arc::new(
        TursoClient::new_memory()
            .await
            .expect("Failed to create in-memory database"),
    )
}

pub fn auth_service() -> Arc<AuthService> {
    Arc::new(AuthService::new(
        TEST_SECRET.to_string(),
        AuthService::DEFAULT_EXPIRY_SECS,
    ))
}

pub fn test_config() -> CookbookConfig {
    let mut config = CookbookConfig::default();
    config.database.url = ":memory:".to_string();
    config
}

/// Application state over a fresh in-memory store.
pub async fn test_state() -> (AppState, Arc<TursoClient>) {
    let db = memory_db().await;
    let state = AppState::new(
        test_config(),
        db.clone(),
        auth_service(),
        Arc::new(PlainVerifier),
    );
    (state, db)
}
