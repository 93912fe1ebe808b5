//! TOML-based configuration for the cookbook server
//!
//! Infrastructure settings live in `cookbook.toml`. Secrets never appear in
//! the file: it names the environment variables that hold them, and `.env`
//! is loaded with `dotenvy` before those are resolved.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [auth]
//! jwt_secret_env = "JWT_SECRET"
//!
//! [database]
//! url = "./data/cookbook.db"
//! ```

use crate::services::user::MIN_PASSWORD_CHARS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from cookbook.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookbookConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `fmt` for human-readable lines, `json` for structured output
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "fmt".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,

    /// Cookie consulted when no `Authorization` header is present
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_EXPIRY_HOURS: i64 = 24 * 365;

fn default_token_expiry_hours() -> i64 {
    24
}

fn default_cookie_name() -> String {
    "jwt".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_expiry_hours: default_token_expiry_hours(),
            cookie_name: default_cookie_name(),
        }
    }
}

impl AuthConfig {
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_hours.saturating_mul(60 * 60)
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/cookbook.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Bootstrap Account =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Environment variable holding the seed password
    #[serde(default = "default_admin_password_env")]
    pub password_env: String,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password_env() -> String {
    "ADMIN_PASSWORD".to_string()
}

/// Seed password used when `admin.password_env` is unset or unusable.
pub const FALLBACK_ADMIN_PASSWORD: &str = "admin";

/// Outcome of resolving the bootstrap account's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedPassword {
    Configured(String),
    /// Variable unset or empty.
    Unset,
    /// Variable set, but shorter than the login minimum; an account seeded
    /// with it could never log in.
    TooShort,
}

impl SeedPassword {
    /// The password to seed with: the configured one, else the fallback.
    pub fn into_password(self) -> String {
        match self {
            SeedPassword::Configured(password) => password,
            SeedPassword::Unset | SeedPassword::TooShort => FALLBACK_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password_env: default_admin_password_env(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl CookbookConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: CookbookConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate values and the availability of referenced env vars.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if !matches!(self.server.log_format.as_str(), "fmt" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "server.log_format must be 'fmt' or 'json', got '{}'",
                self.server.log_format
            )));
        }

        if !(1..=MAX_TOKEN_EXPIRY_HOURS).contains(&self.auth.token_expiry_hours) {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_expiry_hours must be between 1 and {}, got {}",
                MAX_TOKEN_EXPIRY_HOURS, self.auth.token_expiry_hours
            )));
        }

        if self.auth.cookie_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.cookie_name must not be empty".to_string(),
            ));
        }

        if self.admin.username.chars().count() < 3 {
            return Err(ConfigError::ValidationError(
                "admin.username must be at least 3 characters long".to_string(),
            ));
        }

        if self.jwt_secret()?.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} must not be empty",
                self.auth.jwt_secret_env
            )));
        }

        if let Some(ref env) = self.database.turso_url_env {
            self.validate_env_var(env)?;
        }
        if let Some(ref env) = self.database.turso_token_env {
            self.validate_env_var(env)?;
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// Seed password for the bootstrap account, read from its env var.
    pub fn admin_password(&self) -> SeedPassword {
        match self.resolve_env(&self.admin.password_env) {
            None => SeedPassword::Unset,
            Some(password) if password.is_empty() => SeedPassword::Unset,
            Some(password) if password.chars().count() < MIN_PASSWORD_CHARS => {
                SeedPassword::TooShort
            }
            Some(password) => SeedPassword::Configured(password),
        }
    }

    /// Remote database credentials, when both env var names are configured
    /// and set.
    pub fn turso_credentials(&self) -> Option<(String, String)> {
        let url = self.resolve_env(self.database.turso_url_env.as_deref()?)?;
        let token = self.resolve_env(self.database.turso_token_env.as_deref()?)?;
        Some((url, token))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: CookbookConfig = toml::from_str("").expect("empty config should parse");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.log_format, "fmt");

        assert_eq!(config.auth.jwt_secret_env, "JWT_SECRET");
        assert_eq!(config.auth.token_expiry_hours, 24);
        assert_eq!(config.auth.token_expiry_secs(), 86_400);
        assert_eq!(config.auth.cookie_name, "jwt");

        assert_eq!(config.database.url, "./data/cookbook.db");
        assert!(config.database.turso_url_env.is_none());

        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.admin.password_env, "ADMIN_PASSWORD");
    }

    #[test]
    fn test_parse_config() {
        let content = r#"
[server]
host = "0.0.0.0"
port = 8080
log_format = "json"

[auth]
jwt_secret_env = "COOKBOOK_TEST_PARSE_SECRET"
token_expiry_hours = 2
cookie_name = "session"

[database]
url = ":memory:"
"#;

        let config: CookbookConfig = toml::from_str(content).expect("Failed to parse config");

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.server.log_format, "json");
        assert_eq!(config.auth.token_expiry_secs(), 7200);

        let mut huge = config.clone();
        huge.auth.token_expiry_hours = i64::MAX;
        assert_eq!(huge.auth.token_expiry_secs(), i64::MAX);
        assert_eq!(config.auth.cookie_name, "session");
        assert_eq!(config.database.url, ":memory:");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("COOKBOOK_TEST_VALIDATE_SECRET", "test-secret");
        }

        let mut config = CookbookConfig::default();
        config.auth.jwt_secret_env = "COOKBOOK_TEST_VALIDATE_SECRET".to_string();
        assert!(config.validate().is_ok());

        let mut bad_port = config.clone();
        bad_port.server.port = 0;
        assert!(matches!(bad_port.validate(), Err(ConfigError::ValidationError(_))));

        let mut bad_expiry = config.clone();
        bad_expiry.auth.token_expiry_hours = 0;
        assert!(matches!(bad_expiry.validate(), Err(ConfigError::ValidationError(_))));

        let mut max_expiry = config.clone();
        max_expiry.auth.token_expiry_hours = MAX_TOKEN_EXPIRY_HOURS;
        assert!(max_expiry.validate().is_ok());

        for hours in [MAX_TOKEN_EXPIRY_HOURS + 1, 10_000_000_000_000, i64::MAX] {
            let mut long_expiry = config.clone();
            long_expiry.auth.token_expiry_hours = hours;
            assert!(matches!(long_expiry.validate(), Err(ConfigError::ValidationError(_))));
        }

        let mut bad_format = config.clone();
        bad_format.server.log_format = "xml".to_string();
        assert!(matches!(bad_format.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_secret_env_var() {
        let mut config = CookbookConfig::default();
        config.auth.jwt_secret_env = "COOKBOOK_TEST_SECRET_NEVER_SET".to_string();

        match config.validate() {
            Err(ConfigError::MissingEnvVar(name)) => {
                assert_eq!(name, "COOKBOOK_TEST_SECRET_NEVER_SET")
            }
            other => panic!("expected MissingEnvVar, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = CookbookConfig::load("/nonexistent/cookbook.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cookbook.toml");
        fs::write(&path, "[server\nport = ").expect("write");

        assert!(matches!(
            CookbookConfig::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_admin_password_unset() {
        let mut config = CookbookConfig::default();
        config.admin.password_env = "COOKBOOK_TEST_ADMIN_PASSWORD_NEVER_SET".to_string();
        assert_eq!(config.admin_password(), SeedPassword::Unset);
        assert_eq!(config.admin_password().into_password(), FALLBACK_ADMIN_PASSWORD);
    }

    #[test]
    fn test_admin_password_shorter_than_login_minimum() {
        // SAFETY: the variable names are unique to this test
        unsafe {
            std::env::set_var("COOKBOOK_TEST_ADMIN_PASSWORD_SHORT", "abc");
            std::env::set_var("COOKBOOK_TEST_ADMIN_PASSWORD_OK", "abcd");
        }

        let mut config = CookbookConfig::default();
        config.admin.password_env = "COOKBOOK_TEST_ADMIN_PASSWORD_SHORT".to_string();
        assert_eq!(config.admin_password(), SeedPassword::TooShort);
        assert_eq!(config.admin_password().into_password(), FALLBACK_ADMIN_PASSWORD);

        config.admin.password_env = "COOKBOOK_TEST_ADMIN_PASSWORD_OK".to_string();
        assert_eq!(
            config.admin_password(),
            SeedPassword::Configured("abcd".to_string())
        );
    }
}
