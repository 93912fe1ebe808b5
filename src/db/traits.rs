//! Repository traits
//!
//! The domain services reach the relational store only through the traits in
//! this module. [`TursoClient`](super::turso::TursoClient) implements all of
//! them; service unit tests substitute `mockall` mocks.
//!
//! # Example
//!
//! ```rust,ignore
//! use cookbook::db::DatabaseProvider;
//!
//! // In-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // File-based SQLite
//! let db = DatabaseProvider::Local { path: "data/cookbook.db".into() }.create_client().await?;
//! ```

use crate::types::{FavoriteState, Ingredient, Recipe, ResolvedRecipe, Result};
use async_trait::async_trait;

/// Database provider configuration
#[derive(Debug, Clone, Default)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    Local {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Open a client for this provider and create the schema.
    pub async fn create_client(&self) -> Result<super::turso::TursoClient> {
        match self {
            DatabaseProvider::Memory => super::turso::TursoClient::new_memory().await,
            DatabaseProvider::Local { path } => super::turso::TursoClient::new_local(path).await,
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await
            }
        }
    }

    /// Provider for a `database.url` config value. `:memory:` selects the
    /// ephemeral store.
    pub fn from_url(url: &str) -> Self {
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::Local {
                path: url.to_string(),
            }
        }
    }
}

/// User row as stored, including the password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<UserRecord> for crate::types::User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            is_admin: record.is_admin,
        }
    }
}

// ============== Ingredient Operations ==============

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Insert an ingredient. A name collision surfaces as `DuplicateKey`.
    async fn create_ingredient(&self, name: &str) -> Result<Ingredient>;

    /// All ingredients in id order.
    async fn find_all_ingredients(&self) -> Result<Vec<Ingredient>>;

    async fn ingredient_exists_by_name(&self, name: &str) -> Result<bool>;

    /// Ingredients whose name is in `names`. Unknown names are skipped.
    async fn find_ingredients_by_names(&self, names: &[String]) -> Result<Vec<Ingredient>>;
}

// ============== Recipe Operations ==============

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert the recipe and its ingredient associations as one unit.
    async fn create_recipe(&self, recipe: &ResolvedRecipe) -> Result<Recipe>;

    async fn recipe_exists_by_name(&self, name: &str) -> Result<bool>;

    /// Every recipe with its ingredients attached.
    async fn find_all_recipes(&self) -> Result<Vec<Recipe>>;

    /// Recipes containing at least one of `names`, each with its full
    /// ingredient list attached.
    async fn find_recipes_by_any_ingredient(&self, names: &[String]) -> Result<Vec<Recipe>>;

    /// Recipe by id, without ingredients.
    async fn find_recipe_by_id(&self, id: i64) -> Result<Option<Recipe>>;
}

// ============== Favorite Operations ==============

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn favorite_exists(&self, user_id: i64, recipe_id: i64) -> Result<bool>;

    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()>;

    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()>;

    /// Flip the pair's membership inside one storage transaction and return
    /// the state it ended in.
    async fn toggle_favorite(&self, user_id: i64, recipe_id: i64) -> Result<FavoriteState>;

    async fn find_favorites_by_user(&self, user_id: i64) -> Result<Vec<Recipe>>;
}

// ============== User Operations ==============

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. A username collision surfaces as `DuplicateKey`.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<UserRecord>;

    async fn user_exists_by_username(&self, username: &str) -> Result<bool>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Replace the stored hash. Returns `NotFound` when no row was updated.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()>;
}
