use super::traits::{
    FavoriteRepository, IngredientRepository, RecipeRepository, UserRecord, UserRepository,
};
use crate::types::{AppError, FavoriteState, Ingredient, Recipe, ResolvedRecipe, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Transaction, TransactionBehavior, params_from_iter};
use std::collections::HashMap;

/// libsql-backed store implementing every repository trait.
pub struct TursoClient {
    db: Database,
    // In-memory databases are per-connection, so memory mode hands out clones
    // of a single connection.
    shared: Option<Connection>,
}

fn db_error(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

/// Translate an insert failure, turning constraint violations into
/// `DuplicateKey` with a caller-facing message.
fn insert_error(e: libsql::Error, duplicate_message: impl FnOnce() -> String) -> AppError {
    if is_unique_violation(&e) {
        AppError::DuplicateKey(duplicate_message())
    } else {
        AppError::Database(e.to_string())
    }
}

async fn rollback(tx: Transaction) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "transaction rollback failed");
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl TursoClient {
    /// Ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {}", e)))?;
        let shared = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self {
            db,
            shared: Some(shared),
        };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// File-backed SQLite database. Parent directories are created as needed.
    pub async fn new_local(path: &str) -> Result<Self> {
        if path == ":memory:" {
            return Self::new_memory().await;
        }

        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Database(format!("Failed to create database directory: {}", e))
            })?;
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        let client = Self { db, shared: None };
        client.initialize_schema().await?;

        Ok(client)
    }

    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        let client = Self { db, shared: None };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub async fn connection(&self) -> Result<Connection> {
        if let Some(conn) = &self.shared {
            return Ok(conn.clone());
        }

        let conn = self
            .db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .await
            .map_err(|e| AppError::Database(format!("Failed to configure connection: {}", e)))?;

        Ok(conn)
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection().await?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .await
            .map_err(|e| AppError::Database(format!("Failed to enable foreign keys: {}", e)))?;

        // Ingredients table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create ingredients table: {}", e)))?;

        // Recipes table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                making TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create recipes table: {}", e)))?;

        // Recipe/ingredient association table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS recipe_ingredients (
                recipe_id INTEGER NOT NULL,
                ingredient_id INTEGER NOT NULL,
                PRIMARY KEY (recipe_id, ingredient_id),
                FOREIGN KEY (recipe_id) REFERENCES recipes(id),
                FOREIGN KEY (ingredient_id) REFERENCES ingredients(id)
            )",
            (),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to create recipe_ingredients table: {}", e))
        })?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Favorites table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_favorites (
                user_id INTEGER NOT NULL,
                recipe_id INTEGER NOT NULL,
                PRIMARY KEY (user_id, recipe_id),
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (recipe_id) REFERENCES recipes(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user_favorites table: {}", e)))?;

        Ok(())
    }

    /// Insert an ingredient or return the existing one with the same name.
    /// Used by seeding and tests, never on the request path.
    pub async fn get_or_create_ingredient(&self, name: &str) -> Result<Ingredient> {
        match self.create_ingredient(name).await {
            Ok(ingredient) => Ok(ingredient),
            Err(AppError::DuplicateKey(_)) => self
                .find_ingredients_by_names(&[name.to_string()])
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| AppError::NotFound(format!("ingredient '{}'", name))),
            Err(e) => Err(e),
        }
    }

    async fn query_recipes(
        &self,
        conn: &Connection,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<Recipe>> {
        let mut rows = conn
            .query(sql, params_from_iter(params))
            .await
            .map_err(|e| AppError::Database(format!("Failed to query recipes: {}", e)))?;

        let mut recipes = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error)? {
            recipes.push(Recipe {
                id: row.get(0).map_err(db_error)?,
                name: row.get(1).map_err(db_error)?,
                making: row.get(2).map_err(db_error)?,
                ingredients: Vec::new(),
            });
        }
        drop(rows);

        self.attach_ingredients(conn, &mut recipes).await?;

        Ok(recipes)
    }

    /// Load the ingredient lists of `recipes` with one batched query.
    async fn attach_ingredients(&self, conn: &Connection, recipes: &mut [Recipe]) -> Result<()> {
        if recipes.is_empty() {
            return Ok(());
        }

        let sql = format!(
            "SELECT ri.recipe_id, i.id, i.name
             FROM recipe_ingredients ri
             INNER JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id IN ({})
             ORDER BY i.id ASC",
            placeholders(recipes.len())
        );
        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();

        let mut rows = conn
            .query(&sql, params_from_iter(ids))
            .await
            .map_err(|e| AppError::Database(format!("Failed to query recipe ingredients: {}", e)))?;

        let mut by_recipe: HashMap<i64, Vec<Ingredient>> = HashMap::new();
        while let Some(row) = rows.next().await.map_err(db_error)? {
            let recipe_id: i64 = row.get(0).map_err(db_error)?;
            by_recipe.entry(recipe_id).or_default().push(Ingredient {
                id: row.get(1).map_err(db_error)?,
                name: row.get(2).map_err(db_error)?,
            });
        }

        for recipe in recipes.iter_mut() {
            recipe.ingredients = by_recipe.remove(&recipe.id).unwrap_or_default();
        }

        Ok(())
    }

    async fn exists(&self, sql: &str, params: Vec<libsql::Value>) -> Result<bool> {
        let conn = self.connection().await?;
        let mut rows = conn
            .query(sql, params_from_iter(params))
            .await
            .map_err(|e| AppError::Database(format!("Failed to run existence check: {}", e)))?;

        Ok(rows.next().await.map_err(db_error)?.is_some())
    }

    fn user_from_row(row: &libsql::Row) -> Result<UserRecord> {
        Ok(UserRecord {
            id: row.get(0).map_err(db_error)?,
            username: row.get(1).map_err(db_error)?,
            password_hash: row.get(2).map_err(db_error)?,
            is_admin: row.get::<i64>(3).map_err(db_error)? != 0,
            created_at: row.get(4).map_err(db_error)?,
            updated_at: row.get(5).map_err(db_error)?,
        })
    }

    async fn find_user_where(
        &self,
        column: &str,
        value: libsql::Value,
    ) -> Result<Option<UserRecord>> {
        let conn = self.connection().await?;
        let sql = format!(
            "SELECT id, username, password_hash, is_admin, created_at, updated_at
             FROM users WHERE {} = ?",
            column
        );

        let mut rows = conn
            .query(&sql, [value])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows.next().await.map_err(db_error)? {
            Some(row) => Ok(Some(Self::user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl IngredientRepository for TursoClient {
    async fn create_ingredient(&self, name: &str) -> Result<Ingredient> {
        let conn = self.connection().await?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO ingredients (name, created_at) VALUES (?, ?)",
            (name, now),
        )
        .await
        .map_err(|e| {
            insert_error(e, || format!("An ingredient named '{}' already exists.", name))
        })?;

        Ok(Ingredient {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn find_all_ingredients(&self) -> Result<Vec<Ingredient>> {
        let conn = self.connection().await?;

        let mut rows = conn
            .query("SELECT id, name FROM ingredients ORDER BY id ASC", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query ingredients: {}", e)))?;

        let mut ingredients = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error)? {
            ingredients.push(Ingredient {
                id: row.get(0).map_err(db_error)?,
                name: row.get(1).map_err(db_error)?,
            });
        }

        Ok(ingredients)
    }

    async fn ingredient_exists_by_name(&self, name: &str) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM ingredients WHERE name = ? LIMIT 1",
            vec![name.into()],
        )
        .await
    }

    async fn find_ingredients_by_names(&self, names: &[String]) -> Result<Vec<Ingredient>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.connection().await?;
        let sql = format!(
            "SELECT id, name FROM ingredients WHERE name IN ({}) ORDER BY id ASC",
            placeholders(names.len())
        );

        let mut rows = conn
            .query(&sql, params_from_iter(names.iter().cloned()))
            .await
            .map_err(|e| AppError::Database(format!("Failed to query ingredients: {}", e)))?;

        let mut ingredients = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error)? {
            ingredients.push(Ingredient {
                id: row.get(0).map_err(db_error)?,
                name: row.get(1).map_err(db_error)?,
            });
        }

        Ok(ingredients)
    }
}

#[async_trait]
impl RecipeRepository for TursoClient {
    async fn create_recipe(&self, recipe: &ResolvedRecipe) -> Result<Recipe> {
        let conn = self.connection().await?;
        let now = Utc::now().timestamp();

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let inserted: Result<i64> = async {
            tx.execute(
                "INSERT INTO recipes (name, making, created_at) VALUES (?, ?, ?)",
                (recipe.name.as_str(), recipe.making.as_str(), now),
            )
            .await
            .map_err(|e| {
                insert_error(e, || format!("A recipe named '{}' already exists.", recipe.name))
            })?;
            let recipe_id = tx.last_insert_rowid();

            for ingredient in &recipe.ingredients {
                tx.execute(
                    "INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?, ?)",
                    (recipe_id, ingredient.id),
                )
                .await
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to link ingredient {}: {}",
                        ingredient.name, e
                    ))
                })?;
            }

            Ok::<_, AppError>(recipe_id)
        }
        .await;

        let recipe_id = match inserted {
            Ok(id) => id,
            Err(e) => {
                rollback(tx).await;
                return Err(e);
            }
        };

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit recipe: {}", e)))?;

        let mut ingredients = recipe.ingredients.clone();
        ingredients.sort_by_key(|i| i.id);

        Ok(Recipe {
            id: recipe_id,
            name: recipe.name.clone(),
            making: recipe.making.clone(),
            ingredients,
        })
    }

    async fn recipe_exists_by_name(&self, name: &str) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM recipes WHERE name = ? LIMIT 1",
            vec![name.into()],
        )
        .await
    }

    async fn find_all_recipes(&self) -> Result<Vec<Recipe>> {
        let conn = self.connection().await?;
        self.query_recipes(
            &conn,
            "SELECT id, name, making FROM recipes ORDER BY id ASC",
            Vec::new(),
        )
        .await
    }

    async fn find_recipes_by_any_ingredient(&self, names: &[String]) -> Result<Vec<Recipe>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.connection().await?;
        let sql = format!(
            "SELECT r.id, r.name, r.making FROM recipes r
             WHERE r.id IN (
                 SELECT ri.recipe_id FROM recipe_ingredients ri
                 INNER JOIN ingredients i ON i.id = ri.ingredient_id
                 WHERE i.name IN ({})
             )
             ORDER BY r.id ASC",
            placeholders(names.len())
        );

        self.query_recipes(&conn, &sql, names.iter().map(|n| n.clone().into()).collect())
            .await
    }

    async fn find_recipe_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        let conn = self.connection().await?;

        let mut rows = conn
            .query("SELECT id, name, making FROM recipes WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query recipe: {}", e)))?;

        match rows.next().await.map_err(db_error)? {
            Some(row) => Ok(Some(Recipe {
                id: row.get(0).map_err(db_error)?,
                name: row.get(1).map_err(db_error)?,
                making: row.get(2).map_err(db_error)?,
                ingredients: Vec::new(),
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FavoriteRepository for TursoClient {
    async fn favorite_exists(&self, user_id: i64, recipe_id: i64) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM user_favorites WHERE user_id = ? AND recipe_id = ? LIMIT 1",
            vec![user_id.into(), recipe_id.into()],
        )
        .await
    }

    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        let conn = self.connection().await?;

        conn.execute(
            "INSERT OR IGNORE INTO user_favorites (user_id, recipe_id) VALUES (?, ?)",
            (user_id, recipe_id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to add favorite: {}", e)))?;

        Ok(())
    }

    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        let conn = self.connection().await?;

        conn.execute(
            "DELETE FROM user_favorites WHERE user_id = ? AND recipe_id = ?",
            (user_id, recipe_id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to remove favorite: {}", e)))?;

        Ok(())
    }

    async fn toggle_favorite(&self, user_id: i64, recipe_id: i64) -> Result<FavoriteState> {
        let conn = self.connection().await?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let toggled: Result<FavoriteState> = async {
            let removed = tx
                .execute(
                    "DELETE FROM user_favorites WHERE user_id = ? AND recipe_id = ?",
                    (user_id, recipe_id),
                )
                .await
                .map_err(|e| AppError::Database(format!("Failed to remove favorite: {}", e)))?;

            if removed > 0 {
                return Ok(FavoriteState::Absent);
            }

            tx.execute(
                "INSERT INTO user_favorites (user_id, recipe_id) VALUES (?, ?)",
                (user_id, recipe_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to add favorite: {}", e)))?;

            Ok::<_, AppError>(FavoriteState::Present)
        }
        .await;

        let state = match toggled {
            Ok(state) => state,
            Err(e) => {
                rollback(tx).await;
                return Err(e);
            }
        };

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit favorite toggle: {}", e)))?;

        Ok(state)
    }

    async fn find_favorites_by_user(&self, user_id: i64) -> Result<Vec<Recipe>> {
        let conn = self.connection().await?;
        self.query_recipes(
            &conn,
            "SELECT r.id, r.name, r.making FROM recipes r
             INNER JOIN user_favorites f ON f.recipe_id = r.id
             WHERE f.user_id = ?
             ORDER BY r.id ASC",
            vec![user_id.into()],
        )
        .await
    }
}

#[async_trait]
impl UserRepository for TursoClient {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<UserRecord> {
        let conn = self.connection().await?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (username, password_hash, is_admin, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (username, password_hash, i64::from(is_admin), now, now),
        )
        .await
        .map_err(|e| insert_error(e, || format!("username '{}' already exists.", username)))?;

        Ok(UserRecord {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
            created_at: now,
            updated_at: now,
        })
    }

    async fn user_exists_by_username(&self, username: &str) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM users WHERE username = ? LIMIT 1",
            vec![username.into()],
        )
        .await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        self.find_user_where("username", username.into()).await
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        self.find_user_where("id", id.into()).await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let conn = self.connection().await?;
        let now = Utc::now().timestamp();

        let updated = conn
            .execute(
                "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?",
                (password_hash, now, id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update password: {}", e)))?;

        if updated == 0 {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        Ok(())
    }
}
