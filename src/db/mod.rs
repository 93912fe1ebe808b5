//! Relational storage.
//!
//! - [`traits`]: the repository interfaces the domain services depend on
//! - [`turso`]: the libsql implementation (in-memory, local SQLite file, or
//!   remote Turso behind the `turso` feature)
//!
//! Uniqueness of ingredient names, recipe names, usernames and favorite pairs
//! is enforced by table constraints; constraint violations come back from the
//! adapter as `AppError::DuplicateKey`.

pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{
    DatabaseProvider, FavoriteRepository, IngredientRepository, RecipeRepository, UserRecord,
    UserRepository,
};
pub use turso::TursoClient;
