use crate::db::IngredientRepository;
use crate::types::{AppError, FieldError, Ingredient, NewIngredient, Result};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait IngredientService: Send + Sync {
    /// First violation only. Recipe and user validation report every
    /// violation; ingredient validation does not.
    fn validate(&self, candidate: &NewIngredient) -> Option<FieldError>;

    /// Persist a new ingredient. `DuplicateKey` when the name is taken.
    async fn create(&self, candidate: NewIngredient) -> Result<Ingredient>;

    async fn list_all(&self) -> Result<Vec<Ingredient>>;

    /// Stored ingredients whose name is in `names`. Callers detect unknown
    /// names by comparing against the request.
    async fn resolve_by_names(&self, names: &[String]) -> Result<Vec<Ingredient>>;
}

pub struct IngredientManager {
    repo: Arc<dyn IngredientRepository>,
}

impl IngredientManager {
    pub fn new(repo: Arc<dyn IngredientRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl IngredientService for IngredientManager {
    fn validate(&self, candidate: &NewIngredient) -> Option<FieldError> {
        if candidate.name.is_empty() {
            return Some(FieldError::new("name", "the name is required"));
        }
        None
    }

    async fn create(&self, candidate: NewIngredient) -> Result<Ingredient> {
        if self.repo.ingredient_exists_by_name(&candidate.name).await? {
            return Err(AppError::DuplicateKey(format!(
                "An ingredient named '{}' already exists.",
                candidate.name
            )));
        }

        // The unique index still rejects a concurrent insert of the same name.
        let ingredient = self.repo.create_ingredient(&candidate.name).await?;
        tracing::info!(id = ingredient.id, name = %ingredient.name, "ingredient created");

        Ok(ingredient)
    }

    async fn list_all(&self) -> Result<Vec<Ingredient>> {
        self.repo.find_all_ingredients().await
    }

    async fn resolve_by_names(&self, names: &[String]) -> Result<Vec<Ingredient>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.find_ingredients_by_names(names).await
    }
}
