use crate::db::{FavoriteRepository, RecipeRepository};
use crate::services::ingredient::IngredientService;
use crate::types::{
    AppError, FavoriteState, FieldError, NewRecipe, Recipe, ResolvedRecipe, Result,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Structural checks, then ingredient resolution.
    ///
    /// Structural violations (name, making, empty or duplicated ingredient
    /// list) are all reported together and stop before any store lookup.
    /// Otherwise every submitted name is resolved; each unknown name yields
    /// its own field error. Failures come back as `AppError::Validation`.
    async fn validate(&self, candidate: NewRecipe) -> Result<ResolvedRecipe>;

    /// Persist a validated recipe with its ingredient associations.
    /// `DuplicateKey` when the name is taken.
    async fn create(&self, recipe: ResolvedRecipe) -> Result<Recipe>;

    /// All recipes when `ingredient_names` is empty, otherwise every recipe
    /// containing at least one of them.
    async fn list_all_possible(&self, ingredient_names: &[String]) -> Result<Vec<Recipe>>;

    /// Flip the favorite membership of `recipe_id` for `user_id` and return
    /// the state it ended in. `NotFound` when the recipe does not exist.
    async fn toggle_favorite(&self, user_id: i64, recipe_id: i64) -> Result<FavoriteState>;

    async fn list_favorites(&self, user_id: i64) -> Result<Vec<Recipe>>;
}

pub struct RecipeManager {
    recipes: Arc<dyn RecipeRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    ingredients: Arc<dyn IngredientService>,
}

impl RecipeManager {
    pub fn new(
        recipes: Arc<dyn RecipeRepository>,
        favorites: Arc<dyn FavoriteRepository>,
        ingredients: Arc<dyn IngredientService>,
    ) -> Self {
        Self {
            recipes,
            favorites,
            ingredients,
        }
    }
}

fn structural_errors(candidate: &NewRecipe) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if candidate.name.is_empty() {
        errors.push(FieldError::new("name", "the name is required"));
    }

    if candidate.making.is_empty() {
        errors.push(FieldError::new("making", "the making is required"));
    }

    if candidate.ingredients.is_empty() {
        errors.push(FieldError::new(
            "ingredients",
            "recipe must contain at least one ingredient",
        ));
    }

    let mut seen = HashSet::new();
    if !candidate.ingredients.iter().all(|i| seen.insert(i.name.as_str())) {
        errors.push(FieldError::new(
            "ingredients",
            "recipe ingredients contain duplicates",
        ));
    }

    errors
}

#[async_trait]
impl RecipeService for RecipeManager {
    async fn validate(&self, candidate: NewRecipe) -> Result<ResolvedRecipe> {
        let errors = structural_errors(&candidate);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let names = candidate.ingredient_names();
        let resolved = self.ingredients.resolve_by_names(&names).await?;

        if resolved.len() == names.len() {
            return Ok(ResolvedRecipe {
                name: candidate.name,
                making: candidate.making,
                ingredients: resolved,
            });
        }

        let known: HashSet<&str> = resolved.iter().map(|i| i.name.as_str()).collect();
        let errors: Vec<FieldError> = names
            .iter()
            .filter(|name| !known.contains(name.as_str()))
            .map(|name| {
                FieldError::new("ingredients", format!("'{}' is not a valid ingredient", name))
            })
            .collect();

        Err(AppError::Validation(errors))
    }

    async fn create(&self, recipe: ResolvedRecipe) -> Result<Recipe> {
        if self.recipes.recipe_exists_by_name(&recipe.name).await? {
            return Err(AppError::DuplicateKey(format!(
                "A recipe named '{}' already exists.",
                recipe.name
            )));
        }

        let created = self.recipes.create_recipe(&recipe).await?;
        tracing::info!(
            id = created.id,
            name = %created.name,
            ingredients = created.ingredients.len(),
            "recipe created"
        );

        Ok(created)
    }

    async fn list_all_possible(&self, ingredient_names: &[String]) -> Result<Vec<Recipe>> {
        if ingredient_names.is_empty() {
            return self.recipes.find_all_recipes().await;
        }
        self.recipes
            .find_recipes_by_any_ingredient(ingredient_names)
            .await
    }

    async fn toggle_favorite(&self, user_id: i64, recipe_id: i64) -> Result<FavoriteState> {
        if self.recipes.find_recipe_by_id(recipe_id).await?.is_none() {
            return Err(AppError::NotFound("recipe not found".to_string()));
        }

        let state = self.favorites.toggle_favorite(user_id, recipe_id).await?;
        tracing::debug!(user_id, recipe_id, ?state, "favorite toggled");

        Ok(state)
    }

    async fn list_favorites(&self, user_id: i64) -> Result<Vec<Recipe>> {
        self.favorites.find_favorites_by_user(user_id).await
    }
}
