//! Domain services
//!
//! Validation, uniqueness and resolution rules for ingredients, recipes,
//! favorites and user accounts. Each service is a trait with one
//! repository-backed implementation; handlers only see the traits.

pub mod ingredient;
pub mod recipe;
pub mod user;

pub use ingredient::{IngredientManager, IngredientService};
pub use recipe::{RecipeManager, RecipeService};
pub use user::{UserManager, UserService};
