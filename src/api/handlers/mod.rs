//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Login and logout.
pub mod auth;
/// Liveness check.
pub mod health;
/// Ingredient listing and creation.
pub mod ingredients;
/// Recipe listing, creation and favorites.
pub mod recipes;
/// Account creation and self-service.
pub mod users;
