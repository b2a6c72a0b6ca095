/// Database models for Mealbook
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `subscription`: Follower relationships between users
/// - `tag`: Recipe tags (reference data)
/// - `ingredient`: Ingredients with measurement units (reference data)
/// - `recipe`: Recipes and their ingredient/tag association rows
/// - `favourite`: Per-user favorite recipes
/// - `shopping_cart`: Per-user shopping cart and the export snapshot query

pub mod favourite;
pub mod ingredient;
pub mod recipe;
pub mod shopping_cart;
pub mod subscription;
pub mod tag;
pub mod user;
