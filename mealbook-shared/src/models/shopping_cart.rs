/// Shopping cart model and the export gateway query
///
/// Each user owns at most one cart (`author_id` is unique); recipes are
/// attached through `shopping_cart_recipes`, whose insertion order defines
/// the iteration order of the shopping-list export.
///
/// # Gateway
///
/// [`ShoppingCart::ingredient_usage_for_user`] resolves "current user's
/// shopping cart" to the flattened ingredient usage rows the aggregator
/// consumes. It is a single point-in-time snapshot query; no rows are
/// locked, and cart changes racing an export land in the next snapshot.
/// A user with no cart row, or a cart with no entries, yields an empty
/// row set rather than a lookup failure — the export renders the
/// placeholder document in that case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::shopping::aggregate::IngredientUsage;

/// A user's shopping cart
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShoppingCart {
    /// Unique cart ID
    pub id: Uuid,

    /// Owning user (unique: at most one cart per user)
    pub author_id: Uuid,

    /// When the cart was created
    pub created_at: DateTime<Utc>,
}

impl ShoppingCart {
    /// Finds a user's cart
    pub async fn find_by_author(
        pool: &PgPool,
        author_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let cart = sqlx::query_as::<_, ShoppingCart>(
            "SELECT id, author_id, created_at FROM shopping_carts WHERE author_id = $1",
        )
        .bind(author_id)
        .fetch_optional(pool)
        .await?;

        Ok(cart)
    }

    /// Gets the user's cart, creating it on first use
    pub async fn get_or_create(pool: &PgPool, author_id: Uuid) -> Result<Self, sqlx::Error> {
        let cart = sqlx::query_as::<_, ShoppingCart>(
            r#"
            INSERT INTO shopping_carts (author_id)
            VALUES ($1)
            ON CONFLICT (author_id) DO UPDATE SET author_id = EXCLUDED.author_id
            RETURNING id, author_id, created_at
            "#,
        )
        .bind(author_id)
        .fetch_one(pool)
        .await?;

        Ok(cart)
    }

    /// Adds a recipe to the cart
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is already in the cart (unique
    /// constraint violation).
    pub async fn add_recipe(
        pool: &PgPool,
        cart_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO shopping_cart_recipes (shopping_cart_id, recipe_id) VALUES ($1, $2)",
        )
        .bind(cart_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Removes a recipe from the cart
    ///
    /// Returns true if a row was deleted, false if the recipe wasn't in
    /// the cart.
    pub async fn remove_recipe(
        pool: &PgPool,
        cart_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM shopping_cart_recipes WHERE shopping_cart_id = $1 AND recipe_id = $2",
        )
        .bind(cart_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a recipe is in the user's cart
    pub async fn contains(
        pool: &PgPool,
        author_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM shopping_cart_recipes scr
                JOIN shopping_carts sc ON sc.id = scr.shopping_cart_id
                WHERE sc.author_id = $1 AND scr.recipe_id = $2
            )
            "#,
        )
        .bind(author_id)
        .bind(recipe_id)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Export gateway: flattened ingredient usage of the user's cart
    ///
    /// One row per recipe-ingredient line across all recipes in the cart,
    /// ordered by cart insertion order, then by line insertion order
    /// within each recipe. The aggregator folds these rows into line
    /// items; the order here fixes the first-seen order of the output.
    ///
    /// Returns an empty vec when the user has no cart or an empty cart.
    pub async fn ingredient_usage_for_user(
        pool: &PgPool,
        author_id: Uuid,
    ) -> Result<Vec<IngredientUsage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, IngredientUsage>(
            r#"
            SELECT i.name, i.measurement_unit, ri.amount
            FROM shopping_carts sc
            JOIN shopping_cart_recipes scr ON scr.shopping_cart_id = sc.id
            JOIN recipe_ingredients ri ON ri.recipe_id = scr.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.author_id = $1
            ORDER BY scr.created_at, scr.id, ri.created_at, ri.id
            "#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
