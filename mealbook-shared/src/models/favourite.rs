/// Favourite model: a user's bookmarked recipes
///
/// Unique per (user, recipe); duplicate adds surface as constraint
/// violations and are rejected at the API boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A favorite mark on a recipe
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favourite {
    /// Unique favourite ID
    pub id: Uuid,

    /// The user who favorited
    pub user_id: Uuid,

    /// The favorited recipe
    pub recipe_id: Uuid,

    /// When the favorite was added
    pub created_at: DateTime<Utc>,
}

impl Favourite {
    /// Marks a recipe as favorite
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate favorite (unique constraint).
    pub async fn create(pool: &PgPool, user_id: Uuid, recipe_id: Uuid) -> Result<Self, sqlx::Error> {
        let favourite = sqlx::query_as::<_, Favourite>(
            r#"
            INSERT INTO favourites (user_id, recipe_id)
            VALUES ($1, $2)
            RETURNING id, user_id, recipe_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(pool)
        .await?;

        Ok(favourite)
    }

    /// Checks whether `user_id` has favorited `recipe_id`
    pub async fn exists(pool: &PgPool, user_id: Uuid, recipe_id: Uuid) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM favourites WHERE user_id = $1 AND recipe_id = $2)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Removes a favorite
    ///
    /// Returns true if a row was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, user_id: Uuid, recipe_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favourites WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
