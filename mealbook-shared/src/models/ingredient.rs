/// Ingredient model (immutable reference data)
///
/// Ingredients are seeded into the database and read-only through the API.
/// Each carries a display name and a measurement unit string (`kg`, `ml`,
/// `pcs`, ...) used verbatim on the exported shopping list.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An ingredient with its measurement unit
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    /// Unique ingredient ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Measurement unit string
    pub measurement_unit: String,
}

impl Ingredient {
    /// Lists all ingredients ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(ingredients)
    }

    /// Searches ingredients by name
    ///
    /// Matches names that start with OR contain the query. Prefix matches
    /// are ranked before contains-only matches, alphabetical within each
    /// group.
    pub async fn search_by_name(pool: &PgPool, name: &str) -> Result<Vec<Self>, sqlx::Error> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY
                CASE WHEN name ILIKE $1 || '%' THEN 0 ELSE 1 END,
                name
            "#,
        )
        .bind(name)
        .fetch_all(pool)
        .await?;

        Ok(ingredients)
    }

    /// Finds an ingredient by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(ingredient)
    }
}
