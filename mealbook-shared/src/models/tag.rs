/// Tag model (read-only reference data)

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A recipe tag with a display color and URL slug
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID
    pub id: Uuid,

    /// Tag name, unique
    pub name: String,

    /// Hex display color, e.g. `#FF0000`
    pub color: String,

    /// URL slug, unique
    pub slug: String,
}

impl Tag {
    /// Lists all tags ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tags =
            sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags ORDER BY name")
                .fetch_all(pool)
                .await?;

        Ok(tags)
    }

    /// Finds a tag by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tag)
    }

    /// Loads the tags attached to a recipe, ordered by name
    pub async fn list_for_recipe(pool: &PgPool, recipe_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.color, t.slug
            FROM tags t
            JOIN recipe_tags rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
