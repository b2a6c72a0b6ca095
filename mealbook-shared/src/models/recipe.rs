/// Recipe model and its ingredient/tag association rows
///
/// # Schema
///
/// ```sql
/// CREATE TABLE recipes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(256) NOT NULL UNIQUE,
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     text TEXT NOT NULL,
///     cooking_time_minutes INT NOT NULL CHECK (cooking_time_minutes > 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE recipe_ingredients (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     recipe_id UUID NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
///     ingredient_id UUID NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
///     amount NUMERIC(7, 3) NOT NULL DEFAULT 0 CHECK (amount >= 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Ingredient and tag rows are written in the same transaction as the
/// recipe: a recipe is never visible with half its associations. Deleting
/// a recipe cascades both association tables.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A published recipe
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    /// Unique recipe ID
    pub id: Uuid,

    /// Recipe name, unique
    pub name: String,

    /// Author reference
    pub author_id: Uuid,

    /// Cooking instructions
    pub text: String,

    /// Cooking duration in whole minutes
    pub cooking_time_minutes: i32,

    /// When the recipe was created
    pub created_at: DateTime<Utc>,

    /// When the recipe was last updated
    pub updated_at: DateTime<Utc>,
}

/// One ingredient line of a recipe, joined with its reference data
///
/// `amount` is an exact fixed-point decimal (NUMERIC(7,3)); it is never
/// read into a binary float.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecipeIngredientRow {
    /// Ingredient ID
    pub ingredient_id: Uuid,

    /// Ingredient display name
    pub name: String,

    /// Measurement unit string
    pub measurement_unit: String,

    /// Quantity for this recipe
    pub amount: Decimal,
}

/// One (ingredient, amount) pair of a create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientAmount {
    /// Ingredient ID
    pub ingredient_id: Uuid,

    /// Quantity, validated non-negative with at most 3 fractional digits
    pub amount: Decimal,
}

/// Input for creating a recipe
#[derive(Debug, Clone)]
pub struct CreateRecipe {
    /// Recipe name
    pub name: String,

    /// Author
    pub author_id: Uuid,

    /// Cooking instructions
    pub text: String,

    /// Cooking duration in minutes
    pub cooking_time_minutes: i32,

    /// Ingredient lines
    pub ingredients: Vec<IngredientAmount>,

    /// Attached tag IDs
    pub tag_ids: Vec<Uuid>,
}

/// Input for updating a recipe
///
/// Scalar fields are updated when present; `ingredients` / `tag_ids`
/// replace the full association set when present (matching the original
/// clear-and-recreate semantics).
#[derive(Debug, Clone, Default)]
pub struct UpdateRecipe {
    /// New name
    pub name: Option<String>,

    /// New instructions
    pub text: Option<String>,

    /// New cooking duration in minutes
    pub cooking_time_minutes: Option<i32>,

    /// Replacement ingredient set
    pub ingredients: Option<Vec<IngredientAmount>>,

    /// Replacement tag set
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Caller-relative filters for recipe listings
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Only recipes carrying at least one of these tag slugs
    pub tag_slugs: Option<Vec<String>>,

    /// Only recipes favorited by this user
    pub favorited_by: Option<Uuid>,

    /// Only recipes in this user's shopping cart
    pub in_cart_of: Option<Uuid>,
}

/// Validates a recipe-ingredient quantity at the API boundary
///
/// The column is NUMERIC(7,3): non-negative, at most 3 fractional digits,
/// at most 7 digits total (so < 10000). The aggregator downstream assumes
/// amounts that passed this check.
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount.is_sign_negative() {
        return Err("Amount must not be negative".to_string());
    }

    let normalized = amount.normalize();
    if normalized.scale() > 3 {
        return Err("Amount supports at most 3 decimal places".to_string());
    }
    if normalized >= Decimal::from(10_000) {
        return Err("Amount must be less than 10000".to_string());
    }

    Ok(())
}

const RECIPE_COLUMNS: &str =
    "id, name, author_id, text, cooking_time_minutes, created_at, updated_at";

impl Recipe {
    /// Creates a recipe together with its ingredient and tag rows
    ///
    /// All inserts run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, a referenced ingredient or
    /// tag does not exist, or the database fails.
    pub async fn create(pool: &PgPool, data: CreateRecipe) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (name, author_id, text, cooking_time_minutes)
            VALUES ($1, $2, $3, $4)
            RETURNING {RECIPE_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.author_id)
        .bind(data.text)
        .bind(data.cooking_time_minutes)
        .fetch_one(&mut *tx)
        .await?;

        for tag_id in &data.tag_ids {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe.id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        for line in &data.ingredients {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) \
                 VALUES ($1, $2, $3)",
            )
            .bind(recipe.id)
            .bind(line.ingredient_id)
            .bind(line.amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(recipe)
    }

    /// Finds a recipe by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    /// Lists recipes matching the filter, ordered by name
    ///
    /// Tag filtering matches recipes carrying ANY of the given slugs
    /// (deduplicated). Favorite and cart filters are caller-relative.
    pub async fn list(
        pool: &PgPool,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT DISTINCT r.{0}
            FROM recipes r
            LEFT JOIN recipe_tags rt ON rt.recipe_id = r.id
            LEFT JOIN tags t ON t.id = rt.tag_id
            WHERE ($1::text[] IS NULL OR t.slug = ANY($1))
              AND ($2::uuid IS NULL OR EXISTS(
                    SELECT 1 FROM favourites f
                    WHERE f.recipe_id = r.id AND f.user_id = $2))
              AND ($3::uuid IS NULL OR EXISTS(
                    SELECT 1 FROM shopping_cart_recipes scr
                    JOIN shopping_carts sc ON sc.id = scr.shopping_cart_id
                    WHERE scr.recipe_id = r.id AND sc.author_id = $3))
            ORDER BY r.name
            LIMIT $4 OFFSET $5
            "#,
            RECIPE_COLUMNS.replace(", ", ", r."),
        ))
        .bind(&filter.tag_slugs)
        .bind(filter.favorited_by)
        .bind(filter.in_cart_of)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Counts recipes matching the filter
    pub async fn count(pool: &PgPool, filter: &RecipeFilter) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT r.id)
            FROM recipes r
            LEFT JOIN recipe_tags rt ON rt.recipe_id = r.id
            LEFT JOIN tags t ON t.id = rt.tag_id
            WHERE ($1::text[] IS NULL OR t.slug = ANY($1))
              AND ($2::uuid IS NULL OR EXISTS(
                    SELECT 1 FROM favourites f
                    WHERE f.recipe_id = r.id AND f.user_id = $2))
              AND ($3::uuid IS NULL OR EXISTS(
                    SELECT 1 FROM shopping_cart_recipes scr
                    JOIN shopping_carts sc ON sc.id = scr.shopping_cart_id
                    WHERE scr.recipe_id = r.id AND sc.author_id = $3))
            "#,
        )
        .bind(&filter.tag_slugs)
        .bind(filter.favorited_by)
        .bind(filter.in_cart_of)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Lists an author's recipes, ordered by name
    pub async fn list_by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE author_id = $1 ORDER BY name",
        ))
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Loads a recipe's ingredient lines in insertion order
    pub async fn ingredient_rows(
        pool: &PgPool,
        recipe_id: Uuid,
    ) -> Result<Vec<RecipeIngredientRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            SELECT ri.ingredient_id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.created_at, ri.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Updates a recipe
    ///
    /// Scalar fields update in place; when `ingredients` or `tag_ids` are
    /// present the existing association rows are replaced wholesale. All
    /// statements run in one transaction.
    ///
    /// # Returns
    ///
    /// The updated recipe if found, None if the recipe doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateRecipe,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut query = String::from("UPDATE recipes SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", text = ${}", bind_count));
        }
        if data.cooking_time_minutes.is_some() {
            bind_count += 1;
            query.push_str(&format!(", cooking_time_minutes = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {RECIPE_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Recipe>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(text) = data.text {
            q = q.bind(text);
        }
        if let Some(minutes) = data.cooking_time_minutes {
            q = q.bind(minutes);
        }

        let recipe = match q.fetch_optional(&mut *tx).await? {
            Some(recipe) => recipe,
            None => {
                tx.rollback().await?;
                return Ok(None);
            }
        };

        if let Some(tag_ids) = data.tag_ids {
            sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for tag_id in tag_ids {
                sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(tag_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        if let Some(ingredients) = data.ingredients {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for line in ingredients {
                sqlx::query(
                    "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) \
                     VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(line.ingredient_id)
                .bind(line.amount)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(Some(recipe))
    }

    /// Deletes a recipe by ID
    ///
    /// Association rows cascade. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    #[test]
    fn test_validate_amount_accepts_valid() {
        assert!(validate_amount(dec("0")).is_ok());
        assert!(validate_amount(dec("2.500")).is_ok());
        assert!(validate_amount(dec("0.125")).is_ok());
        assert!(validate_amount(dec("9999.999")).is_ok());
    }

    #[test]
    fn test_validate_amount_rejects_negative() {
        assert!(validate_amount(dec("-0.001")).is_err());
        assert!(validate_amount(dec("-5")).is_err());
    }

    #[test]
    fn test_validate_amount_rejects_too_many_decimal_places() {
        assert!(validate_amount(dec("0.1234")).is_err());
        // Trailing zeros beyond 3 places are fine once normalized
        assert!(validate_amount(dec("0.1230")).is_ok());
    }

    #[test]
    fn test_validate_amount_rejects_too_large() {
        assert!(validate_amount(dec("10000")).is_err());
        assert!(validate_amount(dec("10000.001")).is_err());
    }
}
