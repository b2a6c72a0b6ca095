/// Recipe endpoints
///
/// # Endpoints
///
/// - `GET /api/recipes` - Paginated list with filters (public, optional auth)
/// - `GET /api/recipes/:id` - Full read form (public, optional auth)
/// - `POST /api/recipes` - Create (authenticated)
/// - `PATCH /api/recipes/:id` - Update (author only)
/// - `DELETE /api/recipes/:id` - Delete (author only)
///
/// # Filters
///
/// - `tags=breakfast,dinner` - comma-separated tag slugs, any-match
/// - `is_favorited=1` - only the caller's favorites
/// - `is_in_shopping_cart=1` - only recipes in the caller's cart
///
/// The caller-relative filters are ignored for anonymous requests, and the
/// `is_favorited` / `is_in_shopping_cart` flags in responses are false for
/// anonymous callers. Ingredient amounts in read responses are normalized
/// to their shortest exact decimal form.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{users::UserResponse, PageQuery, Paginated},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use mealbook_shared::{
    auth::middleware::AuthContext,
    models::{
        favourite::Favourite,
        ingredient::Ingredient,
        recipe::{validate_amount, CreateRecipe, IngredientAmount, Recipe, RecipeFilter, UpdateRecipe},
        shopping_cart::ShoppingCart,
        tag::Tag,
        user::User,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Brief recipe form used in subscription and cart responses
#[derive(Debug, Clone, Serialize)]
pub struct RecipeBrief {
    /// Recipe ID
    pub id: Uuid,

    /// Recipe name
    pub name: String,

    /// Cooking duration in minutes
    pub cooking_time: i32,
}

impl RecipeBrief {
    /// Builds the brief form from a recipe row
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            cooking_time: recipe.cooking_time_minutes,
        }
    }
}

/// One ingredient line of the read form
///
/// `amount` is normalized (trailing fractional zeros stripped) and
/// serializes as an exact decimal string.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredientResponse {
    /// Ingredient ID
    pub id: Uuid,

    /// Ingredient display name
    pub name: String,

    /// Measurement unit string
    pub measurement_unit: String,

    /// Normalized quantity
    pub amount: Decimal,
}

/// Full recipe read form
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    /// Recipe ID
    pub id: Uuid,

    /// Attached tags
    pub tags: Vec<Tag>,

    /// Author profile with caller-relative `is_subscribed`
    pub author: UserResponse,

    /// Ingredient lines with normalized amounts
    pub ingredients: Vec<RecipeIngredientResponse>,

    /// Whether the caller has favorited this recipe
    pub is_favorited: bool,

    /// Whether this recipe is in the caller's shopping cart
    pub is_in_shopping_cart: bool,

    /// Recipe name
    pub name: String,

    /// Cooking instructions
    pub text: String,

    /// Cooking duration in minutes
    pub cooking_time: i32,
}

/// One (ingredient, amount) pair of a write request
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientAmountRequest {
    /// Ingredient ID
    pub id: Uuid,

    /// Quantity (exact decimal; strings like "2.500" are accepted)
    pub amount: Decimal,
}

/// Recipe create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    /// Recipe name
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,

    /// Cooking instructions
    #[validate(length(min = 1, message = "Instructions must not be empty"))]
    pub text: String,

    /// Cooking duration in minutes
    #[validate(range(min = 1, message = "Cooking time must be at least 1 minute"))]
    pub cooking_time: i32,

    /// Ingredient lines
    pub ingredients: Vec<IngredientAmountRequest>,

    /// Attached tag IDs
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Recipe update request (partial)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRecipeRequest {
    /// New name
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: Option<String>,

    /// New instructions
    #[validate(length(min = 1, message = "Instructions must not be empty"))]
    pub text: Option<String>,

    /// New cooking duration in minutes
    #[validate(range(min = 1, message = "Cooking time must be at least 1 minute"))]
    pub cooking_time: Option<i32>,

    /// Replacement ingredient set
    pub ingredients: Option<Vec<IngredientAmountRequest>>,

    /// Replacement tag set
    pub tags: Option<Vec<Uuid>>,
}

/// Query parameters for the recipe listing
#[derive(Debug, Deserialize, Default)]
pub struct RecipeListQuery {
    /// 1-based page number
    pub page: Option<i64>,

    /// Page size
    pub limit: Option<i64>,

    /// Comma-separated tag slugs
    pub tags: Option<String>,

    /// Truthy = only the caller's favorites
    pub is_favorited: Option<String>,

    /// Truthy = only recipes in the caller's cart
    pub is_in_shopping_cart: Option<String>,
}

/// Query-parameter truthiness ("1" or "true")
fn truthy(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true") | Some("True"))
}

/// Assembles the full read form for one recipe
async fn build_recipe_response(
    state: &AppState,
    recipe: Recipe,
    viewer: Option<Uuid>,
) -> ApiResult<RecipeResponse> {
    let author = User::find_by_id(&state.db, recipe.author_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe author not found".to_string()))?;
    let author = UserResponse::for_viewer(&state.db, &author, viewer).await?;

    let tags = Tag::list_for_recipe(&state.db, recipe.id).await?;

    let ingredients = Recipe::ingredient_rows(&state.db, recipe.id)
        .await?
        .into_iter()
        .map(|row| RecipeIngredientResponse {
            id: row.ingredient_id,
            name: row.name,
            measurement_unit: row.measurement_unit,
            amount: row.amount.normalize(),
        })
        .collect();

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer_id) => (
            Favourite::exists(&state.db, viewer_id, recipe.id).await?,
            ShoppingCart::contains(&state.db, viewer_id, recipe.id).await?,
        ),
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        tags,
        author,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        text: recipe.text,
        cooking_time: recipe.cooking_time_minutes,
    })
}

/// Validates the ingredient lines of a write request
///
/// Amounts must be non-negative with at most 3 fractional digits and less
/// than 10000; every referenced ingredient must exist.
async fn validate_ingredient_lines(
    state: &AppState,
    lines: &[IngredientAmountRequest],
) -> ApiResult<Vec<IngredientAmount>> {
    let mut validated = Vec::with_capacity(lines.len());

    for line in lines {
        validate_amount(line.amount).map_err(|e| ApiError::validation("amount", e))?;

        Ingredient::find_by_id(&state.db, line.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;

        validated.push(IngredientAmount {
            ingredient_id: line.id,
            amount: line.amount,
        });
    }

    Ok(validated)
}

/// Validates that every referenced tag exists
async fn validate_tag_ids(state: &AppState, tag_ids: &[Uuid]) -> ApiResult<()> {
    for tag_id in tag_ids {
        Tag::find_by_id(&state.db, *tag_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;
    }

    Ok(())
}

/// List recipes with filters
pub async fn list_recipes(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Query(query): Query<RecipeListQuery>,
) -> ApiResult<Json<Paginated<RecipeResponse>>> {
    let viewer = auth.map(|Extension(ctx)| ctx.user_id);

    let tag_slugs = query.tags.as_deref().map(|tags| {
        tags.split(',')
            .map(|slug| slug.trim().to_string())
            .filter(|slug| !slug.is_empty())
            .collect::<Vec<_>>()
    });

    // Caller-relative filters need a caller; anonymous requests ignore them
    let filter = RecipeFilter {
        tag_slugs,
        favorited_by: viewer.filter(|_| truthy(&query.is_favorited)),
        in_cart_of: viewer.filter(|_| truthy(&query.is_in_shopping_cart)),
    };

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };

    let count = Recipe::count(&state.db, &filter).await?;
    let recipes = Recipe::list(&state.db, &filter, page.limit(), page.offset()).await?;

    let mut results = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        results.push(build_recipe_response(&state, recipe, viewer).await?);
    }

    Ok(Json(Paginated { count, results }))
}

/// Get one recipe in full read form
///
/// # Errors
///
/// - `404 Not Found`: Recipe doesn't exist
pub async fn get_recipe(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RecipeResponse>> {
    let viewer = auth.map(|Extension(ctx)| ctx.user_id);

    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(build_recipe_response(&state, recipe, viewer).await?))
}

/// Create a recipe
///
/// The recipe and its ingredient/tag rows are written in one transaction.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed (bad amount, empty name)
/// - `404 Not Found`: Referenced ingredient or tag doesn't exist
/// - `409 Conflict`: Recipe name already taken
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateRecipeRequest>,
) -> ApiResult<(StatusCode, Json<RecipeResponse>)> {
    req.validate()?;

    let ingredients = validate_ingredient_lines(&state, &req.ingredients).await?;
    validate_tag_ids(&state, &req.tags).await?;

    let recipe = Recipe::create(
        &state.db,
        CreateRecipe {
            name: req.name,
            author_id: auth.user_id,
            text: req.text,
            cooking_time_minutes: req.cooking_time,
            ingredients,
            tag_ids: req.tags,
        },
    )
    .await?;

    let response = build_recipe_response(&state, recipe, Some(auth.user_id)).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a recipe (author only)
///
/// When `ingredients` or `tags` are present the existing association rows
/// are replaced wholesale.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the author
/// - `404 Not Found`: Recipe doesn't exist
pub async fn update_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecipeRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    req.validate()?;

    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    if recipe.author_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Cannot edit someone else's recipe".to_string(),
        ));
    }

    let ingredients = match &req.ingredients {
        Some(lines) => Some(validate_ingredient_lines(&state, lines).await?),
        None => None,
    };
    if let Some(tag_ids) = &req.tags {
        validate_tag_ids(&state, tag_ids).await?;
    }

    let updated = Recipe::update(
        &state.db,
        id,
        UpdateRecipe {
            name: req.name,
            text: req.text,
            cooking_time_minutes: req.cooking_time,
            ingredients,
            tag_ids: req.tags,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(
        build_recipe_response(&state, updated, Some(auth.user_id)).await?,
    ))
}

/// Delete a recipe (author only)
///
/// Association rows cascade with the recipe.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the author
/// - `404 Not Found`: Recipe doesn't exist
pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    if recipe.author_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Cannot delete someone else's recipe".to_string(),
        ));
    }

    Recipe::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        assert!(truthy(&Some("1".to_string())));
        assert!(truthy(&Some("true".to_string())));
        assert!(truthy(&Some("True".to_string())));
        assert!(!truthy(&Some("0".to_string())));
        assert!(!truthy(&Some("".to_string())));
        assert!(!truthy(&None));
    }
}
