/// Ingredient endpoints (read-only reference data)
///
/// # Endpoints
///
/// - `GET /api/ingredients?name=` - List/search ingredients (public, unpaginated)
/// - `GET /api/ingredients/:id` - Get one ingredient
///
/// The name search matches ingredients whose name starts with OR contains
/// the query; prefix matches are ranked first, then contains matches,
/// alphabetical within each group.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use mealbook_shared::models::ingredient::Ingredient;
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for the ingredient listing
#[derive(Debug, Deserialize, Default)]
pub struct IngredientListQuery {
    /// Name search term
    pub name: Option<String>,
}

/// List ingredients, optionally filtered by name
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientListQuery>,
) -> ApiResult<Json<Vec<Ingredient>>> {
    let ingredients = match query.name.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => Ingredient::search_by_name(&state.db, name).await?,
        None => Ingredient::list(&state.db).await?,
    };

    Ok(Json(ingredients))
}

/// Get an ingredient by ID
///
/// # Errors
///
/// - `404 Not Found`: Ingredient doesn't exist
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Ingredient>> {
    let ingredient = Ingredient::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;

    Ok(Json(ingredient))
}
