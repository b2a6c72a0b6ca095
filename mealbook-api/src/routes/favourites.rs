/// Favorite endpoints
///
/// # Endpoints
///
/// - `POST /api/recipes/:id/favorite` - Mark a recipe as favorite
/// - `DELETE /api/recipes/:id/favorite` - Remove the mark
///
/// A recipe can be favorited once; duplicate adds are rejected.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::recipes::RecipeBrief,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use mealbook_shared::{
    auth::middleware::AuthContext,
    models::{favourite::Favourite, recipe::Recipe},
};
use uuid::Uuid;

/// Mark a recipe as favorite
///
/// # Errors
///
/// - `404 Not Found`: Recipe doesn't exist
/// - `422 Unprocessable Entity`: Recipe is already a favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<RecipeBrief>)> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    if Favourite::exists(&state.db, auth.user_id, recipe.id).await? {
        return Err(ApiError::validation(
            "recipe",
            "Recipe is already in favorites",
        ));
    }

    Favourite::create(&state.db, auth.user_id, recipe.id).await?;

    Ok((StatusCode::CREATED, Json(RecipeBrief::from_recipe(&recipe))))
}

/// Remove a favorite mark
///
/// # Errors
///
/// - `404 Not Found`: Recipe or favorite doesn't exist
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let deleted = Favourite::delete(&state.db, auth.user_id, recipe.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
