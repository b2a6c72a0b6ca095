/// Tag endpoints (read-only reference data)
///
/// # Endpoints
///
/// - `GET /api/tags` - List all tags (public, unpaginated)
/// - `GET /api/tags/:id` - Get one tag

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use mealbook_shared::models::tag::Tag;
use uuid::Uuid;

/// List all tags
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    let tags = Tag::list(&state.db).await?;

    Ok(Json(tags))
}

/// Get a tag by ID
///
/// # Errors
///
/// - `404 Not Found`: Tag doesn't exist
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Tag>> {
    let tag = Tag::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    Ok(Json(tag))
}
