/// Shopping cart endpoints and the shopping-list PDF export
///
/// # Endpoints
///
/// - `POST /api/recipes/:id/shopping_cart` - Add a recipe to the cart
/// - `DELETE /api/recipes/:id/shopping_cart` - Remove a recipe
/// - `GET /api/recipes/download_shopping_cart` - Export the list as PDF
///
/// The export runs the whole pipeline synchronously within the request:
/// gateway snapshot → aggregate → normalize → render. A user without a
/// cart, or with an empty one, receives a document carrying the single
/// blank placeholder row instead of an error.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::recipes::RecipeBrief,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Extension, Json,
};
use mealbook_shared::{
    auth::middleware::AuthContext,
    models::{recipe::Recipe, shopping_cart::ShoppingCart},
    shopping::{
        aggregate_ingredients, normalize_amount, render::ARTIFACT_FILENAME, render_shopping_list,
        ShoppingListRow,
    },
};
use tracing::debug;
use uuid::Uuid;

/// Add a recipe to the caller's cart
///
/// The cart row itself is created on first use.
///
/// # Errors
///
/// - `404 Not Found`: Recipe doesn't exist
/// - `422 Unprocessable Entity`: Recipe is already in the cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<RecipeBrief>)> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let cart = ShoppingCart::get_or_create(&state.db, auth.user_id).await?;

    if ShoppingCart::contains(&state.db, auth.user_id, recipe.id).await? {
        return Err(ApiError::validation(
            "recipe",
            "Recipe is already in the shopping cart",
        ));
    }

    ShoppingCart::add_recipe(&state.db, cart.id, recipe.id).await?;

    Ok((StatusCode::CREATED, Json(RecipeBrief::from_recipe(&recipe))))
}

/// Remove a recipe from the caller's cart
///
/// # Errors
///
/// - `404 Not Found`: Recipe, cart, or cart entry doesn't exist
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let cart = ShoppingCart::find_by_author(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shopping cart not found".to_string()))?;

    let deleted = ShoppingCart::remove_recipe(&state.db, cart.id, recipe.id).await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "Recipe is not in the shopping cart".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Export the caller's shopping list as a PDF
///
/// Aggregates ingredient quantities across all recipes in the cart into
/// one deduplicated, unit-aware list and renders it as a paginated table.
/// Returned as an attachment named `shopping-list.pdf`.
///
/// # Errors
///
/// - `500 Internal Server Error`: Artifact construction failed (no
///   partial document is returned)
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Response> {
    let usage = ShoppingCart::ingredient_usage_for_user(&state.db, auth.user_id).await?;

    let rows: Vec<ShoppingListRow> = aggregate_ingredients(usage)
        .into_iter()
        .map(|item| ShoppingListRow {
            name: item.name,
            amount: normalize_amount(item.amount),
            unit: item.measurement_unit,
        })
        .collect();

    debug!(
        user_id = %auth.user_id,
        line_items = rows.len(),
        "Rendering shopping list"
    );

    let bytes = render_shopping_list(&state.document_style, &rows)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{ARTIFACT_FILENAME}\""),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::InternalError(format!("Failed to build response: {}", e)))
}
