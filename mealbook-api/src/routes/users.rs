/// User profile and subscription endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - List profiles (public, optional auth)
/// - `GET /api/users/:id` - One profile (public, optional auth)
/// - `GET /api/users/me` - Own profile
/// - `PATCH /api/users/me` - Update own profile
/// - `POST /api/users/set_password` - Change password
/// - `GET /api/users/subscriptions` - Authors the caller follows
/// - `POST /api/users/:id/subscribe` - Follow an author
/// - `DELETE /api/users/:id/subscribe` - Unfollow an author
///
/// The `is_subscribed` flag in profile responses is caller-relative and
/// false for anonymous requests.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{recipes::RecipeBrief, PageQuery, Paginated},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use mealbook_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        recipe::Recipe,
        subscription::Subscription,
        user::{UpdateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Public profile representation
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Username
    pub username: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Whether the caller follows this user (false for anonymous)
    pub is_subscribed: bool,
}

impl UserResponse {
    /// Builds a profile with a precomputed subscription flag
    pub fn from_user(user: &User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }

    /// Builds a profile, resolving the flag against the viewer
    pub async fn for_viewer(
        pool: &PgPool,
        user: &User,
        viewer: Option<Uuid>,
    ) -> Result<Self, sqlx::Error> {
        let is_subscribed = match viewer {
            Some(viewer_id) if viewer_id != user.id => {
                Subscription::exists(pool, viewer_id, user.id).await?
            }
            _ => false,
        };

        Ok(Self::from_user(user, is_subscribed))
    }
}

/// Own-profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New username
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: Option<String>,

    /// New first name
    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: Option<String>,

    /// New last name
    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// Current password, verified before any change
    pub current_password: String,

    /// New password
    pub new_password: String,
}

/// One subscription entry: the followed author plus their recipes
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    /// Subscription ID
    pub id: Uuid,

    /// The followed author
    pub author: UserResponse,

    /// The author's recipes in brief form
    pub recipes: Vec<RecipeBrief>,

    /// When the subscription was created
    pub created_at: DateTime<Utc>,
}

/// List user profiles
pub async fn list_users(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Paginated<UserResponse>>> {
    let viewer = auth.map(|Extension(ctx)| ctx.user_id);

    let count = User::count(&state.db).await?;
    let users = User::list(&state.db, page.limit(), page.offset()).await?;

    let mut results = Vec::with_capacity(users.len());
    for user in &users {
        results.push(UserResponse::for_viewer(&state.db, user, viewer).await?);
    }

    Ok(Json(Paginated { count, results }))
}

/// Get one profile by ID
///
/// # Errors
///
/// - `404 Not Found`: User doesn't exist
pub async fn get_user(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let viewer = auth.map(|Extension(ctx)| ctx.user_id);

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::for_viewer(&state.db, &user, viewer).await?))
}

/// Get the caller's own profile
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_user(&user, false)))
}

/// Update the caller's own profile
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email or username already taken
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateMeRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    if let Some(username) = &req.username {
        if !super::auth::is_valid_username(username) {
            return Err(ApiError::validation(
                "username",
                "Username may only contain letters, digits and @/./+/-/_",
            ));
        }
        if username == "me" {
            return Err(ApiError::validation("username", "Username 'me' is reserved"));
        }
    }

    let user = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            email: req.email,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash: None,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_user(&user, false)))
}

/// Change the caller's password
///
/// # Errors
///
/// - `400 Bad Request`: Current password is incorrect
/// - `422 Unprocessable Entity`: New password too weak
pub async fn set_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SetPasswordRequest>,
) -> ApiResult<StatusCode> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    password::validate_password_strength(&req.new_password)
        .map_err(|e| ApiError::validation("new_password", e))?;

    let password_hash = password::hash_password(&req.new_password)?;

    User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's subscriptions with each author's recipes
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<SubscriptionResponse>>> {
    let subscriptions = Subscription::list_by_user(&state.db, auth.user_id).await?;

    let mut results = Vec::with_capacity(subscriptions.len());
    for subscription in subscriptions {
        let author = match User::find_by_id(&state.db, subscription.author_id).await? {
            Some(author) => author,
            None => continue,
        };

        let recipes = Recipe::list_by_author(&state.db, author.id)
            .await?
            .iter()
            .map(RecipeBrief::from_recipe)
            .collect();

        results.push(SubscriptionResponse {
            id: subscription.id,
            author: UserResponse::from_user(&author, true),
            recipes,
            created_at: subscription.created_at,
        });
    }

    Ok(Json(results))
}

/// Follow an author
///
/// # Errors
///
/// - `404 Not Found`: Author doesn't exist
/// - `422 Unprocessable Entity`: Self-subscription or duplicate
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<SubscriptionResponse>)> {
    let author = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if author.id == auth.user_id {
        return Err(ApiError::validation(
            "author",
            "Cannot subscribe to yourself",
        ));
    }

    if Subscription::exists(&state.db, auth.user_id, author.id).await? {
        return Err(ApiError::validation(
            "author",
            "Already subscribed to this author",
        ));
    }

    let subscription = Subscription::create(&state.db, auth.user_id, author.id).await?;

    let recipes = Recipe::list_by_author(&state.db, author.id)
        .await?
        .iter()
        .map(RecipeBrief::from_recipe)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse {
            id: subscription.id,
            author: UserResponse::from_user(&author, true),
            recipes,
            created_at: subscription.created_at,
        }),
    ))
}

/// Unfollow an author
///
/// # Errors
///
/// - `404 Not Found`: Author or subscription doesn't exist
pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let author = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let deleted = Subscription::delete(&state.db, auth.user_id, author.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Subscription not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
