/// Application state and router builder
///
/// This module defines the shared application state and provides a
/// function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use mealbook_api::{app::AppState, config::Config};
/// use mealbook_shared::shopping::DocumentStyle;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let style = DocumentStyle::new(
///     config.shopping_list.title.clone(),
///     config.shopping_list.page_info.clone(),
/// );
/// let state = AppState::new(pool, config, style);
/// let app = mealbook_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use mealbook_shared::auth::{
    jwt,
    middleware::{AuthContext, AuthError},
};
use mealbook_shared::shopping::DocumentStyle;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Shopping-list document style, built once at startup
    pub document_style: Arc<DocumentStyle>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, document_style: DocumentStyle) -> Self {
        Self {
            db,
            config: Arc::new(config),
            document_style: Arc::new(document_style),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/                       # Authentication (public)
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /tags/                       # Reference data (public)
///     ├── /ingredients/                # Reference data, name search (public)
///     ├── /users/                      # Profiles (reads public, rest authed)
///     │   ├── GET  /, /:id             # optional auth (is_subscribed flag)
///     │   ├── GET/PATCH /me
///     │   ├── POST /set_password
///     │   ├── GET  /subscriptions
///     │   └── POST/DELETE /:id/subscribe
///     └── /recipes/                    # Recipes (reads public, rest authed)
///         ├── GET  /, /:id             # optional auth (caller-relative flags)
///         ├── POST /, PATCH/DELETE /:id
///         ├── POST/DELETE /:id/favorite
///         ├── POST/DELETE /:id/shopping_cart
///         └── GET  /download_shopping_cart
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (per-route-group: required or optional bearer JWT)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Reference data (public)
    let tag_routes = Router::new()
        .route("/", get(routes::tags::list_tags))
        .route("/:id", get(routes::tags::get_tag));

    let ingredient_routes = Router::new()
        .route("/", get(routes::ingredients::list_ingredients))
        .route("/:id", get(routes::ingredients::get_ingredient));

    // Public reads carrying caller-relative flags (optional auth)
    let user_read_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/:id", get(routes::users::get_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth_layer,
        ));

    let recipe_read_routes = Router::new()
        .route("/", get(routes::recipes::list_recipes))
        .route("/:id", get(routes::recipes::get_recipe))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth_layer,
        ));

    // Authenticated user operations
    let user_authed_routes = Router::new()
        .route("/me", get(routes::users::me).patch(routes::users::update_me))
        .route("/set_password", post(routes::users::set_password))
        .route("/subscriptions", get(routes::users::list_subscriptions))
        .route(
            "/:id/subscribe",
            post(routes::users::subscribe).delete(routes::users::unsubscribe),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Authenticated recipe operations, including the shopping-list export
    let recipe_authed_routes = Router::new()
        .route("/", post(routes::recipes::create_recipe))
        .route(
            "/:id",
            patch(routes::recipes::update_recipe).delete(routes::recipes::delete_recipe),
        )
        .route(
            "/:id/favorite",
            post(routes::favourites::add_favorite).delete(routes::favourites::remove_favorite),
        )
        .route(
            "/:id/shopping_cart",
            post(routes::shopping_cart::add_to_cart)
                .delete(routes::shopping_cart::remove_from_cart),
        )
        .route(
            "/download_shopping_cart",
            get(routes::shopping_cart::download_shopping_cart),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Build the complete /api surface
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tags", tag_routes)
        .nest("/ingredients", ingredient_routes)
        .nest("/users", user_read_routes.merge(user_authed_routes))
        .nest("/recipes", recipe_read_routes.merge(recipe_authed_routes));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects AuthContext into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(&state, &req)?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Optional variant of the auth layer for public reads
///
/// Recipe and user read endpoints are public but carry caller-relative
/// flags (is_favorited, is_in_shopping_cart, is_subscribed). A valid
/// bearer token yields an AuthContext; a missing or invalid one leaves
/// the request anonymous instead of rejecting it.
async fn optional_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Ok(auth_context) = authenticate(&state, &req) {
        req.extensions_mut().insert(auth_context);
    }

    next.run(req).await
}

/// Shared token extraction and validation
fn authenticate(state: &AppState, req: &Request) -> Result<AuthContext, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(AuthContext::from_jwt(claims.sub))
}
