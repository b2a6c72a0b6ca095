//! # Mealbook API Server
//!
//! Backend of the Mealbook recipe-sharing application: recipe CRUD,
//! favorites, author subscriptions, and the shopping-list PDF export.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p mealbook-api
//! ```

use mealbook_api::{
    app::{build_router, AppState},
    config::Config,
};
use mealbook_shared::db::{migrations, pool};
use mealbook_shared::shopping::DocumentStyle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealbook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Mealbook API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool and apply migrations
    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    // Document style is built once here and passed by reference into the
    // renderer; there is no process-global font registration.
    let document_style = DocumentStyle::new(
        config.shopping_list.title.clone(),
        config.shopping_list.page_info.clone(),
    );

    // Build Axum application
    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config, document_style);
    let app = build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
