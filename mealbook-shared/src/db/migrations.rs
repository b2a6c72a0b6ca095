/// Database migration runner
///
/// Migrations are embedded from the `migrations/` directory of this crate
/// and applied at server startup using sqlx's migration system.
///
/// # Migration Files
///
/// - `0001_create_users.sql` - users and subscriptions
/// - `0002_create_recipes.sql` - tags, ingredients, recipes, associations
/// - `0003_create_interactions.sql` - favourites and shopping carts
///
/// # Example
///
/// ```no_run
/// use mealbook_shared::db::pool::{create_pool, DatabaseConfig};
/// use mealbook_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if:
/// - A migration file is malformed
/// - A migration fails to execute
/// - Database connection is lost during migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
